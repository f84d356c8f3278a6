//! # Frame Transforms
//!
//! Every effect turns a [`Clip`](crate::clip::Clip) into a new clip whose
//! frame sources wrap the old ones. Effects can be chained by hand with
//! [`EffectChain`], or named in comma-separated directives and looked up in
//! the [`EffectRegistry`].
//!
//! ## Built-in Effects
//!
//! - **Gaussian blur**: radius constant or animated over time
//! - **Horizontal move**: a crop window sliding across the clip
//! - **Resize / even size / cover fit**: size normalisation
//! - **Center foreground**: sharp image over its own blurred, panning copy
//!
//! ## Usage
//!
//! ```rust,no_run
//! use imageclip_factory::clip::{Clip, Frame};
//! use imageclip_factory::effects::EffectRegistry;
//!
//! let clip = Clip::from_frame(Frame::new_black(1200, 900), 5.0);
//! let registry = EffectRegistry::new();
//! let (clip, reports) = registry
//!     .apply_directives(&clip, &["center_foreground,800,600,300"], false)
//!     .unwrap();
//! assert_eq!(clip.size(), (800, 600));
//! assert!(reports[0].outcome.is_applied());
//! ```

pub mod blur;
pub mod center_foreground;
pub mod chain;
pub mod composite;
pub mod directive;
pub mod move_horizontal;
pub mod registry;
pub mod resize;
pub mod traits;

pub use blur::GaussianBlur;
pub use center_foreground::CenterForeground;
pub use chain::EffectChain;
pub use composite::{DurationPolicy, LayerStack};
pub use directive::{DirectiveOutcome, DirectiveReport, EffectDirective};
pub use move_horizontal::MoveHorizontally;
pub use registry::EffectRegistry;
pub use resize::{CoverFit, EvenSize, Resize};
pub use traits::{Effect, EffectMetadata};
