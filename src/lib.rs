//! # Imageclip Factory
//!
//! Turn still images into short animated clips and stitch them into slideshow
//! videos.
//!
//! A [`Clip`] is a lazy, time-parameterized frame source. Effects such as a
//! time-varying Gaussian blur, a horizontal pan or a cover-fit resize wrap a
//! clip's frame function without rendering anything; frames are only produced
//! when a time is requested.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imageclip_factory::{
//!     config::Config,
//!     slideshow::{SlideshowBuilder, VideoWriter},
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let mut config = Config::default();
//! config.slideshow.image_duration = 4.0;
//! config.slideshow.effects = vec!["center_foreground,1280,720,200".to_string()];
//!
//! let slideshow = SlideshowBuilder::new(&config).build(&["01.jpg", "02.png"])?;
//! let mut writer = VideoWriter::new(config.video.clone());
//! writer.write(&slideshow.clip, "slideshow.mp4").await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`clip`] - Frames, lazy clips, time values and concatenation
//! - [`effects`] - Frame transforms, directives and the effect registry
//! - [`slideshow`] - Image loading, slideshow assembly and video output
//! - [`config`] - Configuration management
//!
//! ## Custom Effects
//!
//! Implement the [`Effect`](effects::Effect) trait and register a builder so
//! directives can name it:
//!
//! ```rust,no_run
//! use imageclip_factory::clip::{ApplyTo, Clip};
//! use imageclip_factory::effects::{Effect, EffectRegistry};
//! use imageclip_factory::Result;
//!
//! struct Grayscale;
//!
//! impl Effect for Grayscale {
//!     fn name(&self) -> &str {
//!         "grayscale"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Drop color"
//!     }
//!
//!     fn apply(&self, clip: &Clip) -> Result<Clip> {
//!         Ok(clip.transform(clip.size(), ApplyTo::Video, |get_frame, t| {
//!             let gray = get_frame(t)?.as_image().grayscale().to_rgb8();
//!             Ok(imageclip_factory::Frame::from_rgb(gray))
//!         }))
//!     }
//! }
//!
//! let mut registry = EffectRegistry::new();
//! registry.register("grayscale", |_| Ok(Box::new(Grayscale)));
//! ```

pub mod clip;
pub mod config;
pub mod effects;
pub mod error;
pub mod slideshow;

pub use crate::{
    clip::{Clip, Frame, TimeValue},
    config::Config,
    effects::{Effect, EffectRegistry},
    error::{FactoryError, Result},
    slideshow::{SlideshowBuilder, VideoWriter},
};
