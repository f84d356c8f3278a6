//! # Clips and Frames
//!
//! A [`Clip`] is a lazy, time-indexed frame source: asking it for time `t`
//! runs the chain of closures that transforms have wrapped around the
//! original image. Nothing is rendered until a frame is requested.

pub mod frame;
pub mod sequence;
pub mod time_value;
pub mod types;

pub use frame::Frame;
pub use sequence::ClipSequence;
pub use time_value::TimeValue;
pub use types::{still_source, ApplyTo, Clip, FrameFn};
