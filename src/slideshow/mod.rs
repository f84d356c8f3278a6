//! # Slideshow Assembly
//!
//! Loads still images as clips, runs the configured effect directives on
//! each one, concatenates them in input order and hands the result to an
//! ffmpeg-backed [`VideoWriter`].

pub mod builder;
pub mod factory;
pub mod writer;

pub use builder::{SlideReport, Slideshow, SlideshowBuilder};
pub use factory::ClipFactory;
pub use writer::{frame_times, render_frames, EncodedVideo, VideoWriter};
