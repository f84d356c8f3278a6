use std::fmt;
use std::sync::Arc;

use crate::clip::frame::Frame;
use crate::error::{ClipError, Result};

/// Lazily renders the frame visible at a given time (seconds)
pub type FrameFn = Arc<dyn Fn(f64) -> Result<Frame> + Send + Sync>;

/// Which of a clip's frame sources a transform rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyTo {
    Video,
    Mask,
    Both,
}

impl ApplyTo {
    pub fn video(self) -> bool {
        matches!(self, Self::Video | Self::Both)
    }

    pub fn mask(self) -> bool {
        matches!(self, Self::Mask | Self::Both)
    }
}

/// A time-indexed frame source with fixed size and duration
///
/// Clips are cheap to clone: the frame sources are shared. Transforms never
/// touch the source they wrap, they return a new clip around it.
#[derive(Clone)]
pub struct Clip {
    width: u32,
    height: u32,
    duration: f64,
    video: FrameFn,
    mask: Option<FrameFn>,
}

impl Clip {
    /// Create a clip from an arbitrary frame function
    pub fn from_fn<F>(width: u32, height: u32, duration: f64, f: F) -> Self
    where
        F: Fn(f64) -> Result<Frame> + Send + Sync + 'static,
    {
        Self {
            width,
            height,
            duration,
            video: Arc::new(f),
            mask: None,
        }
    }

    /// Create a still clip showing the same frame for `duration` seconds
    ///
    /// An RGBA frame is split into an RGB video source and an alpha mask.
    pub fn from_frame(frame: Frame, duration: f64) -> Self {
        let (width, height) = frame.size();
        match frame.split_alpha() {
            Some((color, alpha)) => Self::from_fn(width, height, duration, move |_| Ok(color.clone()))
                .with_mask(still_source(alpha)),
            None => Self::from_fn(width, height, duration, move |_| Ok(frame.clone())),
        }
    }

    pub fn with_mask(mut self, mask: FrameFn) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn without_mask(mut self) -> Self {
        self.mask = None;
        self
    }

    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn has_mask(&self) -> bool {
        self.mask.is_some()
    }

    pub fn video_source(&self) -> &FrameFn {
        &self.video
    }

    pub fn mask_source(&self) -> Option<&FrameFn> {
        self.mask.as_ref()
    }

    /// Render the video frame at time `t`
    pub fn frame_at(&self, t: f64) -> Result<Frame> {
        check_time(t)?;
        (self.video)(t)
    }

    /// Render the mask frame at time `t`, if the clip has a mask
    pub fn mask_at(&self, t: f64) -> Option<Result<Frame>> {
        let mask = self.mask.as_ref()?;
        Some(check_time(t).and_then(|_| mask(t)))
    }

    /// Wrap the selected frame sources with `filter`
    ///
    /// `filter` receives the wrapped source and the requested time. `size` is
    /// the frame size the filter produces; it becomes the clip size whenever
    /// the video source is rewritten.
    pub fn transform<F>(&self, size: (u32, u32), apply_to: ApplyTo, filter: F) -> Clip
    where
        F: Fn(&FrameFn, f64) -> Result<Frame> + Send + Sync + 'static,
    {
        let filter = Arc::new(filter);
        let wrap = |source: &FrameFn| -> FrameFn {
            let source = Arc::clone(source);
            let filter = Arc::clone(&filter);
            Arc::new(move |t: f64| filter(&source, t))
        };

        let video = if apply_to.video() { wrap(&self.video) } else { Arc::clone(&self.video) };
        let mask = match &self.mask {
            Some(mask) if apply_to.mask() => Some(wrap(mask)),
            other => other.clone(),
        };
        let (width, height) = if apply_to.video() { size } else { self.size() };

        Clip {
            width,
            height,
            duration: self.duration,
            video,
            mask,
        }
    }
}

impl fmt::Debug for Clip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clip")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("duration", &self.duration)
            .field("has_mask", &self.has_mask())
            .finish()
    }
}

/// A frame source that returns the same frame at every time
pub fn still_source(frame: Frame) -> FrameFn {
    Arc::new(move |_t: f64| -> Result<Frame> { Ok(frame.clone()) })
}

fn check_time(t: f64) -> Result<()> {
    if t.is_finite() && t >= 0.0 {
        Ok(())
    } else {
        Err(ClipError::FrameRender {
            time: t,
            reason: "time must be finite and non-negative".to_string(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_still_clip_is_pure_in_time() {
        let clip = Clip::from_frame(Frame::new_filled(4, 3, [1, 2, 3]), 2.0);
        assert_eq!(clip.size(), (4, 3));
        assert_eq!(clip.duration(), 2.0);
        assert!(!clip.has_mask());

        let a = clip.frame_at(0.5).unwrap();
        let b = clip.frame_at(0.5).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_rgba_frame_gets_mask() {
        let rgba = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 77]));
        let clip = Clip::from_frame(Frame::from_rgba(rgba), 1.0);
        assert!(clip.has_mask());
        assert_eq!(clip.frame_at(0.0).unwrap().channels(), 3);
        assert_eq!(clip.mask_at(0.0).unwrap().unwrap().pixel(0, 0), &[77]);
    }

    #[test]
    fn test_rejects_invalid_time() {
        let clip = Clip::from_frame(Frame::new_black(1, 1), 1.0);
        assert!(clip.frame_at(-1.0).is_err());
        assert!(clip.frame_at(f64::NAN).is_err());
    }

    #[test]
    fn test_transform_respects_apply_to() {
        let clip = Clip::from_frame(Frame::new_black(4, 4), 1.0)
            .with_mask(still_source(Frame::new_mask(4, 4, 255)));

        let halved = clip.transform((2, 4), ApplyTo::Video, |get, t| Ok(get(t)?.crop(0, 0, 2, 4)));
        assert_eq!(halved.size(), (2, 4));
        assert_eq!(halved.frame_at(0.0).unwrap().size(), (2, 4));
        assert_eq!(halved.mask_at(0.0).unwrap().unwrap().size(), (4, 4));

        let mask_only = clip.transform((2, 4), ApplyTo::Mask, |get, t| Ok(get(t)?.crop(0, 0, 2, 4)));
        assert_eq!(mask_only.size(), (4, 4));
        assert_eq!(mask_only.mask_at(0.0).unwrap().unwrap().size(), (2, 4));

        // source clip untouched
        assert_eq!(clip.frame_at(0.0).unwrap().size(), (4, 4));
    }
}
