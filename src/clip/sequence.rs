use std::sync::Arc;

use tracing::debug;

use crate::clip::{frame::Frame, types::Clip};
use crate::error::{Result, SlideshowError};

/// Clips played back to back
#[derive(Debug, Clone, Default)]
pub struct ClipSequence {
    clips: Vec<Clip>,
}

impl ClipSequence {
    pub fn new() -> Self {
        Self { clips: Vec::new() }
    }

    /// Append a clip at the end of the sequence
    pub fn add_clip(&mut self, clip: Clip) {
        self.clips.push(clip);
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        self.clips.iter().map(Clip::duration).sum()
    }

    /// Largest width and largest height over all clips
    pub fn canvas_size(&self) -> (u32, u32) {
        self.clips.iter().fold((0, 0), |(w, h), clip| (w.max(clip.width()), h.max(clip.height())))
    }

    /// Start time of every clip in the concatenated timeline
    pub fn start_times(&self) -> Vec<f64> {
        self.clips
            .iter()
            .scan(0.0, |start, clip| {
                let current = *start;
                *start += clip.duration();
                Some(current)
            })
            .collect()
    }

    /// Concatenate into one clip
    ///
    /// Each clip is centered on a black canvas of [`canvas_size`](Self::canvas_size).
    /// A time past the end renders the last frame of the last clip.
    pub fn into_clip(self) -> Result<Clip> {
        if self.clips.is_empty() {
            return Err(SlideshowError::NoValidClips.into());
        }

        let (width, height) = self.canvas_size();
        let duration = self.total_duration();
        let starts = self.start_times();
        let clips = Arc::new(self.clips);

        debug!("Concatenating {} clips into {}x{} ({:.2}s)", clips.len(), width, height, duration);

        Ok(Clip::from_fn(width, height, duration, move |t| {
            let index = starts.partition_point(|&start| start <= t).saturating_sub(1);
            let clip = &clips[index];
            let local = (t - starts[index]).clamp(0.0, clip.duration());
            let frame = clip.frame_at(local)?;

            if frame.size() == (width, height) {
                return Ok(frame);
            }
            let mut canvas = Frame::new_black(width, height).into_image();
            let x = (width - frame.width()) / 2;
            let y = (height - frame.height()) / 2;
            image::imageops::replace(&mut canvas, frame.as_image(), x as i64, y as i64);
            Ok(Frame::new(canvas))
        }))
    }
}

impl FromIterator<Clip> for ClipSequence {
    fn from_iter<I: IntoIterator<Item = Clip>>(iter: I) -> Self {
        Self { clips: iter.into_iter().collect() }
    }
}
