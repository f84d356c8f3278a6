use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clip::{Clip, Frame};

/// How long a background/foreground composite lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Last as long as the background; the foreground disappears once it ends
    #[default]
    Background,
    /// Truncate to the shorter of the two inputs
    Shortest,
}

/// A background and one foreground placed at the center of it
pub struct LayerStack {
    background: Clip,
    foreground: Clip,
    policy: DurationPolicy,
}

impl LayerStack {
    pub fn centered(background: Clip, foreground: Clip) -> Self {
        Self {
            background,
            foreground,
            policy: DurationPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DurationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Top-left corner of the foreground in background coordinates
    ///
    /// Negative when the foreground is larger than the background.
    pub fn offset(&self) -> (i64, i64) {
        center_offset(self.background.size(), self.foreground.size())
    }

    pub fn duration(&self) -> f64 {
        match self.policy {
            DurationPolicy::Background => self.background.duration(),
            DurationPolicy::Shortest => self.background.duration().min(self.foreground.duration()),
        }
    }

    /// Merge both layers into a single clip of the background's size
    pub fn compose(self) -> Clip {
        let (width, height) = self.background.size();
        let duration = self.duration();
        let offset = self.offset();
        let Self { background, foreground, .. } = self;

        debug!(
            "Compositing {:?} over {:?} at offset {:?} ({:.2}s)",
            foreground.size(),
            background.size(),
            offset,
            duration
        );

        Clip::from_fn(width, height, duration, move |t| {
            let bg = background.frame_at(t)?;
            if t > foreground.duration() {
                return Ok(Frame::from_rgb(bg.to_rgb8()));
            }
            let fg = foreground.frame_at(t)?;
            let mask = foreground.mask_at(t).transpose()?;
            Ok(composite_over(&bg, &fg, mask.as_ref(), offset))
        })
    }
}

/// Offset that centers `inner` inside `outer`, flooring odd remainders
pub fn center_offset(outer: (u32, u32), inner: (u32, u32)) -> (i64, i64) {
    (
        (outer.0 as i64 - inner.0 as i64).div_euclid(2),
        (outer.1 as i64 - inner.1 as i64).div_euclid(2),
    )
}

/// Draw `foreground` over `background` with its top-left corner at `offset`
///
/// Opacity comes from `mask` when given, otherwise from the foreground's own
/// alpha channel, otherwise the foreground is opaque. Parts of the foreground
/// outside the background are dropped. The result is an RGB frame.
pub fn composite_over(background: &Frame, foreground: &Frame, mask: Option<&Frame>, offset: (i64, i64)) -> Frame {
    let mut out = background.to_rgb8();
    let fg = foreground.to_rgb8();
    let (bw, bh) = (out.width() as i64, out.height() as i64);

    let x0 = offset.0.max(0);
    let y0 = offset.1.max(0);
    let x1 = (offset.0 + fg.width() as i64).min(bw);
    let y1 = (offset.1 + fg.height() as i64).min(bh);

    for y in y0..y1 {
        for x in x0..x1 {
            let (fx, fy) = ((x - offset.0) as u32, (y - offset.1) as u32);
            let alpha = match mask {
                Some(mask) if fx < mask.width() && fy < mask.height() => mask.pixel(fx, fy)[0],
                Some(_) => 0,
                None if foreground.channels() == 4 => foreground.pixel(fx, fy)[3],
                None => 255,
            };
            let src = fg.get_pixel(fx, fy);
            let dst = out.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                dst[c] = blend(src[c], dst[c], alpha);
            }
        }
    }

    Frame::from_rgb(out)
}

fn blend(src: u8, dst: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(src) * a + u32::from(dst) * (255 - a) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::{still_source, ApplyTo};
    use crate::effects::{Effect, MoveHorizontally};
    use image::{GrayImage, Luma};

    fn solid(w: u32, h: u32, color: [u8; 3], duration: f64) -> Clip {
        Clip::from_frame(Frame::new_filled(w, h, color), duration)
    }

    #[test]
    fn foreground_is_centered_and_background_preserved() {
        let stack = LayerStack::centered(solid(10, 8, [0, 0, 255], 3.0), solid(4, 2, [255, 0, 0], 3.0));
        assert_eq!(stack.offset(), (3, 3));

        let frame = stack.compose().frame_at(1.0).unwrap();
        assert_eq!(frame.size(), (10, 8));
        assert_eq!(frame.pixel(3, 3), &[255, 0, 0]);
        assert_eq!(frame.pixel(6, 4), &[255, 0, 0]);
        assert_eq!(frame.pixel(2, 3), &[0, 0, 255]);
        assert_eq!(frame.pixel(7, 3), &[0, 0, 255]);
        assert_eq!(frame.pixel(3, 5), &[0, 0, 255]);
    }

    #[test]
    fn mask_blends_foreground() {
        let fg = solid(2, 2, [200, 200, 200], 1.0).with_mask(still_source(Frame::new_mask(2, 2, 0)));
        let frame = LayerStack::centered(solid(2, 2, [10, 10, 10], 1.0), fg)
            .compose()
            .frame_at(0.0)
            .unwrap();
        assert_eq!(frame.pixel(0, 0), &[10, 10, 10]);

        assert_eq!(blend(200, 0, 128), 100);
        assert_eq!(blend(200, 10, 255), 200);
    }

    #[test]
    fn partial_mask_mixes_layers() {
        let fg = solid(2, 2, [200, 200, 200], 1.0).with_mask(still_source(Frame::new_mask(2, 2, 128)));
        let frame = LayerStack::centered(solid(4, 2, [10, 10, 10], 1.0), fg)
            .compose()
            .frame_at(0.5)
            .unwrap();
        // (200 * 128 + 10 * 127) / 255
        assert_eq!(frame.pixel(1, 0), &[105, 105, 105]);
        assert_eq!(frame.pixel(2, 1), &[105, 105, 105]);
        assert_eq!(frame.pixel(0, 0), &[10, 10, 10]);
    }

    #[test]
    fn panned_mask_stays_aligned_with_video() {
        // left half transparent, right half opaque
        let mask = GrayImage::from_fn(8, 2, |x, _| Luma([if x < 4 { 0 } else { 255 }]));
        let fg = solid(8, 2, [200, 200, 200], 1.0).with_mask(still_source(Frame::from_mask(mask)));
        let panned = MoveHorizontally::new()
            .width(4)
            .speed(4.0)
            .apply_to(ApplyTo::Both)
            .apply(&fg)
            .unwrap();

        let clip = LayerStack::centered(solid(4, 2, [10, 10, 10], 1.0), panned).compose();
        assert_eq!(clip.frame_at(0.0).unwrap().pixel(0, 0), &[10, 10, 10]);
        assert_eq!(clip.frame_at(1.0).unwrap().pixel(0, 0), &[200, 200, 200]);

        // halfway the window straddles the edge
        let mid = clip.frame_at(0.5).unwrap();
        assert_eq!(mid.pixel(1, 0), &[10, 10, 10]);
        assert_eq!(mid.pixel(2, 0), &[200, 200, 200]);
    }

    #[test]
    fn larger_foreground_is_clipped() {
        let stack = LayerStack::centered(solid(4, 4, [0, 0, 0], 1.0), solid(8, 6, [9, 9, 9], 1.0));
        assert_eq!(stack.offset(), (-2, -1));
        let frame = stack.compose().frame_at(0.0).unwrap();
        assert_eq!(frame.size(), (4, 4));
        assert_eq!(frame.pixel(0, 0), &[9, 9, 9]);
        assert_eq!(frame.pixel(3, 3), &[9, 9, 9]);
    }

    #[test]
    fn background_policy_keeps_background_duration() {
        let stack = LayerStack::centered(solid(4, 4, [1, 1, 1], 5.0), solid(2, 2, [250, 250, 250], 2.0));
        assert_eq!(stack.duration(), 5.0);

        let clip = stack.compose();
        assert_eq!(clip.duration(), 5.0);
        assert_eq!(clip.frame_at(1.0).unwrap().pixel(1, 1), &[250, 250, 250]);
        assert_eq!(clip.frame_at(4.0).unwrap().pixel(1, 1), &[1, 1, 1]);
    }

    #[test]
    fn shortest_policy_truncates() {
        let stack = LayerStack::centered(solid(4, 4, [1, 1, 1], 5.0), solid(2, 2, [250, 250, 250], 2.0))
            .with_policy(DurationPolicy::Shortest);
        assert_eq!(stack.compose().duration(), 2.0);

        let stack = LayerStack::centered(solid(4, 4, [1, 1, 1], 1.5), solid(2, 2, [250, 250, 250], 2.0))
            .with_policy(DurationPolicy::Shortest);
        assert_eq!(stack.duration(), 1.5);
    }
}
