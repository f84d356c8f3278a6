use tracing::debug;

use crate::{
    clip::{ApplyTo, Clip},
    effects::traits::{Effect, EffectMetadata},
    error::{EffectError, Result},
};

/// Largest width or height any size-changing effect may produce
pub const MAX_DIMENSION: u32 = 16384;

/// Scales a clip by a factor or to an exact size
#[derive(Debug, Clone, Copy)]
pub enum Resize {
    Factor(f64),
    Size(u32, u32),
}

impl Resize {
    pub fn by_factor(factor: f64) -> Self {
        Self::Factor(factor)
    }

    pub fn to_size(width: u32, height: u32) -> Self {
        Self::Size(width, height)
    }

    fn target_size(&self, source: (u32, u32)) -> Result<(u32, u32)> {
        let (width, height) = match *self {
            Self::Factor(factor) if factor.is_finite() && factor > 0.0 => (
                (source.0 as f64 * factor).round().max(1.0),
                (source.1 as f64 * factor).round().max(1.0),
            ),
            Self::Factor(factor) => {
                return Err(invalid("resize", format!("scale factor must be positive, got {}", factor)))
            }
            Self::Size(0, _) | Self::Size(_, 0) => {
                return Err(invalid("resize", "target size must be non-zero".to_string()))
            }
            Self::Size(w, h) => (w as f64, h as f64),
        };
        check_dimensions("resize", width, height)?;
        Ok((width as u32, height as u32))
    }
}

impl Effect for Resize {
    fn name(&self) -> &str {
        "resize"
    }

    fn description(&self) -> &str {
        "Scale the clip by a factor"
    }

    fn apply(&self, clip: &Clip) -> Result<Clip> {
        let (width, height) = self.target_size(clip.size())?;
        if (width, height) == clip.size() {
            return Ok(clip.clone());
        }
        Ok(clip.transform((width, height), ApplyTo::Both, move |get_frame, t| {
            Ok(get_frame(t)?.resize(width, height))
        }))
    }

    fn metadata(&self) -> EffectMetadata {
        EffectMetadata {
            animated: false,
            changes_size: true,
            required_parameters: vec!["scale".to_string()],
            optional_parameters: vec![],
        }
    }
}

/// Crops one pixel off odd dimensions so encoders accept the frame size
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenSize;

impl Effect for EvenSize {
    fn name(&self) -> &str {
        "even_size"
    }

    fn description(&self) -> &str {
        "Force even frame dimensions"
    }

    fn apply(&self, clip: &Clip) -> Result<Clip> {
        if clip.width() < 2 || clip.height() < 2 {
            return Err(invalid(
                self.name(),
                format!("a {}x{} clip has no even size to crop to", clip.width(), clip.height()),
            ));
        }
        let width = clip.width() - clip.width() % 2;
        let height = clip.height() - clip.height() % 2;
        if (width, height) == clip.size() {
            return Ok(clip.clone());
        }
        Ok(clip.transform((width, height), ApplyTo::Both, move |get_frame, t| {
            Ok(get_frame(t)?.crop(0, 0, width, height))
        }))
    }

    fn metadata(&self) -> EffectMetadata {
        EffectMetadata {
            changes_size: true,
            ..EffectMetadata::default()
        }
    }
}

/// Intermediate size and crop origin of a cover fit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverGeometry {
    pub resized: (u32, u32),
    pub crop_x: u32,
    pub crop_y: u32,
    pub target: (u32, u32),
}

/// Scale so the source covers the target box, then center the crop
///
/// The crop origin is floored and the far edge is `origin + target`, so the
/// output is always exactly `target`.
pub fn cover_geometry(source: (u32, u32), target: (u32, u32)) -> CoverGeometry {
    let (sw, sh) = (source.0.max(1) as f64, source.1.max(1) as f64);
    let scale = (target.0 as f64 / sw).max(target.1 as f64 / sh);
    let rw = ((sw * scale).round() as u32).max(target.0);
    let rh = ((sh * scale).round() as u32).max(target.1);

    CoverGeometry {
        resized: (rw, rh),
        crop_x: (rw - target.0) / 2,
        crop_y: (rh - target.1) / 2,
        target,
    }
}

/// Resize-to-cover plus centered crop to an exact size
#[derive(Debug, Clone, Copy)]
pub struct CoverFit {
    width: u32,
    height: u32,
}

impl CoverFit {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Effect for CoverFit {
    fn name(&self) -> &str {
        "cover_fit"
    }

    fn description(&self) -> &str {
        "Fill the target size without distortion, cropping the overflow"
    }

    fn apply(&self, clip: &Clip) -> Result<Clip> {
        if self.width == 0 || self.height == 0 || clip.width() == 0 || clip.height() == 0 {
            return Err(invalid(
                self.name(),
                format!(
                    "cannot fit {}x{} into {}x{}",
                    clip.width(),
                    clip.height(),
                    self.width,
                    self.height
                ),
            ));
        }

        let geometry = cover_geometry(clip.size(), (self.width, self.height));
        debug!("Cover fit {:?} -> {:?}", clip.size(), geometry);
        check_dimensions(self.name(), geometry.resized.0 as f64, geometry.resized.1 as f64)?;

        let CoverGeometry { resized: (rw, rh), crop_x, crop_y, target: (tw, th) } = geometry;
        Ok(clip.transform((tw, th), ApplyTo::Both, move |get_frame, t| {
            Ok(get_frame(t)?.resize(rw, rh).crop(crop_x, crop_y, tw, th))
        }))
    }

    fn metadata(&self) -> EffectMetadata {
        EffectMetadata {
            changes_size: true,
            ..EffectMetadata::default()
        }
    }
}

/// Reject sizes past [`MAX_DIMENSION`] before anything is allocated
pub(crate) fn check_dimensions(effect: &str, width: f64, height: f64) -> Result<()> {
    let max = MAX_DIMENSION as f64;
    if width > max || height > max {
        return Err(invalid(
            effect,
            format!("{}x{} exceeds the {}px size limit", width, height, MAX_DIMENSION),
        ));
    }
    Ok(())
}

fn invalid(effect: &str, reason: String) -> crate::error::FactoryError {
    EffectError::InvalidParameters {
        effect: effect.to_string(),
        reason,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::Frame;

    fn still(width: u32, height: u32) -> Clip {
        Clip::from_frame(Frame::new_filled(width, height, [90, 90, 90]), 1.0)
    }

    #[test]
    fn resize_by_factor() {
        let resized = Resize::by_factor(0.5).apply(&still(1000, 800)).unwrap();
        assert_eq!(resized.size(), (500, 400));
        assert_eq!(resized.frame_at(0.0).unwrap().size(), (500, 400));
    }

    #[test]
    fn resize_rejects_bad_factor() {
        assert!(Resize::by_factor(0.0).apply(&still(10, 10)).is_err());
        assert!(Resize::by_factor(-2.0).apply(&still(10, 10)).is_err());
        assert!(Resize::by_factor(f64::INFINITY).apply(&still(10, 10)).is_err());
        assert!(Resize::to_size(0, 5).apply(&still(10, 10)).is_err());
    }

    #[test]
    fn resize_rejects_oversized_target() {
        assert!(Resize::by_factor(1e9).apply(&still(10, 10)).is_err());
        assert!(Resize::to_size(MAX_DIMENSION + 1, 10).apply(&still(10, 10)).is_err());
        assert_eq!(Resize::to_size(MAX_DIMENSION, 1).apply(&still(10, 10)).unwrap().size(), (MAX_DIMENSION, 1));
    }

    #[test]
    fn cover_fit_rejects_extreme_overflow() {
        assert!(CoverFit::new(MAX_DIMENSION, 10).apply(&still(1, 100)).is_err());
    }

    #[test]
    fn even_size_rejects_single_pixel_side() {
        assert!(EvenSize.apply(&still(1, 40)).is_err());
        assert!(EvenSize.apply(&still(40, 1)).is_err());
        assert_eq!(EvenSize.apply(&still(3, 2)).unwrap().size(), (2, 2));
    }

    #[test]
    fn even_size_crops_odd_dimensions() {
        let clip = EvenSize.apply(&still(101, 55)).unwrap();
        assert_eq!(clip.size(), (100, 54));
        assert_eq!(clip.frame_at(0.0).unwrap().size(), (100, 54));

        let again = EvenSize.apply(&clip).unwrap();
        assert_eq!(again.size(), (100, 54));
    }

    #[test]
    fn even_size_is_noop_on_even_clip() {
        let clip = still(64, 48);
        let out = EvenSize.apply(&clip).unwrap();
        assert_eq!(out.size(), (64, 48));
        assert_eq!(
            out.frame_at(0.0).unwrap().as_bytes(),
            clip.frame_at(0.0).unwrap().as_bytes()
        );
    }

    #[test]
    fn cover_geometry_is_exact_for_all_aspects() {
        let targets = [(800, 600), (1080, 1920), (1, 1), (333, 777)];
        let mut ratio = 0.1f64;
        while ratio <= 10.0 {
            let source = ((500.0 * ratio).round() as u32, 500);
            for &target in &targets {
                let g = cover_geometry(source, target);
                assert!(g.resized.0 >= target.0 && g.resized.1 >= target.1);
                assert!(g.crop_x + target.0 <= g.resized.0);
                assert!(g.crop_y + target.1 <= g.resized.1);
                // one dimension matches, overflow only on the other
                assert!(g.resized.0 == target.0 || g.resized.1 == target.1);
            }
            ratio += 0.1;
        }
    }

    #[test]
    fn cover_fit_output_size() {
        for (w, h) in [(1200, 900), (10, 100), (100, 10), (801, 599)] {
            let fitted = CoverFit::new(800, 600).apply(&still(w, h)).unwrap();
            assert_eq!(fitted.size(), (800, 600));
            assert_eq!(fitted.frame_at(0.0).unwrap().size(), (800, 600));
        }
    }

    #[test]
    fn cover_fit_crops_symmetrically() {
        let g = cover_geometry((1200, 900), (1100, 600));
        // scale = max(0.9167, 0.6667)
        assert_eq!(g.resized, (1100, 825));
        assert_eq!((g.crop_x, g.crop_y), (0, 112));
    }
}
