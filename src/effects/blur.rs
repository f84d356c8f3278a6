use crate::{
    clip::{ApplyTo, Clip, Frame, TimeValue},
    effects::traits::{Effect, EffectMetadata},
    error::{ClipError, Result},
};

pub const DEFAULT_BLUR_RADIUS: f64 = 5.0;

/// Largest radius accepted from directives and configuration
pub const MAX_BLUR_RADIUS: f64 = 1000.0;

/// Gaussian blur with a radius that may change over time
pub struct GaussianBlur {
    radius: TimeValue<f64>,
    apply_to: ApplyTo,
}

impl GaussianBlur {
    pub fn new(radius: impl Into<TimeValue<f64>>) -> Self {
        Self {
            radius: radius.into(),
            apply_to: ApplyTo::Video,
        }
    }

    pub fn apply_to(mut self, apply_to: ApplyTo) -> Self {
        self.apply_to = apply_to;
        self
    }

    pub fn radius(&self) -> &TimeValue<f64> {
        &self.radius
    }
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self::new(DEFAULT_BLUR_RADIUS)
    }
}

impl Effect for GaussianBlur {
    fn name(&self) -> &str {
        "blur"
    }

    fn description(&self) -> &str {
        "Gaussian blur whose radius may be animated over time"
    }

    fn apply(&self, clip: &Clip) -> Result<Clip> {
        let radius = self.radius.clone();
        Ok(clip.transform(clip.size(), self.apply_to, move |get_frame, t| {
            let frame = get_frame(t)?;
            blur_frame(&frame, kernel_size(radius.resolve(t)))
                .map_err(|reason| ClipError::FrameRender { time: t, reason }.into())
        }))
    }

    fn metadata(&self) -> EffectMetadata {
        EffectMetadata {
            animated: !self.radius.is_constant(),
            changes_size: false,
            required_parameters: vec![],
            optional_parameters: vec![("radius".to_string(), "Blur radius in pixels (default 5)".to_string())],
        }
    }
}

/// Odd kernel size for a blur radius: `max(3, 2 * floor(radius) + 1)`
///
/// Negative and non-finite radii count as 0. Huge radii saturate at the
/// largest odd `usize`.
pub fn kernel_size(radius: f64) -> usize {
    let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    (radius.floor() as usize).saturating_mul(2).saturating_add(1).max(3)
}

/// Standard deviation derived from the kernel size
pub fn sigma_for_kernel(ksize: usize) -> f64 {
    0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

fn gaussian_kernel(ksize: usize) -> Vec<f32> {
    let sigma = sigma_for_kernel(ksize);
    let r = (ksize / 2) as f64;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f64> = (0..ksize)
        .map(|i| {
            let x = i as f64 - r;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Mirror an out-of-range index back into `0..len`, excluding the edge pixel
fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let i = i.rem_euclid(period);
    if i >= len as isize {
        (period - i) as usize
    } else {
        i as usize
    }
}

/// Separable Gaussian convolution of every channel
///
/// Returns a new frame with the same size and channel count. Kernels wider
/// than `2 * max(width, height) + 1` are narrowed to that size.
pub fn blur_frame(frame: &Frame, ksize: usize) -> std::result::Result<Frame, String> {
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let c = frame.channels();
    if w == 0 || h == 0 {
        return Ok(frame.clone());
    }
    let ksize = ksize.min(2 * w.max(h) + 1);

    let kernel = gaussian_kernel(ksize);
    let r = (ksize / 2) as isize;
    let src = frame.as_bytes();

    let mut tmp = vec![0f32; src.len()];
    for y in 0..h {
        let row = y * w * c;
        for x in 0..w {
            let mut acc = [0f32; 4];
            for (ki, &kw) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + ki as isize - r, w);
                let idx = row + sx * c;
                for ch in 0..c {
                    acc[ch] += kw * src[idx + ch] as f32;
                }
            }
            let out = row + x * c;
            tmp[out..out + c].copy_from_slice(&acc[..c]);
        }
    }

    let mut dst = vec![0u8; src.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f32; 4];
            for (ki, &kw) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + ki as isize - r, h);
                let idx = (sy * w + x) * c;
                for ch in 0..c {
                    acc[ch] += kw * tmp[idx + ch];
                }
            }
            let out = (y * w + x) * c;
            for ch in 0..c {
                dst[out + ch] = acc[ch].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Frame::from_raw(w as u32, h as u32, c, dst)
        .ok_or_else(|| format!("cannot rebuild a {}-channel {}x{} frame", c, w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn kernel_size_is_odd_and_at_least_three() {
        assert_eq!(kernel_size(0.0), 3);
        assert_eq!(kernel_size(0.9), 3);
        assert_eq!(kernel_size(1.0), 3);
        assert_eq!(kernel_size(2.0), 5);
        assert_eq!(kernel_size(5.0), 11);
        assert_eq!(kernel_size(-4.0), 3);
        assert_eq!(kernel_size(f64::NAN), 3);
        assert_eq!(kernel_size(1e20), usize::MAX);
        assert_eq!(kernel_size(f64::MAX) % 2, 1);

        for step in 0..400 {
            let k = kernel_size(step as f64 * 0.25);
            assert!(k >= 3);
            assert_eq!(k % 2, 1);
        }
    }

    #[test]
    fn kernel_is_normalised_and_symmetric() {
        let k = gaussian_kernel(7);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(k[0], k[6]);
        assert!(k[3] > k[2]);
    }

    #[test]
    fn reflect_101_mirrors_without_repeating_edge() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(2, 5), 2);
        assert_eq!(reflect_101(-7, 1), 0);
        // kernels wider than the frame keep bouncing
        assert!(reflect_101(-13, 3) < 3);
    }

    #[test]
    fn constant_frame_is_unchanged() {
        let frame = Frame::new_filled(6, 5, [40, 80, 120]);
        let out = blur_frame(&frame, 7).unwrap();
        assert_eq!(out.as_bytes(), frame.as_bytes());
    }

    #[test]
    fn blur_keeps_size_and_channels() {
        let mask = Frame::new_mask(9, 4, 200);
        let out = blur_frame(&mask, 5).unwrap();
        assert_eq!(out.size(), (9, 4));
        assert_eq!(out.channels(), 1);

        let rgba = Frame::from_raw(3, 3, 4, vec![7; 36]).unwrap();
        assert_eq!(blur_frame(&rgba, 3).unwrap().channels(), 4);
    }

    #[test]
    fn blur_spreads_a_single_bright_pixel() {
        let mut img = RgbImage::new(7, 7);
        img.put_pixel(3, 3, Rgb([255, 255, 255]));
        let frame = Frame::from_rgb(img);

        let out = blur_frame(&frame, 5).unwrap();
        assert!(out.pixel(3, 3)[0] < 255);
        assert!(out.pixel(2, 3)[0] > 0);
        // input buffer is untouched
        assert_eq!(frame.pixel(3, 3), &[255, 255, 255]);
    }

    #[test]
    fn huge_radius_renders_with_bounded_kernel() {
        let clip = Clip::from_frame(Frame::new_filled(6, 5, [40, 80, 120]), 1.0);
        let blurred = GaussianBlur::new(1e20).apply(&clip).unwrap();
        let frame = blurred.frame_at(0.0).unwrap();
        assert_eq!(frame.as_bytes(), clip.frame_at(0.0).unwrap().as_bytes());

        let mut img = RgbImage::new(4, 3);
        img.put_pixel(0, 0, Rgb([255, 255, 255]));
        let out = blur_frame(&Frame::from_rgb(img), usize::MAX).unwrap();
        assert_eq!(out.size(), (4, 3));
        assert!(out.pixel(3, 2)[0] > 0);
    }

    #[test]
    fn animated_radius_changes_output() {
        let mut img = RgbImage::new(15, 15);
        img.put_pixel(7, 7, Rgb([255, 0, 0]));
        let clip = Clip::from_frame(Frame::from_rgb(img), 2.0);

        let blurred = GaussianBlur::new(TimeValue::linear(0.0, 4.0)).apply(&clip).unwrap();
        assert_eq!(blurred.size(), (15, 15));
        assert!(GaussianBlur::new(TimeValue::linear(0.0, 4.0)).metadata().animated);

        let early = blurred.frame_at(0.0).unwrap();
        let late = blurred.frame_at(1.5).unwrap();
        assert!(late.pixel(7, 7)[0] < early.pixel(7, 7)[0]);
    }
}
