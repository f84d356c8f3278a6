use crate::{
    clip::{ApplyTo, Clip},
    effects::traits::{Effect, EffectMetadata},
    error::{EffectError, Result},
};

/// Pans a fixed-size window across the clip from left to right (or back)
///
/// The window starts at `x_start` and moves `x_speed` pixels per second. Its
/// top edge stays at `y = 0`.
#[derive(Debug, Clone)]
pub struct MoveHorizontally {
    width: Option<u32>,
    height: Option<u32>,
    x_speed: f64,
    x_start: f64,
    apply_to: ApplyTo,
}

impl MoveHorizontally {
    /// A window the size of the clip, not moving, applied to video and mask
    pub fn new() -> Self {
        Self {
            width: None,
            height: None,
            x_speed: 0.0,
            x_start: 0.0,
            apply_to: ApplyTo::Both,
        }
    }

    pub fn window(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Horizontal speed in pixels per second; negative moves left
    pub fn speed(mut self, x_speed: f64) -> Self {
        self.x_speed = x_speed;
        self
    }

    pub fn start(mut self, x_start: f64) -> Self {
        self.x_start = x_start;
        self
    }

    pub fn apply_to(mut self, apply_to: ApplyTo) -> Self {
        self.apply_to = apply_to;
        self
    }
}

impl Default for MoveHorizontally {
    fn default() -> Self {
        Self::new()
    }
}

/// Left edge of the window at time `t`, always within `0..=x_max`
pub fn pan_offset(t: f64, x_start: f64, x_speed: f64, x_max: u32) -> u32 {
    let x = x_start + x_speed * t;
    // NaN saturates to 0 in the cast
    x.clamp(0.0, x_max as f64) as u32
}

impl Effect for MoveHorizontally {
    fn name(&self) -> &str {
        "pan"
    }

    fn description(&self) -> &str {
        "Horizontally moving crop window"
    }

    fn apply(&self, clip: &Clip) -> Result<Clip> {
        let width = self.width.unwrap_or(clip.width());
        let height = self.height.unwrap_or(clip.height());

        if width == 0 || height == 0 || width > clip.width() || height > clip.height() {
            return Err(EffectError::InvalidParameters {
                effect: self.name().to_string(),
                reason: format!(
                    "window {}x{} does not fit inside a {}x{} clip",
                    width,
                    height,
                    clip.width(),
                    clip.height()
                ),
            }
            .into());
        }

        let x_max = clip.width() - width;
        let (x_start, x_speed) = (self.x_start, self.x_speed);

        Ok(clip.transform((width, height), self.apply_to, move |get_frame, t| {
            let x = pan_offset(t, x_start, x_speed, x_max);
            Ok(get_frame(t)?.crop(x, 0, width, height))
        }))
    }

    fn metadata(&self) -> EffectMetadata {
        EffectMetadata {
            animated: self.x_speed != 0.0,
            changes_size: true,
            required_parameters: vec!["width".to_string(), "speed".to_string()],
            optional_parameters: vec![("start".to_string(), "Initial x offset in pixels (default 0)".to_string())],
        }
    }
}
