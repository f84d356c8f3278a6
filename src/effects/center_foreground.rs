use tracing::debug;

use crate::{
    clip::{Clip, TimeValue},
    effects::{
        blur::GaussianBlur,
        chain::EffectChain,
        composite::{DurationPolicy, LayerStack},
        move_horizontal::MoveHorizontally,
        resize::{check_dimensions, CoverFit, Resize},
        traits::{Effect, EffectMetadata},
    },
    error::{EffectError, Result},
};

/// The image, sharp and centered, over a blurred and slowly panning copy of
/// itself that fills the whole frame
pub struct CenterForeground {
    width: u32,
    height: u32,
    pan: u32,
    blur_radius: TimeValue<f64>,
    policy: DurationPolicy,
}

impl CenterForeground {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pan: 0,
            blur_radius: TimeValue::sinusoid(15.0, 5.0, 0.5),
            policy: DurationPolicy::Background,
        }
    }

    /// Distance in pixels the background travels over the clip's duration
    pub fn pan(mut self, pan: u32) -> Self {
        self.pan = pan;
        self
    }

    pub fn blur_radius(mut self, radius: impl Into<TimeValue<f64>>) -> Self {
        self.blur_radius = radius.into();
        self
    }

    pub fn duration_policy(mut self, policy: DurationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Background: cover-fit to the target widened by the pan distance,
    /// blurred, then a target-sized window slid across it
    fn background_chain(&self, duration: f64) -> Result<EffectChain> {
        let cover_width = self.width.checked_add(self.pan).ok_or_else(|| self.invalid(format!(
            "pan distance {} overflows a {}px wide frame",
            self.pan, self.width
        )))?;
        check_dimensions(self.name(), cover_width as f64, self.height as f64)?;

        let speed = if self.pan > 0 && duration > 0.0 {
            self.pan as f64 / duration
        } else {
            0.0
        };
        Ok(EffectChain::new()
            .with(CoverFit::new(cover_width, self.height))
            .with(GaussianBlur::new(self.blur_radius.clone()))
            .with(MoveHorizontally::new().window(self.width, self.height).speed(speed)))
    }

    fn invalid(&self, reason: String) -> crate::error::FactoryError {
        EffectError::InvalidParameters {
            effect: self.name().to_string(),
            reason,
        }
        .into()
    }
}

/// Largest size with the source's aspect that fits inside `target`,
/// never larger than the source itself
pub fn fit_within(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let scale = (target.0 as f64 / source.0.max(1) as f64)
        .min(target.1 as f64 / source.1.max(1) as f64)
        .min(1.0);
    (
        ((source.0 as f64 * scale).round() as u32).clamp(1, target.0.max(1)),
        ((source.1 as f64 * scale).round() as u32).clamp(1, target.1.max(1)),
    )
}

impl Effect for CenterForeground {
    fn name(&self) -> &str {
        "center_foreground"
    }

    fn description(&self) -> &str {
        "Centered image over a blurred, panning background"
    }

    fn apply(&self, clip: &Clip) -> Result<Clip> {
        if self.width == 0 || self.height == 0 {
            return Err(self.invalid(format!("target size {}x{} must be non-zero", self.width, self.height)));
        }

        let background = self.background_chain(clip.duration())?.apply(&clip.clone().without_mask())?;

        let (fw, fh) = fit_within(clip.size(), (self.width, self.height));
        let foreground = Resize::to_size(fw, fh).apply(clip)?;

        debug!(
            "center_foreground: {}x{} foreground over {}x{} background panning {}px",
            fw, fh, self.width, self.height, self.pan
        );

        Ok(LayerStack::centered(background, foreground)
            .with_policy(self.policy)
            .compose())
    }

    fn metadata(&self) -> EffectMetadata {
        EffectMetadata {
            animated: true,
            changes_size: true,
            required_parameters: vec!["width".to_string(), "height".to_string()],
            optional_parameters: vec![(
                "pan".to_string(),
                "Background pan distance in pixels over the clip (default 0)".to_string(),
            )],
        }
    }
}
