use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    clip::{Clip, TimeValue},
    config::EffectsConfig,
    effects::{
        blur::{GaussianBlur, DEFAULT_BLUR_RADIUS, MAX_BLUR_RADIUS},
        center_foreground::CenterForeground,
        directive::{DirectiveOutcome, DirectiveReport, EffectDirective},
        move_horizontal::MoveHorizontally,
        resize::{EvenSize, Resize, MAX_DIMENSION},
        traits::Effect,
    },
    error::{EffectError, FactoryError, Result},
};

type EffectBuilder = Box<dyn Fn(&EffectDirective) -> Result<Box<dyn Effect>> + Send + Sync>;

/// Maps directive names to effect constructors
///
/// Built-in directives: `even_size`, `resize`, `center_foreground`, `blur`
/// and `pan`.
pub struct EffectRegistry {
    builders: HashMap<String, EffectBuilder>,
}

impl EffectRegistry {
    /// Create a registry with all built-in effects and default settings
    pub fn new() -> Self {
        Self::with_settings(&EffectsConfig::default())
    }

    /// Create a registry whose built-in effects use the given settings
    pub fn with_settings(settings: &EffectsConfig) -> Self {
        let mut registry = Self {
            builders: HashMap::new(),
        };
        registry.register_builtin_effects(settings);
        registry
    }

    fn register_builtin_effects(&mut self, settings: &EffectsConfig) {
        self.register("even_size", |d| {
            d.expect_params(0, 0)?;
            Ok(Box::new(EvenSize))
        });

        self.register("resize", |d| {
            d.expect_params(1, 1)?;
            let scale: f64 = d.param(0)?;
            if !scale.is_finite() || scale <= 0.0 {
                return Err(d.invalid(format!("scale must be a positive number, got {}", scale)));
            }
            Ok(Box::new(Resize::by_factor(scale)))
        });

        let blur = settings.clone();
        self.register("center_foreground", move |d| {
            d.expect_params(2, 3)?;
            let width: u32 = d.param(0)?;
            let height: u32 = d.param(1)?;
            let pan: f64 = d.optional_param(2)?.unwrap_or(0.0);
            if width == 0 || height == 0 {
                return Err(d.invalid("width and height must be non-zero".to_string()));
            }
            if width > MAX_DIMENSION || height > MAX_DIMENSION {
                return Err(d.invalid(format!("{}x{} exceeds the {}px size limit", width, height, MAX_DIMENSION)));
            }
            if !pan.is_finite() || pan < 0.0 {
                return Err(d.invalid(format!("pan distance must be non-negative, got {}", pan)));
            }
            if width as f64 + pan.round() > MAX_DIMENSION as f64 {
                return Err(d.invalid(format!(
                    "pan distance {} on a {}px wide frame exceeds the {}px size limit",
                    pan, width, MAX_DIMENSION
                )));
            }
            Ok(Box::new(
                CenterForeground::new(width, height)
                    .pan(pan.round() as u32)
                    .blur_radius(TimeValue::sinusoid(
                        blur.blur_base_radius,
                        blur.blur_amplitude,
                        blur.blur_frequency,
                    ))
                    .duration_policy(blur.duration_policy),
            ))
        });

        self.register("blur", |d| {
            d.expect_params(0, 1)?;
            let radius: f64 = d.optional_param(0)?.unwrap_or(DEFAULT_BLUR_RADIUS);
            if !radius.is_finite() || !(0.0..=MAX_BLUR_RADIUS).contains(&radius) {
                return Err(d.invalid(format!("radius must be between 0 and {}, got {}", MAX_BLUR_RADIUS, radius)));
            }
            Ok(Box::new(GaussianBlur::new(radius)))
        });

        self.register("pan", |d| {
            d.expect_params(2, 3)?;
            let width: u32 = d.param(0)?;
            let speed: f64 = d.param(1)?;
            let start: f64 = d.optional_param(2)?.unwrap_or(0.0);
            Ok(Box::new(MoveHorizontally::new().width(width).speed(speed).start(start)))
        });
    }

    /// Register a custom effect constructor, replacing any with the same name
    pub fn register<F>(&mut self, name: &str, builder: F)
    where
        F: Fn(&EffectDirective) -> Result<Box<dyn Effect>> + Send + Sync + 'static,
    {
        self.builders.insert(name.to_string(), Box::new(builder));
    }

    /// Construct the effect a directive names
    pub fn build(&self, directive: &EffectDirective) -> Result<Box<dyn Effect>> {
        let builder = self
            .builders
            .get(&directive.name)
            .ok_or_else(|| EffectError::Unknown { name: directive.name.clone() })?;
        builder(directive)
    }

    /// Parse and apply one directive, falling back to the input clip
    ///
    /// Unknown names and bad parameters are reported in the outcome, never
    /// returned as errors.
    pub fn apply_directive(&self, clip: &Clip, text: &str) -> (Clip, DirectiveOutcome) {
        let result = EffectDirective::parse(text)
            .and_then(|directive| self.build(&directive))
            .and_then(|effect| effect.apply(clip));

        match result {
            Ok(next) => {
                debug!("Applied effect '{}' -> {}x{}", text, next.width(), next.height());
                (next, DirectiveOutcome::Applied)
            }
            Err(FactoryError::Effect(EffectError::Unknown { name })) => {
                warn!("Unknown effect '{}' in directive '{}', skipping", name, text);
                (clip.clone(), DirectiveOutcome::SkippedUnknown)
            }
            Err(e) => {
                warn!("Skipping effect '{}': {}", text, e);
                (clip.clone(), DirectiveOutcome::SkippedInvalidParams { reason: e.to_string() })
            }
        }
    }

    /// Apply directives in order
    ///
    /// With `strict` set, the first skipped directive becomes an error.
    pub fn apply_directives<S: AsRef<str>>(
        &self,
        clip: &Clip,
        directives: &[S],
        strict: bool,
    ) -> Result<(Clip, Vec<DirectiveReport>)> {
        let mut current = clip.clone();
        let mut reports = Vec::with_capacity(directives.len());

        for text in directives {
            let text = text.as_ref();
            let (next, outcome) = self.apply_directive(&current, text);

            if strict {
                match &outcome {
                    DirectiveOutcome::Applied => {}
                    DirectiveOutcome::SkippedUnknown => {
                        let name = EffectDirective::parse(text).map(|d| d.name).unwrap_or_default();
                        return Err(EffectError::Unknown { name }.into());
                    }
                    DirectiveOutcome::SkippedInvalidParams { reason } => {
                        return Err(EffectError::ApplyFailed {
                            effect: text.to_string(),
                            reason: reason.clone(),
                        }
                        .into());
                    }
                }
            }

            current = next;
            reports.push(DirectiveReport {
                directive: text.to_string(),
                outcome,
            });
        }

        Ok((current, reports))
    }

    /// Get all available effect names, sorted
    pub fn available_effects(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builders.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl Default for EffectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
