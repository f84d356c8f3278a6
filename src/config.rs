use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::{
    effects::{blur::MAX_BLUR_RADIUS, DurationPolicy},
    error::{ConfigError, Result},
};

/// Main configuration for the imageclip factory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output encoding settings
    pub video: VideoConfig,

    /// Slideshow assembly settings
    pub slideshow: SlideshowConfig,

    /// Settings for built-in effects
    pub effects: EffectsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.video.validate()?;
        self.slideshow.validate()?;
        self.effects.validate()?;
        Ok(())
    }
}

/// Output encoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Frames rendered per second of clip time
    pub fps: f64,

    /// ffmpeg video codec
    pub codec: String,

    /// Quality setting (0-100, higher is better)
    pub quality: u8,

    /// Number of parallel frame rendering threads
    pub processing_threads: usize,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            fps: 24.0,
            codec: "libx264".to_string(),
            quality: 85,
            processing_threads: num_cpus::get(),
        }
    }
}

impl VideoConfig {
    fn validate(&self) -> Result<()> {
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(invalid("video.fps", self.fps));
        }

        if self.quality > 100 {
            return Err(invalid("video.quality", self.quality));
        }

        if self.processing_threads == 0 {
            return Err(invalid("video.processing_threads", self.processing_threads));
        }

        Ok(())
    }
}

/// Slideshow assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowConfig {
    /// Seconds each image stays on screen
    pub image_duration: f64,

    /// Effect directives applied to every image, in order
    pub effects: Vec<String>,

    /// Fail the build on the first skipped directive instead of carrying on
    pub strict: bool,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            image_duration: 10.0,
            effects: Vec::new(),
            strict: false,
        }
    }
}

impl SlideshowConfig {
    fn validate(&self) -> Result<()> {
        if !self.image_duration.is_finite() || self.image_duration <= 0.0 {
            return Err(invalid("slideshow.image_duration", self.image_duration));
        }
        Ok(())
    }
}

/// Built-in effect configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Mean background blur radius of `center_foreground`
    pub blur_base_radius: f64,

    /// How far the background blur radius swings around the mean
    pub blur_amplitude: f64,

    /// Blur oscillation frequency in Hz
    pub blur_frequency: f64,

    /// Duration of background/foreground composites
    pub duration_policy: DurationPolicy,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            blur_base_radius: 15.0,
            blur_amplitude: 5.0,
            blur_frequency: 0.5,
            duration_policy: DurationPolicy::Background,
        }
    }
}

impl EffectsConfig {
    fn validate(&self) -> Result<()> {
        if !self.blur_base_radius.is_finite() || self.blur_base_radius < 0.0 {
            return Err(invalid("effects.blur_base_radius", self.blur_base_radius));
        }

        if !self.blur_amplitude.is_finite() || self.blur_amplitude < 0.0 {
            return Err(invalid("effects.blur_amplitude", self.blur_amplitude));
        }

        // the animated radius peaks at base + amplitude
        if self.blur_base_radius + self.blur_amplitude > MAX_BLUR_RADIUS {
            return Err(invalid("effects.blur_amplitude", self.blur_amplitude));
        }

        if !self.blur_frequency.is_finite() {
            return Err(invalid("effects.blur_frequency", self.blur_frequency));
        }

        Ok(())
    }
}

fn invalid<V: ToString>(key: &str, value: V) -> crate::error::FactoryError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");

        let mut original_config = Config::default();
        original_config.slideshow.effects = vec!["even_size".to_string(), "resize,0.5".to_string()];
        original_config.effects.duration_policy = DurationPolicy::Shortest;

        original_config.save_to_file(&file_path).unwrap();
        let loaded_config = Config::from_file(&file_path).unwrap();

        assert_eq!(original_config.video.fps, loaded_config.video.fps);
        assert_eq!(original_config.slideshow.effects, loaded_config.slideshow.effects);
        assert_eq!(loaded_config.effects.duration_policy, DurationPolicy::Shortest);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("partial.toml");
        std::fs::write(&file_path, "[slideshow]\nimage_duration = 3.5\n").unwrap();

        let config = Config::from_file(&file_path).unwrap();
        assert_eq!(config.slideshow.image_duration, 3.5);
        assert_eq!(config.video.codec, "libx264");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        assert!(Config::from_file(dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.video.fps = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.slideshow.image_duration = -1.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.effects.blur_amplitude = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.effects.blur_base_radius = 1e20;
        assert!(config.validate().is_err());
    }
}
