use thiserror::Error;

/// Main error type for the imageclip-factory library
#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("Clip error: {0}")]
    Clip(#[from] ClipError),

    #[error("Effect error: {0}")]
    Effect(#[from] EffectError),

    #[error("Slideshow error: {0}")]
    Slideshow(#[from] SlideshowError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Clip construction and frame rendering errors
#[derive(Error, Debug)]
pub enum ClipError {
    #[error("Failed to load image file: {path}")]
    LoadFailed { path: String },

    #[error("Unsupported pixel layout: {layout}")]
    UnsupportedLayout { layout: String },

    #[error("Frame render failed at t={time:.3}s: {reason}")]
    FrameRender { time: f64, reason: String },

    #[error("Invalid clip parameters: {details}")]
    InvalidParameters { details: String },
}

/// Effect construction and directive errors
#[derive(Error, Debug)]
pub enum EffectError {
    #[error("Unknown effect: {name}")]
    Unknown { name: String },

    #[error("Invalid parameters for {effect}: {reason}")]
    InvalidParameters { effect: String, reason: String },

    #[error("Empty effect directive")]
    EmptyDirective,

    #[error("Effect application failed: {effect} - {reason}")]
    ApplyFailed { effect: String, reason: String },
}

/// Slideshow assembly and output errors
#[derive(Error, Debug)]
pub enum SlideshowError {
    #[error("No valid clips to build a slideshow from")]
    NoValidClips,

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Frame rate must be positive, got {fps}")]
    InvalidFrameRate { fps: f64 },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using FactoryError
pub type Result<T> = std::result::Result<T, FactoryError>;

impl FactoryError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Clip(ClipError::LoadFailed { .. }) => true,
            _ => false,
        }
    }

    /// Whether the slideshow builder may skip the offending item and carry on
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::Clip(ClipError::LoadFailed { .. })
                | Self::Image(_)
                | Self::Effect(EffectError::Unknown { .. })
                | Self::Effect(EffectError::InvalidParameters { .. })
                | Self::Effect(EffectError::EmptyDirective)
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Clip(ClipError::LoadFailed { path }) => {
                format!("Could not load image '{}'. Please check the file exists and is a supported format.", path)
            }
            Self::Effect(EffectError::Unknown { name }) => {
                format!(
                    "Effect '{}' not found. Available effects: even_size, resize, center_foreground, blur, pan",
                    name
                )
            }
            Self::Slideshow(SlideshowError::NoValidClips) => {
                "None of the given images could be turned into a clip.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
