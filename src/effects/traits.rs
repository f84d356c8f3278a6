use crate::{clip::Clip, error::Result};

/// Core trait that all frame transforms implement
///
/// An effect never renders anything when applied: it returns a new [`Clip`]
/// whose frame sources wrap the input's, with the effect's parameters
/// captured in the closures.
pub trait Effect: Send + Sync {
    /// Returns the unique name of this effect
    fn name(&self) -> &str;

    /// Returns a human-readable description of this effect
    fn description(&self) -> &str;

    /// Wrap `clip` with this effect
    ///
    /// # Returns
    ///
    /// The transformed clip, or an error if the effect's parameters cannot be
    /// used with this clip (for example a pan window larger than the clip).
    fn apply(&self, clip: &Clip) -> Result<Clip>;

    /// Get effect-specific metadata
    fn metadata(&self) -> EffectMetadata {
        EffectMetadata::default()
    }
}

/// Metadata about an effect's behaviour and directive parameters
#[derive(Debug, Clone, Default)]
pub struct EffectMetadata {
    /// Whether the rendered output depends on the frame time
    pub animated: bool,

    /// Whether the effect changes the clip size
    pub changes_size: bool,

    /// Positional directive parameters that must be present
    pub required_parameters: Vec<String>,

    /// Optional positional directive parameters with descriptions
    pub optional_parameters: Vec<(String, String)>,
}
