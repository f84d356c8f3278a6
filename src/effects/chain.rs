use tracing::debug;

use crate::{clip::Clip, effects::traits::Effect, error::Result};

/// Ordered list of effects applied left to right
///
/// Each effect wraps the clip produced by the previous one, so order matters:
/// a blur after a pan blurs the panned window, a pan after a blur moves over
/// the blurred frame.
#[derive(Default)]
pub struct EffectChain {
    effects: Vec<Box<dyn Effect>>,
}

impl EffectChain {
    pub fn new() -> Self {
        Self { effects: Vec::new() }
    }

    pub fn with<E: Effect + 'static>(mut self, effect: E) -> Self {
        self.effects.push(Box::new(effect));
        self
    }

    pub fn push(&mut self, effect: Box<dyn Effect>) {
        self.effects.push(effect);
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.effects.iter().map(|effect| effect.name()).collect()
    }

    pub fn apply(&self, clip: &Clip) -> Result<Clip> {
        self.effects.iter().try_fold(clip.clone(), |clip, effect| {
            debug!("Applying {} to {}x{} clip", effect.name(), clip.width(), clip.height());
            effect.apply(&clip)
        })
    }
}

impl Effect for EffectChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn description(&self) -> &str {
        "Sequence of effects"
    }

    fn apply(&self, clip: &Clip) -> Result<Clip> {
        EffectChain::apply(self, clip)
    }
}

impl FromIterator<Box<dyn Effect>> for EffectChain {
    fn from_iter<I: IntoIterator<Item = Box<dyn Effect>>>(iter: I) -> Self {
        Self { effects: iter.into_iter().collect() }
    }
}
