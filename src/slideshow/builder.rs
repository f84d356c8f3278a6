use std::path::Path;

use tracing::{debug, info, warn};

use crate::{
    clip::{Clip, ClipSequence},
    config::{Config, SlideshowConfig},
    effects::{DirectiveReport, EffectRegistry},
    error::{Result, SlideshowError},
    slideshow::factory::ClipFactory,
};

/// Directive outcomes for one slide
#[derive(Debug, Clone)]
pub struct SlideReport {
    pub source: String,
    pub directives: Vec<DirectiveReport>,
}

/// A finished slideshow clip plus what happened to each slide
#[derive(Debug, Clone)]
pub struct Slideshow {
    pub clip: Clip,
    pub slides: Vec<SlideReport>,
    /// Inputs that could not be turned into a clip
    pub skipped: Vec<String>,
}

/// Turns a list of images into one concatenated clip
///
/// Each image becomes a still clip, gets the configured effect directives
/// applied, and is appended to the sequence. Images that fail to load are
/// skipped; only an empty result is an error.
pub struct SlideshowBuilder {
    config: SlideshowConfig,
    registry: EffectRegistry,
}

impl SlideshowBuilder {
    /// Create a builder with the built-in effects configured from `config`
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.slideshow.clone(),
            registry: EffectRegistry::with_settings(&config.effects),
        }
    }

    /// Use a custom effect registry
    pub fn with_registry(mut self, registry: EffectRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    /// Build a slideshow from image files, in the given order
    pub fn build<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Slideshow> {
        info!("Building slideshow from {} images", paths.len());

        let mut sequence = ClipSequence::new();
        let mut slides = Vec::new();
        let mut skipped = Vec::new();

        for path in paths {
            let path = path.as_ref();
            let source = path.display().to_string();

            let Some(clip) = ClipFactory::create_image_clip(path, self.config.image_duration) else {
                skipped.push(source);
                continue;
            };

            let (clip, report) = self.prepare_slide(source, clip)?;
            sequence.add_clip(clip);
            slides.push(report);
        }

        self.finish(sequence, slides, skipped)
    }

    /// Build a slideshow from clips that already exist
    pub fn build_from_clips<I>(&self, clips: I) -> Result<Slideshow>
    where
        I: IntoIterator<Item = (String, Clip)>,
    {
        let mut sequence = ClipSequence::new();
        let mut slides = Vec::new();

        for (source, clip) in clips {
            let (clip, report) = self.prepare_slide(source, clip)?;
            sequence.add_clip(clip);
            slides.push(report);
        }

        self.finish(sequence, slides, Vec::new())
    }

    fn prepare_slide(&self, source: String, clip: Clip) -> Result<(Clip, SlideReport)> {
        let (clip, directives) = self
            .registry
            .apply_directives(&clip, self.config.effects.as_slice(), self.config.strict)?;

        debug!("Slide {} ready: {}x{} ({:.2}s)", source, clip.width(), clip.height(), clip.duration());
        Ok((clip, SlideReport { source, directives }))
    }

    fn finish(&self, sequence: ClipSequence, slides: Vec<SlideReport>, skipped: Vec<String>) -> Result<Slideshow> {
        if sequence.is_empty() {
            warn!("No valid clips, {} inputs skipped", skipped.len());
            return Err(SlideshowError::NoValidClips.into());
        }

        if !skipped.is_empty() {
            warn!("Skipped {} unreadable images", skipped.len());
        }

        let clip = sequence.into_clip()?;
        info!(
            "Slideshow ready: {} slides, {}x{}, {:.1}s",
            slides.len(),
            clip.width(),
            clip.height(),
            clip.duration()
        );

        Ok(Slideshow { clip, slides, skipped })
    }
}
