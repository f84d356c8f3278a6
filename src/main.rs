use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};

use imageclip_factory::{
    config::Config,
    effects::DirectiveOutcome,
    slideshow::{SlideshowBuilder, VideoWriter},
};

#[derive(Parser)]
#[command(
    name = "imageclip-factory",
    version,
    about = "Turn still images into an animated slideshow video",
    long_about = "Imageclip-Factory loads each image as a clip, applies effect directives such as blur, pan and centered foregrounds, concatenates the clips in order and encodes the result with FFmpeg."
)]
struct Cli {
    /// Image files (JPEG, PNG), in playback order
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Output video file path
    #[arg(short, long)]
    output: PathBuf,

    /// Seconds each image stays on screen
    #[arg(short, long)]
    duration: Option<f64>,

    /// Effect directive applied to every image, e.g. "center_foreground,1280,720,200"
    #[arg(short, long = "effect")]
    effects: Vec<String>,

    /// Output frame rate
    #[arg(long)]
    fps: Option<f64>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Abort on the first directive that cannot be applied
    #[arg(long)]
    strict: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Imageclip-Factory v{}", env!("CARGO_PKG_VERSION"));
    info!("Images: {}", cli.images.len());
    info!("Output: {:?}", cli.output);

    let mut config = match &cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };

    // Command line flags win over the file
    if let Some(duration) = cli.duration {
        config.slideshow.image_duration = duration;
    }
    if let Some(fps) = cli.fps {
        config.video.fps = fps;
    }
    if !cli.effects.is_empty() {
        config.slideshow.effects = cli.effects.clone();
    }
    config.slideshow.strict |= cli.strict;
    config.validate()?;

    for directive in &config.slideshow.effects {
        info!("Effect: {}", directive);
    }

    let slideshow = SlideshowBuilder::new(&config).build(&cli.images)?;

    for slide in &slideshow.slides {
        for report in &slide.directives {
            match &report.outcome {
                DirectiveOutcome::Applied => {}
                DirectiveOutcome::SkippedUnknown => {
                    warn!("{}: unknown effect '{}' skipped", slide.source, report.directive)
                }
                DirectiveOutcome::SkippedInvalidParams { reason } => {
                    warn!("{}: '{}' skipped: {}", slide.source, report.directive, reason)
                }
            }
        }
    }
    for source in &slideshow.skipped {
        warn!("Skipped unreadable image: {}", source);
    }

    let mut writer = VideoWriter::new(config.video.clone());
    let encoded = writer.write(&slideshow.clip, &cli.output).await?;

    info!(
        "Slideshow complete! {} slides, {:.1}s, {} frames saved to: {}",
        slideshow.slides.len(),
        encoded.duration,
        encoded.frame_count,
        encoded.path
    );
    Ok(())
}
