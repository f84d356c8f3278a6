use std::path::Path;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::{
    clip::{Clip, Frame},
    error::{ClipError, Result},
};

/// Creates still-image clips
pub struct ClipFactory;

impl ClipFactory {
    /// Decode an image file into a clip lasting `duration` seconds
    pub fn load_image_clip<P: AsRef<Path>>(path: P, duration: f64) -> Result<Clip> {
        let path = path.as_ref();
        check_duration(duration)?;

        let image = image::open(path).map_err(|e| {
            debug!("Decoding {:?} failed: {}", path, e);
            ClipError::LoadFailed {
                path: path.display().to_string(),
            }
        })?;

        debug!("Loaded {:?} ({}x{})", path, image.width(), image.height());
        Ok(Clip::from_frame(Frame::new(image), duration))
    }

    /// Like [`load_image_clip`](Self::load_image_clip), but a failure is
    /// logged and reported as `None`
    pub fn create_image_clip<P: AsRef<Path>>(path: P, duration: f64) -> Option<Clip> {
        match Self::load_image_clip(path.as_ref(), duration) {
            Ok(clip) => Some(clip),
            Err(e) => {
                warn!("Error creating image clip from {:?}: {}", path.as_ref(), e);
                None
            }
        }
    }

    /// Build a clip from an already decoded image
    pub fn create_image_clip_from(image: DynamicImage, duration: f64) -> Result<Clip> {
        check_duration(duration)?;
        Ok(Clip::from_frame(Frame::new(image), duration))
    }

    /// Check if the file extension is a decodable image format
    pub fn is_supported<P: AsRef<Path>>(path: P) -> bool {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) => matches!(ext.to_lowercase().as_str(), "jpg" | "jpeg" | "png"),
            None => false,
        }
    }
}

fn check_duration(duration: f64) -> Result<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(ClipError::InvalidParameters {
            details: format!("clip duration must be positive, got {}", duration),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn test_create_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbImage::from_pixel(12, 8, Rgb([255, 0, 0])).save(&path).unwrap();

        let clip = ClipFactory::create_image_clip(&path, 10.0).unwrap();
        assert_eq!(clip.size(), (12, 8));
        assert_eq!(clip.duration(), 10.0);
        assert_eq!(clip.frame_at(9.9).unwrap().pixel(0, 0), &[255, 0, 0]);
    }

    #[test]
    fn test_unreadable_image_is_absent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        assert!(ClipFactory::create_image_clip(&path, 1.0).is_none());
        assert!(ClipFactory::create_image_clip(dir.path().join("missing.jpg"), 1.0).is_none());
        assert!(ClipFactory::load_image_clip(&path, 1.0).unwrap_err().is_skippable());
    }

    #[test]
    fn test_rejects_bad_duration() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        assert!(ClipFactory::create_image_clip_from(image.clone(), 0.0).is_err());
        assert!(ClipFactory::create_image_clip_from(image, 1.0).is_ok());
    }

    #[test]
    fn test_supported_extensions() {
        assert!(ClipFactory::is_supported("a.PNG"));
        assert!(ClipFactory::is_supported("b.jpeg"));
        assert!(!ClipFactory::is_supported("c.txt"));
        assert!(!ClipFactory::is_supported("noext"));
    }
}
