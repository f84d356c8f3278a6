use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use rayon::prelude::*;
use tokio::task;
use tracing::{debug, info, warn};

use crate::{
    clip::{Clip, Frame},
    config::VideoConfig,
    effects::{Effect, EvenSize},
    error::{FactoryError, Result, SlideshowError},
};

/// Represents an encoded video output
#[derive(Debug, Clone)]
pub struct EncodedVideo {
    pub path: String,
    pub duration: f64,
    pub frame_count: usize,
    pub file_size: u64,
}

/// Evenly spaced render times `i / fps` covering `duration`
///
/// There is always at least one frame.
pub fn frame_times(duration: f64, fps: f64) -> Result<Vec<f64>> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(SlideshowError::InvalidFrameRate { fps }.into());
    }
    let count = ((duration.max(0.0) * fps).round() as usize).max(1);
    Ok((0..count).map(|i| i as f64 / fps).collect())
}

/// Render every frame of `clip` at `fps`, in parallel
pub fn render_frames(clip: &Clip, fps: f64) -> Result<Vec<Frame>> {
    let times = frame_times(clip.duration(), fps)?;
    debug!("Rendering {} frames of a {}x{} clip", times.len(), clip.width(), clip.height());
    times.par_iter().map(|&t| clip.frame_at(t)).collect()
}

/// Writes clips to video files through an external ffmpeg process
pub struct VideoWriter {
    params: VideoConfig,
    temp_dir: Option<PathBuf>,
}

impl VideoWriter {
    pub fn new(params: VideoConfig) -> Self {
        Self {
            params,
            temp_dir: None,
        }
    }

    pub fn check_ffmpeg_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    fn ensure_temp_dir(&mut self) -> Result<PathBuf> {
        if let Some(ref temp_dir) = self.temp_dir {
            return Ok(temp_dir.clone());
        }

        let temp_dir = std::env::temp_dir().join(format!("imageclip_factory_{}", std::process::id()));
        create_dir_all(&temp_dir)?;
        self.temp_dir = Some(temp_dir.clone());
        Ok(temp_dir)
    }

    /// Render `clip` and encode it to `output_path`
    pub async fn write<P: AsRef<Path>>(&mut self, clip: &Clip, output_path: P) -> Result<EncodedVideo> {
        let output_path = output_path.as_ref();

        if !Self::check_ffmpeg_available() {
            return Err(SlideshowError::EncodingFailed {
                reason: "FFmpeg not found. Please install FFmpeg.".to_string(),
            }
            .into());
        }

        // yuv420p needs even dimensions
        let clip = if clip.width() % 2 == 1 || clip.height() % 2 == 1 {
            warn!("Clip is {}x{}, cropping to even dimensions", clip.width(), clip.height());
            EvenSize.apply(clip)?
        } else {
            clip.clone()
        };

        info!("Writing {}x{} clip ({:.1}s at {} fps) to {:?}",
              clip.width(), clip.height(), clip.duration(), self.params.fps, output_path);

        let temp_dir = self.ensure_temp_dir()?;
        let frame_paths = self.save_frames_as_images(&clip, &temp_dir)?;
        let frame_list_path = self.create_frame_list(&frame_paths, &temp_dir)?;

        self.encode_video_from_frames(&frame_list_path, output_path).await?;

        let metadata = std::fs::metadata(output_path)?;
        let encoded = EncodedVideo {
            path: output_path.display().to_string(),
            duration: clip.duration(),
            frame_count: frame_paths.len(),
            file_size: metadata.len(),
        };

        info!("Video written: {} frames, {:.1} MB", encoded.frame_count,
              encoded.file_size as f64 / 1024.0 / 1024.0);
        Ok(encoded)
    }

    /// Render frames in parallel and save each one as a PNG
    fn save_frames_as_images(&self, clip: &Clip, temp_dir: &Path) -> Result<Vec<PathBuf>> {
        let times = frame_times(clip.duration(), self.params.fps)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.params.processing_threads)
            .build()
            .map_err(|e| FactoryError::generic(format!("Failed to build render pool: {}", e)))?;

        debug!("Saving {} frames to directory: {:?}", times.len(), temp_dir);

        let frame_paths = pool.install(|| {
            times
                .par_iter()
                .enumerate()
                .map(|(i, &t)| {
                    let frame_path = temp_dir.join(format!("frame_{:06}.png", i));
                    let frame = Frame::from_rgb(clip.frame_at(t)?.to_rgb8());
                    frame.save_png(&frame_path).map_err(|e| SlideshowError::EncodingFailed {
                        reason: format!("Failed to save frame {}: {}", i, e),
                    })?;
                    Ok(frame_path)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        info!("Saved {} frames as images", frame_paths.len());
        Ok(frame_paths)
    }

    fn create_frame_list(&self, frame_paths: &[PathBuf], temp_dir: &Path) -> Result<PathBuf> {
        let list_path = temp_dir.join("frame_list.txt");
        let mut file = File::create(&list_path)?;

        let frame_duration = 1.0 / self.params.fps;

        for frame_path in frame_paths {
            let absolute_path = frame_path.canonicalize().unwrap_or_else(|_| frame_path.clone());
            writeln!(file, "file '{}'", absolute_path.display())?;
            writeln!(file, "duration {:.6}", frame_duration)?;
        }

        // the concat demuxer ignores the duration of the last entry
        if let Some(last_frame) = frame_paths.last() {
            let absolute_path = last_frame.canonicalize().unwrap_or_else(|_| last_frame.clone());
            writeln!(file, "file '{}'", absolute_path.display())?;
        }

        Ok(list_path)
    }

    async fn encode_video_from_frames(&self, frame_list_path: &Path, output_path: &Path) -> Result<()> {
        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-f").arg("concat")
            .arg("-safe").arg("0")
            .arg("-i").arg(frame_list_path)
            .arg("-c:v").arg(&self.params.codec)
            .arg("-r").arg(self.params.fps.to_string())
            .arg("-pix_fmt").arg("yuv420p")
            .arg("-crf").arg(quality_to_crf(self.params.quality).to_string())
            .arg("-an")
            .arg("-y")
            .arg(output_path);

        let output = task::spawn_blocking(move || cmd.output()).await
            .map_err(|e| SlideshowError::EncodingFailed {
                reason: format!("Failed to spawn FFmpeg process: {}", e),
            })?
            .map_err(|e| SlideshowError::EncodingFailed {
                reason: format!("FFmpeg execution failed: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SlideshowError::EncodingFailed {
                reason: format!("FFmpeg failed: {}", stderr),
            }.into());
        }

        Ok(())
    }

    pub fn cleanup(&mut self) -> Result<()> {
        if let Some(temp_dir) = &self.temp_dir {
            if let Err(e) = std::fs::remove_dir_all(temp_dir) {
                warn!("Failed to remove temporary directory: {}", e);
            }
            self.temp_dir = None;
        }
        Ok(())
    }
}

impl Drop for VideoWriter {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Map 0-100 quality onto x264's CRF scale (51 worst, 0 lossless)
pub fn quality_to_crf(quality: u8) -> u8 {
    let quality = quality.min(100);
    51 - ((quality as f32 / 100.0) * 51.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::MoveHorizontally;
    use image::{Rgb, RgbImage};
    use tempfile::tempdir;

    #[test]
    fn test_frame_times() {
        let times = frame_times(5.0, 24.0).unwrap();
        assert_eq!(times.len(), 120);
        assert_eq!(times[0], 0.0);
        assert!((times[119] - 119.0 / 24.0).abs() < 1e-12);

        assert_eq!(frame_times(0.0, 30.0).unwrap(), vec![0.0]);
        assert!(frame_times(1.0, 0.0).is_err());
        assert!(frame_times(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_render_frames_follows_time() {
        let img = RgbImage::from_fn(40, 4, |x, _| Rgb([x as u8, 0, 0]));
        let clip = Clip::from_frame(Frame::from_rgb(img), 1.0);
        let panned = MoveHorizontally::new().width(10).speed(20.0).apply(&clip).unwrap();

        let frames = render_frames(&panned, 10.0).unwrap();
        assert_eq!(frames.len(), 10);
        let offsets: Vec<u8> = frames.iter().map(|f| f.pixel(0, 0)[0]).collect();
        assert_eq!(offsets, vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18]);
    }

    #[test]
    fn test_quality_to_crf() {
        assert_eq!(quality_to_crf(0), 51);
        assert_eq!(quality_to_crf(100), 0);
        assert_eq!(quality_to_crf(255), 0);
        assert!(quality_to_crf(85) < 10);
    }

    #[test]
    fn test_frame_list_format() {
        let dir = tempdir().unwrap();
        let writer = VideoWriter::new(VideoConfig {
            fps: 25.0,
            ..VideoConfig::default()
        });
        let frames = vec![dir.path().join("frame_000000.png"), dir.path().join("frame_000001.png")];

        let list = writer.create_frame_list(&frames, dir.path()).unwrap();
        let content = std::fs::read_to_string(list).unwrap();
        assert_eq!(content.matches("file '").count(), 3);
        assert_eq!(content.matches("duration 0.040000").count(), 2);
    }

    #[tokio::test]
    async fn test_write_encodes_or_reports_missing_ffmpeg() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        let mut writer = VideoWriter::new(VideoConfig {
            fps: 4.0,
            processing_threads: 1,
            ..VideoConfig::default()
        });
        let clip = Clip::from_frame(Frame::new_filled(15, 9, [200, 10, 10]), 0.5);

        match writer.write(&clip, &output).await {
            Ok(encoded) => {
                assert_eq!(encoded.frame_count, 2);
                assert!(output.exists());
            }
            Err(e) => assert!(matches!(
                e,
                FactoryError::Slideshow(SlideshowError::EncodingFailed { .. })
            )),
        }
        writer.cleanup().unwrap();
    }

    #[test]
    fn test_saves_png_frames() {
        let dir = tempdir().unwrap();
        let writer = VideoWriter::new(VideoConfig {
            fps: 4.0,
            processing_threads: 2,
            ..VideoConfig::default()
        });
        let clip = Clip::from_frame(Frame::new_filled(6, 4, [7, 7, 7]), 1.0);

        let paths = writer.save_frames_as_images(&clip, dir.path()).unwrap();
        assert_eq!(paths.len(), 4);
        assert!(paths.iter().all(|p| p.exists()));
    }
}
