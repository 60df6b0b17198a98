// Probe LibAV adapter - Media file analysis using libav

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ffmpeg_next::{codec, decoder, format, frame, media};
use tracing::debug;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Packets read while looking for a decoded frame that carries a display matrix
const ROTATION_PACKET_LIMIT: usize = 128;

/// LibAV-based media probing adapter
pub struct LibavProbeAdapter;

impl LibavProbeAdapter {
    /// Create new LibAV probing adapter
    pub fn new() -> Self {
        Self
    }

    /// Open the container and read the facts the pipeline needs
    fn probe_blocking(path: &Path) -> Result<MediaInfo, DomainError> {
        if !path.exists() {
            return Err(DomainError::FileNotFound(path.display().to_string()));
        }

        let file_size = std::fs::metadata(path)
            .map_err(|e| DomainError::ProbeFail(format!("Failed to get file metadata: {}", e)))?
            .len();

        let mut ictx = format::input(path).map_err(|e| {
            DomainError::ProbeFail(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let (stream_index, parameters, stream_duration, time_base, rate, rotate_tag) = {
            let video = ictx.streams().best(media::Type::Video).ok_or_else(|| {
                DomainError::ProbeFail(format!("No video stream in {}", path.display()))
            })?;
            let rotate_tag = video
                .metadata()
                .get("rotate")
                .and_then(|value| value.trim().parse::<f64>().ok());
            (
                video.index(),
                video.parameters(),
                video.duration(),
                video.time_base(),
                video.avg_frame_rate(),
                rotate_tag,
            )
        };

        let mut decoder = codec::context::Context::from_parameters(parameters)
            .and_then(|context| context.decoder().video())
            .map_err(|e| DomainError::ProbeFail(format!("Failed to read video stream: {}", e)))?;

        let container_duration = ictx.duration();
        let duration = if container_duration > 0 {
            container_duration as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE)
        } else if stream_duration > 0 {
            stream_duration as f64 * f64::from(time_base)
        } else {
            return Err(DomainError::ProbeFail(format!(
                "Could not determine duration of {}",
                path.display()
            )));
        };

        let frame_rate = if rate.denominator() != 0 {
            f64::from(rate)
        } else {
            0.0
        };

        let format_name = ictx.format().name().to_string();
        let has_audio = ictx.streams().best(media::Type::Audio).is_some();
        let coded = FrameSize::new(decoder.width(), decoder.height());

        // The ffmpeg executable auto-rotates, so report the frame it will see
        let rotation = match rotate_tag {
            Some(degrees) => degrees,
            None => first_frame_rotation(&mut ictx, &mut decoder, stream_index).unwrap_or(0.0),
        };
        let displayed = display_frame_size(coded, rotation);

        let info = MediaInfo {
            path: path.to_path_buf(),
            format: format_name,
            duration,
            width: displayed.width,
            height: displayed.height,
            frame_rate,
            has_audio,
            file_size,
        };

        if info.width == 0 || info.height == 0 {
            return Err(DomainError::ProbeFail(format!(
                "Video dimensions of {} cannot be zero",
                path.display()
            )));
        }

        Ok(info)
    }
}

impl Default for LibavProbeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotation in degrees from the display matrix of the first decoded frame
fn first_frame_rotation(
    ictx: &mut format::context::Input,
    decoder: &mut decoder::Video,
    stream_index: usize,
) -> Option<f64> {
    let mut decoded = frame::Video::empty();
    for (stream, packet) in ictx.packets().take(ROTATION_PACKET_LIMIT) {
        if stream.index() != stream_index || decoder.send_packet(&packet).is_err() {
            continue;
        }
        if decoder.receive_frame(&mut decoded).is_ok() {
            return frame_rotation(&decoded);
        }
    }

    decoder.send_eof().ok()?;
    decoder.receive_frame(&mut decoded).ok()?;
    frame_rotation(&decoded)
}

fn frame_rotation(decoded: &frame::Video) -> Option<f64> {
    decoded
        .side_data(frame::side_data::Type::DisplayMatrix)
        .and_then(|side_data| rotation_from_display_matrix(side_data.data()))
}

/// Counter-clockwise rotation encoded in a 3x3 16.16 fixed-point display matrix
pub fn rotation_from_display_matrix(data: &[u8]) -> Option<f64> {
    if data.len() < 36 {
        return None;
    }
    let cell = |i: usize| {
        let at = i * 4;
        f64::from(i32::from_ne_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]))
    };

    let scale_x = cell(0).hypot(cell(3));
    let scale_y = cell(1).hypot(cell(4));
    if scale_x == 0.0 || scale_y == 0.0 {
        return None;
    }
    Some(-(cell(1) / scale_y).atan2(cell(0) / scale_x).to_degrees())
}

/// Frame size after applying a rotation; quarter turns swap the axes
pub fn display_frame_size(coded: FrameSize, rotation: f64) -> FrameSize {
    let quarter_turns = ((rotation / 90.0).round() as i64).rem_euclid(4);
    if quarter_turns % 2 == 1 {
        FrameSize::new(coded.height, coded.width)
    } else {
        coded
    }
}

#[async_trait]
impl MediaProbePort for LibavProbeAdapter {
    async fn probe(&self, path: &Path) -> Result<MediaInfo, DomainError> {
        let owned: PathBuf = path.to_path_buf();
        let info = tokio::task::spawn_blocking(move || Self::probe_blocking(&owned))
            .await
            .map_err(|e| DomainError::ProbeFail(format!("Probe task failed: {}", e)))??;

        debug!(
            path = %info.path.display(),
            duration = info.duration,
            width = info.width,
            height = info.height,
            has_audio = info.has_audio,
            "Probed media"
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display_matrix(degrees: f64) -> Vec<u8> {
        let radians = -degrees.to_radians();
        let fixed = |v: f64| (v * 65536.0).round() as i32;
        let cells = [
            fixed(radians.cos()),
            fixed(radians.sin()),
            0,
            fixed(-radians.sin()),
            fixed(radians.cos()),
            0,
            0,
            0,
            1 << 30,
        ];
        cells.iter().flat_map(|c| c.to_ne_bytes()).collect()
    }

    #[test]
    fn test_rotation_from_display_matrix() {
        for degrees in [0.0, 90.0, 180.0, -90.0] {
            let rotation = rotation_from_display_matrix(&display_matrix(degrees)).unwrap();
            let diff = (rotation - degrees).rem_euclid(360.0);
            assert!(diff < 0.01 || diff > 359.99, "{} read back as {}", degrees, rotation);
        }
    }

    #[test]
    fn test_rotation_from_short_or_degenerate_matrix() {
        assert_eq!(rotation_from_display_matrix(&[0u8; 12]), None);
        assert_eq!(rotation_from_display_matrix(&[0u8; 36]), None);
    }

    #[test]
    fn test_quarter_turns_swap_frame_axes() {
        let coded = FrameSize::new(1920, 1080);
        assert_eq!(display_frame_size(coded, 0.0), coded);
        assert_eq!(display_frame_size(coded, 180.0), coded);
        assert_eq!(display_frame_size(coded, -180.0), coded);
        assert_eq!(display_frame_size(coded, 90.0), FrameSize::new(1080, 1920));
        assert_eq!(display_frame_size(coded, -90.0), FrameSize::new(1080, 1920));
        assert_eq!(display_frame_size(coded, 270.0), FrameSize::new(1080, 1920));
        assert_eq!(display_frame_size(coded, 89.99), FrameSize::new(1080, 1920));
    }

    #[tokio::test]
    async fn test_probe_missing_file() {
        let adapter = LibavProbeAdapter::new();
        let result = adapter.probe(Path::new("/definitely/not/here.mp4")).await;
        assert!(matches!(result, Err(DomainError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_probe_rejects_non_media_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.mp4");
        std::fs::write(&path, b"fake video data").unwrap();

        let adapter = LibavProbeAdapter::new();
        let result = adapter.probe(&path).await;
        assert!(matches!(result, Err(DomainError::ProbeFail(_))));
    }
}
