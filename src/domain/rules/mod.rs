// Domain rules - Business logic and policies

use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Approximate glyph advance as a fraction of the font size
const GLYPH_WIDTH_RATIO: f64 = 0.55;

/// Characters that cannot appear in an output file name
const FORBIDDEN_TITLE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Split the source timeline into fixed-size windows.
///
/// Produces `floor(total / clip_duration)` contiguous segments starting at 0;
/// a trailing remainder shorter than one window is dropped.
pub fn partition(total_duration: f64, clip_duration: u32) -> Vec<Segment> {
    if clip_duration == 0 || !(total_duration > 0.0) {
        return Vec::new();
    }

    let window = clip_duration as f64;
    let count = (total_duration / window).floor() as usize;

    (0..count)
        .map(|index| Segment {
            index,
            start: index as f64 * window,
            end: ((index + 1) as f64 * window).min(total_duration),
        })
        .collect()
}

/// Seconds of source left over after partitioning
pub fn dropped_remainder(total_duration: f64, clip_duration: u32) -> f64 {
    if clip_duration == 0 || !(total_duration > 0.0) {
        return 0.0;
    }
    let covered = partition(total_duration, clip_duration).len() as f64 * clip_duration as f64;
    (total_duration - covered).max(0.0)
}

/// Center a 9:16 window over the frame.
///
/// Width is `round(height * 9 / 16)`, clamped to the frame width; the left
/// edge never goes below zero.
pub fn vertical_crop(frame: FrameSize) -> CropRect {
    let target_width = (frame.height as f64 * 9.0 / 16.0).round() as u32;
    let width = target_width.min(frame.width);
    let x_center = frame.width / 2;
    let x = x_center.saturating_sub(width / 2);

    CropRect {
        x,
        y: 0,
        width,
        height: frame.height,
    }
}

/// Audio selection for a clip
pub struct AudioPolicy;

impl AudioPolicy {
    /// Mute wins over music; music replaces the source audio; otherwise keep it.
    pub fn resolve(mute: bool, music: Option<&Path>) -> AudioTrack {
        match (mute, music) {
            (true, _) => AudioTrack::Muted,
            (false, Some(track)) => AudioTrack::Music(track.to_path_buf()),
            (false, None) => AudioTrack::Original,
        }
    }
}

/// Greedy word wrap of caption text to the frame width
pub fn wrap_caption(text: &str, frame_width: u32, font_size: u32) -> String {
    let glyph_width = (font_size.max(1) as f64 * GLYPH_WIDTH_RATIO).max(1.0);
    let max_chars = ((frame_width as f64 / glyph_width).floor() as usize).max(1);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}

/// Output file name for a zero-based segment index
pub fn part_file_name(base_title: &str, index: usize) -> String {
    format!("{}_Part_{}.mp4", base_title, index + 1)
}

/// Scratch file name for a segment's extracted audio
pub fn audio_extract_name(index: usize) -> String {
    format!("audio_{}.wav", index)
}

/// Make a user-supplied title safe to use as a file name prefix
pub fn sanitize_base_title(title: &str) -> Result<String, DomainError> {
    let sanitized: String = title
        .trim()
        .chars()
        .map(|c| {
            if FORBIDDEN_TITLE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    if sanitized.is_empty() {
        return Err(DomainError::BadArgs(
            "Base file name cannot be empty".to_string(),
        ));
    }

    Ok(sanitized)
}
