//! FFmpeg argument and filter-graph construction
//!
//! Pure functions turning a [`Composition`] into an `ffmpeg` argument list.
//! Input order is fixed: source window, then logo, music and end-screen when
//! present.

use std::path::Path;

use crate::domain::model::*;
use crate::utils::time::ffmpeg_seconds;

/// Sample format every audio branch is normalized to before concatenation
const AUDIO_NORMALIZE: &str = "aresample=44100,aformat=sample_fmts=fltp:channel_layouts=stereo";

/// Leading flags shared by every invocation
fn base_args() -> Vec<String> {
    ["-hide_banner", "-nostdin", "-y", "-loglevel", "error"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Escape a value for use inside a filter option inside a filter graph
pub fn escape_filter_value(value: &str) -> String {
    let escape = |input: &str, specials: &[char]| -> String {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            if specials.contains(&c) {
                out.push('\\');
            }
            out.push(c);
        }
        out
    };

    let option_level = escape(value, &['\\', '\'', ':']);
    escape(&option_level, &['\\', '\'', '[', ']', ',', ';'])
}

/// Arguments extracting one segment's audio as 16 kHz mono PCM
pub fn build_extract_audio_args(source: &Path, segment: &Segment, dest: &Path) -> Vec<String> {
    let mut args = base_args();
    args.extend([
        "-ss".to_string(),
        ffmpeg_seconds(segment.start),
        "-t".to_string(),
        ffmpeg_seconds(segment.duration()),
        "-i".to_string(),
        source.display().to_string(),
        "-vn".to_string(),
        "-ac".to_string(),
        "1".to_string(),
        "-ar".to_string(),
        "16000".to_string(),
        "-c:a".to_string(),
        "pcm_s16le".to_string(),
        dest.display().to_string(),
    ]);
    args
}

/// Optional inputs needed while building the graph
pub struct RenderInputs<'a> {
    /// File holding the wrapped caption text, when a caption is drawn
    pub caption_file: Option<&'a Path>,
    pub font_file: Option<&'a Path>,
}

/// Arguments rendering a composition to `dest`
pub fn build_render_args(
    composition: &Composition,
    dest: &Path,
    inputs: &RenderInputs<'_>,
    encoding: &EncodingSettings,
) -> Vec<String> {
    let segment_duration = ffmpeg_seconds(composition.segment.duration());
    let mut args = base_args();
    args.extend([
        "-ss".to_string(),
        ffmpeg_seconds(composition.segment.start),
        "-t".to_string(),
        segment_duration.clone(),
        "-i".to_string(),
        composition.source.display().to_string(),
    ]);
    let mut next_input = 1;

    let logo_input = composition.logo.as_ref().map(|logo| {
        args.extend(["-i".to_string(), logo.path.display().to_string()]);
        next_input += 1;
        next_input - 1
    });

    let music_input = match &composition.audio {
        AudioTrack::Music(path) => {
            args.extend([
                "-stream_loop".to_string(),
                "-1".to_string(),
                "-i".to_string(),
                path.display().to_string(),
            ]);
            next_input += 1;
            Some(next_input - 1)
        }
        _ => None,
    };

    let end_input = composition.end_screen.as_ref().map(|end| {
        args.extend(["-i".to_string(), end.path.display().to_string()]);
        next_input += 1;
        next_input - 1
    });

    let mut filters: Vec<String> = Vec::new();
    let mut video = "0:v".to_string();

    if let Some(crop) = composition.crop {
        filters.push(format!(
            "[{}]crop={}:{}:{}:{}[vcrop]",
            video, crop.width, crop.height, crop.x, crop.y
        ));
        video = "vcrop".to_string();
    }

    if let (Some(logo), Some(index)) = (&composition.logo, logo_input) {
        filters.push(format!("[{}:v]scale=-1:{}[logo]", index, logo.height));
        filters.push(format!("[{}][logo]overlay=W-w:H-h[vlogo]", video));
        video = "vlogo".to_string();
    }

    if let (Some(caption), Some(text_file)) = (&composition.caption, inputs.caption_file) {
        if !caption.is_blank() {
            let mut drawtext = format!(
                "drawtext=textfile={}:expansion=none:fontsize={}:fontcolor=white:\
                 box=1:boxcolor=black:boxborderw=12:line_spacing=6:\
                 x=(w-text_w)/2:y=h-text_h-24",
                escape_filter_value(&text_file.display().to_string()),
                caption.font_size
            );
            if let Some(font) = inputs.font_file {
                drawtext.push_str(&format!(
                    ":fontfile={}",
                    escape_filter_value(&font.display().to_string())
                ));
            }
            filters.push(format!("[{}]{}[vcap]", video, drawtext));
            video = "vcap".to_string();
        }
    }

    let frame = composition.frame_size().even();
    filters.push(format!(
        "[{}]scale={}:{},setsar=1[vmain]",
        video, frame.width, frame.height
    ));

    let main_audio = match (&composition.audio, music_input) {
        (AudioTrack::Muted, _) => None,
        (AudioTrack::Music(_), Some(index)) => {
            filters.push(format!(
                "[{}:a]atrim=0:{},asetpts=PTS-STARTPTS,{}[amain]",
                index, segment_duration, AUDIO_NORMALIZE
            ));
            Some("amain")
        }
        (AudioTrack::Original, _) if composition.source_has_audio => {
            filters.push(format!("[0:a]{}[amain]", AUDIO_NORMALIZE));
            Some("amain")
        }
        _ => None,
    };

    let (video_out, audio_out) = match (&composition.end_screen, end_input) {
        (Some(end), Some(index)) => {
            filters.push(format!(
                "[{}:v]scale={}:{},setsar=1[vend]",
                index, frame.width, frame.height
            ));
            match main_audio {
                Some(main) => {
                    if end.has_audio {
                        filters.push(format!("[{}:a]{}[aend]", index, AUDIO_NORMALIZE));
                    } else {
                        filters.push(format!(
                            "anullsrc=channel_layout=stereo:sample_rate=44100,atrim=0:{},{}[aend]",
                            ffmpeg_seconds(end.duration),
                            AUDIO_NORMALIZE
                        ));
                    }
                    filters.push(format!(
                        "[vmain][{}][vend][aend]concat=n=2:v=1:a=1[vout][aout]",
                        main
                    ));
                    ("vout", Some("aout"))
                }
                None => {
                    filters.push("[vmain][vend]concat=n=2:v=1:a=0[vout]".to_string());
                    ("vout", None)
                }
            }
        }
        _ => ("vmain", main_audio),
    };

    args.extend([
        "-filter_complex".to_string(),
        filters.join(";"),
        "-map".to_string(),
        format!("[{}]", video_out),
    ]);

    match audio_out {
        Some(label) => args.extend(["-map".to_string(), format!("[{}]", label)]),
        None => args.push("-an".to_string()),
    }

    args.extend([
        "-c:v".to_string(),
        encoding.video_codec.clone(),
        "-preset".to_string(),
        encoding.preset.clone(),
        "-crf".to_string(),
        encoding.crf.to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-threads".to_string(),
        encoding.threads.to_string(),
    ]);
    if audio_out.is_some() {
        args.extend(["-c:a".to_string(), encoding.audio_codec.clone()]);
    }
    args.extend([
        "-movflags".to_string(),
        "+faststart".to_string(),
        dest.display().to_string(),
    ]);

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source() -> MediaInfo {
        MediaInfo {
            path: PathBuf::from("/work/main.mp4"),
            format: "mp4".to_string(),
            duration: 95.0,
            width: 1920,
            height: 1080,
            frame_rate: 30.0,
            has_audio: true,
            file_size: 42,
        }
    }

    fn segment() -> Segment {
        Segment {
            index: 1,
            start: 30.0,
            end: 60.0,
        }
    }

    fn encoding() -> EncodingSettings {
        EncodingSettings {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            threads: 4,
        }
    }

    fn no_inputs() -> RenderInputs<'static> {
        RenderInputs {
            caption_file: None,
            font_file: None,
        }
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> &'a str {
        let position = args.iter().position(|a| a == flag).unwrap();
        &args[position + 1]
    }

    #[test]
    fn test_plain_reencode_keeps_original_audio() {
        let composition = Composition::new(&source(), segment());
        let args = build_render_args(
            &composition,
            Path::new("/out/MyClip_Part_2.mp4"),
            &no_inputs(),
            &encoding(),
        );

        assert_eq!(value_after(&args, "-ss"), "30.000");
        assert_eq!(value_after(&args, "-t"), "30.000");
        assert_eq!(value_after(&args, "-i"), "/work/main.mp4");
        assert_eq!(
            value_after(&args, "-filter_complex"),
            format!(
                "[0:v]scale=1920:1080,setsar=1[vmain];[0:a]{}[amain]",
                AUDIO_NORMALIZE
            )
        );
        assert!(args.contains(&"[amain]".to_string()));
        assert_eq!(value_after(&args, "-c:v"), "libx264");
        assert_eq!(value_after(&args, "-c:a"), "aac");
        assert!(!args.contains(&"-an".to_string()));
        assert_eq!(args.last().unwrap(), "/out/MyClip_Part_2.mp4");
    }

    #[test]
    fn test_crop_logo_and_music_chain() {
        let composition = Composition::new(&source(), segment())
            .with_crop(CropRect {
                x: 656,
                y: 0,
                width: 608,
                height: 1080,
            })
            .with_logo(LogoOverlay {
                path: PathBuf::from("/work/logo.png"),
                height: 50,
            })
            .with_audio(AudioTrack::Music(PathBuf::from("/work/music.mp3")));

        let args = build_render_args(&composition, Path::new("out.mp4"), &no_inputs(), &encoding());
        let graph = value_after(&args, "-filter_complex");

        assert!(graph.starts_with("[0:v]crop=608:1080:656:0[vcrop];"));
        assert!(graph.contains("[1:v]scale=-1:50[logo];[vcrop][logo]overlay=W-w:H-h[vlogo]"));
        assert!(graph.contains("[vlogo]scale=608:1080,setsar=1[vmain]"));
        assert!(graph.contains("[2:a]atrim=0:30.000,asetpts=PTS-STARTPTS"));
        assert!(!graph.contains("[0:a]"));

        let loop_position = args.iter().position(|a| a == "-stream_loop").unwrap();
        assert_eq!(args[loop_position + 1], "-1");
        assert_eq!(args[loop_position + 3], "/work/music.mp3");
    }

    #[test]
    fn test_muted_output_has_no_audio_stream() {
        let composition = Composition::new(&source(), segment()).with_audio(AudioTrack::Muted);
        let args = build_render_args(&composition, Path::new("out.mp4"), &no_inputs(), &encoding());

        assert!(args.contains(&"-an".to_string()));
        assert!(!args.contains(&"-c:a".to_string()));
        assert!(!value_after(&args, "-filter_complex").contains("amain"));
    }

    #[test]
    fn test_odd_crop_width_is_evened_for_encoder() {
        let mut media = source();
        media.width = 1280;
        media.height = 720;
        let composition = Composition::new(&media, segment()).with_crop(CropRect {
            x: 438,
            y: 0,
            width: 405,
            height: 720,
        });
        let args = build_render_args(&composition, Path::new("out.mp4"), &no_inputs(), &encoding());

        assert!(value_after(&args, "-filter_complex").contains("[vcrop]scale=404:720,setsar=1[vmain]"));
    }

    #[test]
    fn test_caption_drawn_from_text_file() {
        let composition = Composition::new(&source(), segment()).with_caption(Caption {
            text: "hello world".to_string(),
            font_size: 40,
        });
        let inputs = RenderInputs {
            caption_file: Some(Path::new("/tmp/cap.txt")),
            font_file: Some(Path::new("/fonts/Bold.ttf")),
        };
        let args = build_render_args(&composition, Path::new("out.mp4"), &inputs, &encoding());
        let graph = value_after(&args, "-filter_complex");

        assert!(graph.starts_with("[0:v]drawtext=textfile=/tmp/cap.txt:expansion=none:fontsize=40"));
        assert!(graph.contains("x=(w-text_w)/2:y=h-text_h-24"));
        assert!(graph.contains(":fontfile=/fonts/Bold.ttf[vcap]"));
        assert!(graph.contains("[vcap]scale=1920:1080,setsar=1[vmain]"));
    }

    #[test]
    fn test_blank_caption_is_not_drawn() {
        let composition = Composition::new(&source(), segment()).with_caption(Caption {
            text: String::new(),
            font_size: 40,
        });
        let inputs = RenderInputs {
            caption_file: Some(Path::new("/tmp/cap.txt")),
            font_file: None,
        };
        let args = build_render_args(&composition, Path::new("out.mp4"), &inputs, &encoding());

        assert!(!value_after(&args, "-filter_complex").contains("drawtext"));
    }

    #[test]
    fn test_end_screen_concat_with_silent_end_audio() {
        let composition = Composition::new(&source(), segment()).with_end_screen(EndScreen {
            path: PathBuf::from("/work/end.mp4"),
            duration: 5.0,
            has_audio: false,
        });
        let args = build_render_args(&composition, Path::new("out.mp4"), &no_inputs(), &encoding());
        let graph = value_after(&args, "-filter_complex");

        assert!(graph.contains("[1:v]scale=1920:1080,setsar=1[vend]"));
        assert!(graph.contains("anullsrc=channel_layout=stereo:sample_rate=44100,atrim=0:5.000"));
        assert!(graph.ends_with("[vmain][amain][vend][aend]concat=n=2:v=1:a=1[vout][aout]"));
        assert!(args.contains(&"[vout]".to_string()));
        assert!(args.contains(&"[aout]".to_string()));
    }

    #[test]
    fn test_end_screen_concat_video_only_when_muted() {
        let composition = Composition::new(&source(), segment())
            .with_audio(AudioTrack::Muted)
            .with_end_screen(EndScreen {
                path: PathBuf::from("/work/end.mp4"),
                duration: 5.0,
                has_audio: true,
            });
        let args = build_render_args(&composition, Path::new("out.mp4"), &no_inputs(), &encoding());
        let graph = value_after(&args, "-filter_complex");

        assert!(graph.ends_with("[vmain][vend]concat=n=2:v=1:a=0[vout]"));
        assert!(!graph.contains("[1:a]"));
        assert!(args.contains(&"-an".to_string()));
    }

    #[test]
    fn test_music_then_end_screen_with_its_own_audio() {
        let composition = Composition::new(&source(), segment())
            .with_audio(AudioTrack::Music(PathBuf::from("/work/music.mp3")))
            .with_end_screen(EndScreen {
                path: PathBuf::from("/work/end.mp4"),
                duration: 5.0,
                has_audio: true,
            });
        let args = build_render_args(&composition, Path::new("out.mp4"), &no_inputs(), &encoding());
        let graph = value_after(&args, "-filter_complex");

        let inputs: Vec<&String> = args
            .windows(2)
            .filter(|w| w[0] == "-i")
            .map(|w| &w[1])
            .collect();
        assert_eq!(inputs, ["/work/main.mp4", "/work/music.mp3", "/work/end.mp4"]);

        assert!(graph.contains(&format!(
            "[1:a]atrim=0:30.000,asetpts=PTS-STARTPTS,{}[amain]",
            AUDIO_NORMALIZE
        )));
        assert!(graph.contains("[2:v]scale=1920:1080,setsar=1[vend]"));
        assert!(graph.contains(&format!("[2:a]{}[aend]", AUDIO_NORMALIZE)));
        assert!(!graph.contains("anullsrc"));
        assert!(!graph.contains("[0:a]"));
        assert!(graph.ends_with("[vmain][amain][vend][aend]concat=n=2:v=1:a=1[vout][aout]"));
        assert_eq!(value_after(&args, "-c:a"), "aac");
    }

    #[test]
    fn test_extract_audio_args() {
        let args = build_extract_audio_args(
            Path::new("/work/main.mp4"),
            &segment(),
            Path::new("/work/audio_1.wav"),
        );
        assert_eq!(value_after(&args, "-ss"), "30.000");
        assert_eq!(value_after(&args, "-t"), "30.000");
        assert!(args.contains(&"-vn".to_string()));
        assert_eq!(value_after(&args, "-ar"), "16000");
        assert_eq!(args.last().unwrap(), "/work/audio_1.wav");
    }

    #[test]
    fn test_escape_filter_value() {
        assert_eq!(escape_filter_value("/tmp/plain.txt"), "/tmp/plain.txt");
        assert_eq!(escape_filter_value("C:/x.txt"), "C\\\\:/x.txt");
        assert_eq!(escape_filter_value("a,b"), "a\\,b");
    }
}
