// Adapters - External system implementations

pub mod archive_zip;
pub mod auth_allowlist;
pub mod exec_ffmpeg;
pub mod probe_libav;
pub mod toml_config;
pub mod transcribe_whisper;
pub mod workspace_local;

// Re-export adapters
pub use archive_zip::ZipArchiver;
pub use auth_allowlist::AllowListAuthorizer;
pub use exec_ffmpeg::FFmpegAdapter;
pub use probe_libav::LibavProbeAdapter;
pub use toml_config::TomlConfigAdapter;
pub use transcribe_whisper::WhisperCliTranscriber;
pub use workspace_local::LocalWorkspaceAdapter;
