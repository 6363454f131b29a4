mod error;
mod ffmpeg_ops;
mod ffprobe_info;
mod frame_sampler;
mod media_backend;
mod path_validator;
mod video_scanner;

pub use error::{MediaError, MediaResult};
pub use ffmpeg_ops::{build_concat_command, build_extract_command, concat_filter};
pub use ffprobe_info::{VideoInfo, get_video_info};
pub use frame_sampler::mean_brightness;
pub use media_backend::{FfmpegBackend, MediaBackend};
pub use path_validator::{ensure_directory_exists, validate_directory_exists};
pub use video_scanner::scan_video_files;
