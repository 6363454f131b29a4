pub mod load;
pub mod save;
pub mod types;

pub use types::{
    Config, HighlightSettings, Language, MAX_RECENT_PATHS, REFERENCE_FRAME_RATE, UserSettings,
    stride_frames,
};
