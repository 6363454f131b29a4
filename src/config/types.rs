use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 10;

/// libx264 CRF 上限
const MAX_CRF: u8 = 51;

/// 8 位元通道亮度上限
const MAX_BRIGHTNESS: f64 = 255.0;

/// 參考幀率（舊版以 24 fps 為基準，每 120 幀取樣一次）
pub const REFERENCE_FRAME_RATE: f64 = 24.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 精華擷取參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    /// 每段精華長度（秒），以黑畫面為終點往前回推
    pub highlight_duration: f64,
    /// 兩次觸發之間的冷卻時間（秒）
    pub cooldown_period: f64,
    /// 平均亮度低於此值視為黑畫面（0-255）
    pub darkness_threshold: f64,
    /// 取樣間隔（秒），依各檔案幀率換算為幀數
    pub sample_interval_seconds: f64,
    /// 跨檔案精華重新編碼時的固定輸出幀率
    pub output_frame_rate: u32,
    /// 重新編碼的 CRF
    pub output_crf: u8,
    /// 支援的容器副檔名（不含點）
    pub video_extension: String,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            highlight_duration: 20.0,
            cooldown_period: 10.0,
            darkness_threshold: 10.0,
            sample_interval_seconds: 120.0 / REFERENCE_FRAME_RATE,
            output_frame_rate: 60,
            output_crf: 22,
            video_extension: "mp4".to_string(),
        }
    }
}

impl HighlightSettings {
    pub fn validate(&self) -> Result<()> {
        if self.highlight_duration.is_nan() || self.highlight_duration <= 0.0 {
            bail!("精華長度必須大於 0: {}", self.highlight_duration);
        }
        if self.cooldown_period.is_nan() || self.cooldown_period < 0.0 {
            bail!("冷卻時間不可為負數: {}", self.cooldown_period);
        }
        if !(0.0..=MAX_BRIGHTNESS).contains(&self.darkness_threshold) {
            bail!(
                "黑畫面門檻必須介於 0 到 {MAX_BRIGHTNESS}: {}",
                self.darkness_threshold
            );
        }
        if self.sample_interval_seconds.is_nan() || self.sample_interval_seconds <= 0.0 {
            bail!("取樣間隔必須大於 0: {}", self.sample_interval_seconds);
        }
        if self.output_frame_rate == 0 {
            bail!("輸出幀率必須大於 0");
        }
        if self.output_crf > MAX_CRF {
            bail!("CRF 必須介於 0 到 {MAX_CRF}: {}", self.output_crf);
        }
        if self.video_extension.trim().trim_start_matches('.').is_empty() {
            bail!("副檔名不可為空");
        }
        Ok(())
    }

    /// 將取樣間隔（秒）換算為該檔案的幀數間隔，至少為 1
    #[must_use]
    pub fn stride_frames(&self, frame_rate: f64) -> u64 {
        stride_frames(self.sample_interval_seconds, frame_rate)
    }

    /// 正規化後的副檔名（小寫、不含點）
    #[must_use]
    pub fn extension(&self) -> String {
        self.video_extension
            .trim()
            .trim_start_matches('.')
            .to_lowercase()
    }
}

/// 將秒數間隔換算為幀數間隔，至少為 1
#[must_use]
pub fn stride_frames(interval_seconds: f64, frame_rate: f64) -> u64 {
    let frames = (interval_seconds * frame_rate).round();
    if frames.is_finite() && frames >= 1.0 {
        frames as u64
    } else {
        1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub recent_paths: Vec<String>,
    pub highlight: HighlightSettings,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
}
