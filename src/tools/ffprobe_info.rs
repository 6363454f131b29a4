use super::error::{MediaError, MediaResult};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

/// 無法解析幀率時的預設值
const FALLBACK_FRAME_RATE: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub duration_seconds: f64,
    pub frame_rate: f64,
    pub frame_count: u64,
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    r_frame_rate: Option<String>,
    nb_frames: Option<String>,
    duration: Option<String>,
}

/// 使用 ffprobe 取得影片資訊
pub fn get_video_info(path: &Path) -> MediaResult<VideoInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .map_err(|e| MediaError::Spawn {
            program: "ffprobe",
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(probe_error(path, format!("ffprobe 執行失敗: {}", stderr.trim())));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_ffprobe_output(path, &stdout)
}

fn probe_error(path: &Path, message: impl Into<String>) -> MediaError {
    MediaError::Probe {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// 解析 ffprobe 的 JSON 輸出
fn parse_ffprobe_output(path: &Path, json: &str) -> MediaResult<VideoInfo> {
    let probe: FfprobeOutput = serde_json::from_str(json)
        .map_err(|e| probe_error(path, format!("無法解析 ffprobe 輸出: {e}")))?;

    // 找到視訊串流
    let video_stream = probe
        .streams
        .as_ref()
        .and_then(|streams| {
            streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
        })
        .ok_or_else(|| probe_error(path, "找不到視訊串流"))?;

    // 取得影片長度（優先從 format，其次從 stream）
    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or(video_stream.duration.as_ref())
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| probe_error(path, "無法取得影片長度"))?;

    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(probe_error(
            path,
            format!("影片長度無效: {duration_seconds}"),
        ));
    }

    let frame_rate = video_stream
        .r_frame_rate
        .as_ref()
        .and_then(|r| parse_frame_rate(r))
        .unwrap_or(FALLBACK_FRAME_RATE);

    // 容器未記錄幀數時以長度乘幀率估算
    let frame_count = video_stream
        .nb_frames
        .as_ref()
        .and_then(|n| n.parse::<u64>().ok())
        .filter(|&n| n > 0)
        .unwrap_or_else(|| (duration_seconds * frame_rate).floor() as u64);

    Ok(VideoInfo {
        duration_seconds,
        frame_rate,
        frame_count,
    })
}

/// 解析幀率字串（例如 "30/1" 或 "30000/1001"）
fn parse_frame_rate(rate: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = rate.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 && num > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    rate.parse::<f64>().ok().filter(|&r| r > 0.0)
}
