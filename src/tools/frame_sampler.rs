use super::error::{MediaError, MediaResult};
use log::trace;
use std::path::Path;
use std::process::Command;

/// 取樣時縮小到的寬度，平均亮度對縮放不敏感
const SAMPLE_WIDTH: u32 = 160;

/// 兩段式 seek 的前置緩衝時間（秒）
const SEEK_MARGIN: f64 = 2.0;

/// 解碼指定時間點的一幀，回傳 RGB 三通道所有位元組的平均值
///
/// 兩段式 seek：
/// 1. `-ss` 在 `-i` 前：快速跳轉到最近的關鍵幀
/// 2. `-ss` 在 `-i` 後：精準解碼到目標時間點
pub fn sample_brightness(path: &Path, seconds: f64) -> MediaResult<f64> {
    let t0 = (seconds - SEEK_MARGIN).max(0.0);
    let delta = seconds - t0;

    let mut args = vec![
        "-hide_banner".to_string(),
        "-nostdin".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
    ];

    if t0 > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{t0:.3}"));
    }

    args.push("-i".to_string());
    args.push(path.to_string_lossy().to_string());

    if delta > 0.0 {
        args.push("-ss".to_string());
        args.push(format!("{delta:.3}"));
    }

    args.extend([
        "-frames:v".to_string(),
        "1".to_string(),
        "-an".to_string(),
        "-sn".to_string(),
        "-dn".to_string(),
        "-threads".to_string(),
        "1".to_string(),
        "-vf".to_string(),
        format!("scale={SAMPLE_WIDTH}:-2"),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgb24".to_string(),
        "-".to_string(),
    ]);

    let output = Command::new("ffmpeg")
        .args(&args)
        .output()
        .map_err(|e| MediaError::Spawn {
            program: "ffmpeg",
            message: e.to_string(),
        })?;

    let decode_error = |message: String| MediaError::Decode {
        path: path.to_path_buf(),
        seconds,
        message,
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(decode_error(stderr.trim().to_string()));
    }

    let brightness =
        mean_brightness(&output.stdout).ok_or_else(|| decode_error("沒有解碼出任何畫面".to_string()))?;

    trace!(
        "取樣 {} @ {seconds:.3}s: 亮度 {brightness:.2}",
        path.display()
    );

    Ok(brightness)
}

/// 計算原始像素資料的平均值（所有通道一起平均）
#[must_use]
pub fn mean_brightness(pixels: &[u8]) -> Option<f64> {
    if pixels.is_empty() {
        return None;
    }
    let sum: u64 = pixels.iter().map(|&b| u64::from(b)).sum();
    Some(sum as f64 / pixels.len() as f64)
}
