use super::error::{MediaError, MediaResult};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

fn base_command() -> Command {
    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]);
    cmd
}

/// 建立 stream copy 擷取命令
#[must_use]
pub fn build_extract_command(source: &Path, start: f64, duration: f64, output: &Path) -> Command {
    let mut cmd = base_command();
    cmd.args(["-ss", &format!("{start:.3}"), "-i"])
        .arg(source)
        .args(["-t", &format!("{duration:.3}"), "-c", "copy"])
        .arg(output);
    cmd
}

/// 組出 concat 濾鏡字串，每個輸入明確對應第一條視訊與音訊串流
#[must_use]
pub fn concat_filter(input_count: usize) -> String {
    let mut filter: String = (0..input_count)
        .map(|i| format!("[{i}:v:0][{i}:a:0]"))
        .collect();
    filter.push_str(&format!("concat=n={input_count}:v=1:a=1[v][a]"));
    filter
}

/// 建立跨檔案合併命令（重新編碼為固定幀率 CFR）
#[must_use]
pub fn build_concat_command(inputs: &[PathBuf], output: &Path, frame_rate: u32, crf: u8) -> Command {
    let mut cmd = base_command();
    for input in inputs {
        cmd.arg("-i").arg(input);
    }
    cmd.args([
        "-filter_complex",
        &concat_filter(inputs.len()),
        "-map",
        "[v]",
        "-map",
        "[a]",
        "-r",
        &frame_rate.to_string(),
        "-c:v",
        "libx264",
        "-crf",
        &crf.to_string(),
        "-fps_mode",
        "cfr",
    ])
    .arg(output);
    cmd
}

fn run(mut cmd: Command) -> Result<(), String> {
    debug!("執行: {cmd:?}");
    let output = cmd.output().map_err(|e| format!("無法執行 ffmpeg: {e}"))?;
    if output.status.success() {
        Ok(())
    } else {
        Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
    }
}

pub fn extract_clip(source: &Path, start: f64, duration: f64, output: &Path) -> MediaResult<()> {
    run(build_extract_command(source, start, duration, output)).map_err(|message| {
        MediaError::Extract {
            path: source.to_path_buf(),
            message,
        }
    })?;

    if !output.exists() {
        return Err(MediaError::Extract {
            path: source.to_path_buf(),
            message: format!("輸出檔案未建立: {}", output.display()),
        });
    }
    Ok(())
}

pub fn concat_clips(inputs: &[PathBuf], output: &Path, frame_rate: u32, crf: u8) -> MediaResult<()> {
    run(build_concat_command(inputs, output, frame_rate, crf)).map_err(|message| {
        MediaError::Concat {
            output: output.to_path_buf(),
            message,
        }
    })
}

/// 刪除暫存檔，檔案本來就不存在時視為成功
pub fn remove_artifact(path: &Path) -> MediaResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(MediaError::Cleanup {
            path: path.to_path_buf(),
            message: e.to_string(),
        }),
    }
}
