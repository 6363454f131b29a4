//! 單元測試用的假媒體工具

use crate::tools::{MediaBackend, MediaError, MediaResult, VideoInfo};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const BRIGHT: f64 = 128.0;
pub const DARK: f64 = 0.0;

#[derive(Default)]
pub struct FakeBackend {
    videos: HashMap<PathBuf, VideoInfo>,
    dark_ranges: HashMap<PathBuf, Vec<(f64, f64)>>,
    decode_failure_from: HashMap<PathBuf, f64>,
    extract_failures: HashSet<PathBuf>,
    concat_failure: bool,
    cleanup_failures: HashSet<PathBuf>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_video(mut self, name: &str, duration: f64, frame_rate: f64) -> Self {
        self.videos.insert(
            PathBuf::from(name),
            VideoInfo {
                duration_seconds: duration,
                frame_rate,
                frame_count: (duration * frame_rate).floor() as u64,
            },
        );
        self
    }

    /// `[start, end)`（檔案內時間）為黑畫面
    pub fn with_dark(mut self, name: &str, start: f64, end: f64) -> Self {
        self.dark_ranges
            .entry(PathBuf::from(name))
            .or_default()
            .push((start, end));
        self
    }

    pub fn with_decode_failure(mut self, name: &str, from_seconds: f64) -> Self {
        self.decode_failure_from
            .insert(PathBuf::from(name), from_seconds);
        self
    }

    pub fn with_extract_failure(mut self, name: &str) -> Self {
        self.extract_failures.insert(PathBuf::from(name));
        self
    }

    pub fn with_concat_failure(mut self) -> Self {
        self.concat_failure = true;
        self
    }

    pub fn with_cleanup_failure(mut self, path: &Path) -> Self {
        self.cleanup_failures.insert(path.to_path_buf());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl MediaBackend for FakeBackend {
    fn probe(&self, path: &Path) -> MediaResult<VideoInfo> {
        self.videos.get(path).cloned().ok_or_else(|| MediaError::Probe {
            path: path.to_path_buf(),
            message: "not found".to_string(),
        })
    }

    fn sample_brightness(&self, path: &Path, seconds: f64) -> MediaResult<f64> {
        self.record(format!("sample {} {seconds:.3}", path.display()));
        if let Some(&from) = self.decode_failure_from.get(path) {
            if seconds >= from {
                return Err(MediaError::Decode {
                    path: path.to_path_buf(),
                    seconds,
                    message: "corrupt frame".to_string(),
                });
            }
        }
        let dark = self
            .dark_ranges
            .get(path)
            .is_some_and(|ranges| ranges.iter().any(|&(s, e)| seconds >= s && seconds < e));
        Ok(if dark { DARK } else { BRIGHT })
    }

    fn extract(&self, source: &Path, start: f64, duration: f64, output: &Path) -> MediaResult<()> {
        self.record(format!(
            "extract {} {start:.3} {duration:.3} -> {}",
            source.display(),
            output.display()
        ));
        if self.extract_failures.contains(source) {
            return Err(MediaError::Extract {
                path: source.to_path_buf(),
                message: "injected".to_string(),
            });
        }
        Ok(())
    }

    fn concat(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        frame_rate: u32,
        _crf: u8,
    ) -> MediaResult<()> {
        let names: Vec<_> = inputs.iter().map(|p| p.display().to_string()).collect();
        self.record(format!(
            "concat [{}] @{frame_rate} -> {}",
            names.join(", "),
            output.display()
        ));
        if self.concat_failure {
            return Err(MediaError::Concat {
                output: output.to_path_buf(),
                message: "injected".to_string(),
            });
        }
        Ok(())
    }

    fn remove(&self, path: &Path) -> MediaResult<()> {
        self.record(format!("remove {}", path.display()));
        if self.cleanup_failures.contains(path) {
            return Err(MediaError::Cleanup {
                path: path.to_path_buf(),
                message: "injected".to_string(),
            });
        }
        Ok(())
    }
}
