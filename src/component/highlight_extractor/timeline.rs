use crate::tools::{MediaBackend, MediaError, VideoInfo};
use log::{debug, warn};
use rayon::prelude::*;
use std::path::PathBuf;

/// 單一影片在全域時間軸上的位置
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSegment {
    pub path: PathBuf,
    /// 前面所有成功讀取的影片長度總和
    pub global_start: f64,
    pub duration: f64,
    pub frame_rate: f64,
    pub frame_count: u64,
}

impl SourceSegment {
    #[must_use]
    pub fn global_end(&self) -> f64 {
        self.global_start + self.duration
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }
}

/// 多個影片串接而成的虛擬時間軸，建立後不再重新排序
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    segments: Vec<SourceSegment>,
}

impl Timeline {
    /// 依給定順序串接，每段的起點為前面所有長度的累計
    #[must_use]
    pub fn from_probed(entries: Vec<(PathBuf, VideoInfo)>) -> Self {
        let mut running_total = 0.0;
        let segments = entries
            .into_iter()
            .map(|(path, info)| {
                let segment = SourceSegment {
                    path,
                    global_start: running_total,
                    duration: info.duration_seconds,
                    frame_rate: info.frame_rate,
                    frame_count: info.frame_count,
                };
                running_total += info.duration_seconds;
                segment
            })
            .collect();

        Self { segments }
    }

    #[must_use]
    pub fn segments(&self) -> &[SourceSegment] {
        &self.segments
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn total_duration(&self) -> f64 {
        self.segments.last().map_or(0.0, SourceSegment::global_end)
    }
}

/// 時間軸建立結果
#[derive(Debug)]
pub struct TimelineBuild {
    pub timeline: Timeline,
    /// 無法讀取長度而被排除的檔案
    pub failures: Vec<MediaError>,
}

/// 平行讀取每個檔案的長度後依原順序串接
///
/// 讀取失敗的檔案直接排除，後續檔案的起點只累計成功的檔案，
/// 所以時間軸會縮短而不是留下空洞。
pub fn build_timeline<B: MediaBackend + ?Sized>(backend: &B, files: &[PathBuf]) -> TimelineBuild {
    let probed: Vec<(PathBuf, Result<VideoInfo, MediaError>)> = files
        .par_iter()
        .map(|path| (path.clone(), backend.probe(path)))
        .collect();

    let mut entries = Vec::with_capacity(probed.len());
    let mut failures = Vec::new();

    for (path, result) in probed {
        match result {
            Ok(info) => {
                debug!(
                    "{}: {:.2}s @ {:.3} fps, {} 幀",
                    path.display(),
                    info.duration_seconds,
                    info.frame_rate,
                    info.frame_count
                );
                entries.push((path, info));
            }
            Err(e) => {
                warn!("略過無法讀取的影片: {e}");
                failures.push(e);
            }
        }
    }

    TimelineBuild {
        timeline: Timeline::from_probed(entries),
        failures,
    }
}
