use super::segment_mapper::Slice;
use crate::config::HighlightSettings;
use std::path::{Path, PathBuf};

/// 外部媒體工具要執行的單一步驟
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// stream copy 擷取 `[start, start + duration)`
    Extract {
        source: PathBuf,
        start: f64,
        duration: f64,
        output: PathBuf,
    },
    /// 依序合併並以固定幀率重新編碼
    Concat {
        inputs: Vec<PathBuf>,
        output: PathBuf,
        frame_rate: u32,
        crf: u8,
    },
    /// 刪除本計畫建立的暫存檔
    Cleanup { artifacts: Vec<PathBuf> },
}

/// 一段精華的完整執行計畫，各計畫互相獨立
#[derive(Debug, Clone, PartialEq)]
pub struct OperationPlan {
    pub highlight_id: usize,
    pub output: PathBuf,
    pub operations: Vec<Operation>,
}

impl OperationPlan {
    /// 此計畫建立的暫存檔
    #[must_use]
    pub fn artifacts(&self) -> Vec<&Path> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::Cleanup { artifacts } => Some(artifacts),
                _ => None,
            })
            .flatten()
            .map(PathBuf::as_path)
            .collect()
    }
}

pub struct ExtractionPlanner {
    output_dir: PathBuf,
    temp_dir: PathBuf,
    extension: String,
    frame_rate: u32,
    crf: u8,
}

impl ExtractionPlanner {
    #[must_use]
    pub fn new(output_dir: &Path, temp_dir: &Path, settings: &HighlightSettings) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            temp_dir: temp_dir.to_path_buf(),
            extension: settings.extension(),
            frame_rate: settings.output_frame_rate,
            crf: settings.output_crf,
        }
    }

    #[must_use]
    pub fn output_path(&self, highlight_id: usize) -> PathBuf {
        self.output_dir
            .join(format!("highlight_{highlight_id}.{}", self.extension))
    }

    /// 暫存檔名包含精華編號，不同計畫之間不會互相覆蓋
    #[must_use]
    pub fn temp_path(&self, highlight_id: usize, part: usize) -> PathBuf {
        self.temp_dir.join(format!(
            "highlight_{highlight_id}_part_{part}.{}",
            self.extension
        ))
    }

    /// 沒有任何片段（長度為 0 的精華）時回傳 `None`，不產生輸出檔
    #[must_use]
    pub fn plan(&self, highlight_id: usize, slices: &[Slice]) -> Option<OperationPlan> {
        let output = self.output_path(highlight_id);

        let operations = match slices {
            [] => return None,
            [single] => vec![Operation::Extract {
                source: single.path.clone(),
                start: single.local_start,
                duration: single.local_duration,
                output: output.clone(),
            }],
            _ => {
                let artifacts: Vec<PathBuf> = (0..slices.len())
                    .map(|part| self.temp_path(highlight_id, part))
                    .collect();

                let mut operations: Vec<Operation> = slices
                    .iter()
                    .zip(&artifacts)
                    .map(|(slice, artifact)| Operation::Extract {
                        source: slice.path.clone(),
                        start: slice.local_start,
                        duration: slice.local_duration,
                        output: artifact.clone(),
                    })
                    .collect();

                operations.push(Operation::Concat {
                    inputs: artifacts.clone(),
                    output: output.clone(),
                    frame_rate: self.frame_rate,
                    crf: self.crf,
                });
                operations.push(Operation::Cleanup { artifacts });
                operations
            }
        };

        Some(OperationPlan {
            highlight_id,
            output,
            operations,
        })
    }
}
