use super::extraction_planner::{Operation, OperationPlan};
use crate::tools::{MediaBackend, MediaError};
use log::{debug, error, warn};
use std::path::PathBuf;

/// 單一計畫的執行結果
#[derive(Debug)]
pub struct PlanOutcome {
    pub highlight_id: usize,
    /// 成功時的輸出檔
    pub output: Option<PathBuf>,
    /// 第一個失敗的擷取或合併步驟
    pub failure: Option<MediaError>,
    pub cleanup_failures: Vec<MediaError>,
    /// 因前面失敗而跳過的步驟數
    pub skipped_operations: usize,
}

impl PlanOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.output.is_some()
    }
}

/// 依序執行計畫
///
/// 擷取或合併失敗後，後續的擷取與合併都跳過，
/// 但清理步驟無論如何都會執行，暫存檔不會殘留。
/// 失敗時 ffmpeg 可能已寫出不完整的輸出檔，一併刪除。
pub fn execute_plan<B: MediaBackend + ?Sized>(backend: &B, plan: &OperationPlan) -> PlanOutcome {
    let mut failure: Option<MediaError> = None;
    let mut cleanup_failures = Vec::new();
    let mut skipped_operations = 0;

    for operation in &plan.operations {
        match operation {
            Operation::Cleanup { artifacts } => {
                for artifact in artifacts {
                    if let Err(e) = backend.remove(artifact) {
                        warn!("精華 {}: {e}", plan.highlight_id);
                        cleanup_failures.push(e);
                    }
                }
            }
            _ if failure.is_some() => skipped_operations += 1,
            Operation::Extract {
                source,
                start,
                duration,
                output,
            } => {
                debug!(
                    "精華 {}: 擷取 {} {start:.3}s + {duration:.3}s",
                    plan.highlight_id,
                    source.display()
                );
                if let Err(e) = backend.extract(source, *start, *duration, output) {
                    error!("精華 {}: {e}", plan.highlight_id);
                    failure = Some(e);
                }
            }
            Operation::Concat {
                inputs,
                output,
                frame_rate,
                crf,
            } => {
                debug!(
                    "精華 {}: 合併 {} 個片段",
                    plan.highlight_id,
                    inputs.len()
                );
                if let Err(e) = backend.concat(inputs, output, *frame_rate, *crf) {
                    error!("精華 {}: {e}", plan.highlight_id);
                    failure = Some(e);
                }
            }
        }
    }

    if failure.is_some()
        && let Err(e) = backend.remove(&plan.output)
    {
        warn!("精華 {}: {e}", plan.highlight_id);
        cleanup_failures.push(e);
    }

    PlanOutcome {
        highlight_id: plan.highlight_id,
        output: failure.is_none().then(|| plan.output.clone()),
        failure,
        cleanup_failures,
        skipped_operations,
    }
}
