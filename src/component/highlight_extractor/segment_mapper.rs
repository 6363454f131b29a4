use super::debouncer::Highlight;
use super::timeline::SourceSegment;
use std::path::PathBuf;

/// 擷取命令的時間參數精度為 1 ms，比這更短的重疊會變成 `-t 0.000`
const MIN_SLICE_SECONDS: f64 = 0.0005;

/// 精華區間落在單一來源檔案內的部分（檔案內時間）
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub path: PathBuf,
    pub local_start: f64,
    pub local_duration: f64,
}

/// 將全域時間的精華區間投影回各來源檔案
///
/// 依時間軸順序回傳每個與 `[start, end)` 重疊的檔案片段；
/// 因為時間軸沒有空洞，片段依序接起來剛好是完整的區間。
/// 長度為 0 的區間回傳空列表；浮點誤差造成的極短重疊直接捨棄。
#[must_use]
pub fn map_highlight(segments: &[SourceSegment], highlight: &Highlight) -> Vec<Slice> {
    if highlight.is_empty() {
        return Vec::new();
    }

    segments
        .iter()
        .filter(|segment| {
            highlight.start < segment.global_end() && highlight.end > segment.global_start
        })
        .filter_map(|segment| {
            let overlap_start = highlight.start.max(segment.global_start);
            let overlap_end = highlight.end.min(segment.global_end());
            let local_duration = overlap_end - overlap_start;

            (local_duration >= MIN_SLICE_SECONDS).then(|| Slice {
                path: segment.path.clone(),
                local_start: overlap_start - segment.global_start,
                local_duration,
            })
        })
        .collect()
}
