//! 黑畫面精華擷取元件
//!
//! 將資料夾內的影片依檔名串成一條時間軸，找出接近全黑的畫面作為
//! 精彩時刻的標記，擷取每個標記之前固定長度的片段。
//! 片段跨越兩個檔案時才需要重新編碼。

mod debouncer;
mod extraction_planner;
mod main;
mod marker_detector;
mod plan_executor;
mod segment_mapper;
mod timeline;

#[cfg(test)]
mod test_support;

pub use debouncer::{Debounced, Highlight, HighlightDebouncer};
pub use extraction_planner::{ExtractionPlanner, Operation, OperationPlan};
pub use main::{ExtractionSummary, HighlightExtractor};
pub use marker_detector::{Marker, MarkerDetector, MarkerScan};
pub use plan_executor::{PlanOutcome, execute_plan};
pub use segment_mapper::{Slice, map_highlight};
pub use timeline::{SourceSegment, Timeline, TimelineBuild, build_timeline};
