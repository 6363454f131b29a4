use std::path::PathBuf;
use thiserror::Error;

/// 外部媒體工具呼叫失敗的分類
///
/// 每一種失敗只影響它所屬的單位（一個檔案或一段精華），
/// 呼叫端記錄後繼續處理下一個單位。
#[derive(Debug, Error)]
pub enum MediaError {
    /// 無法啟動外部程式
    #[error("無法執行 {program}: {message}")]
    Spawn { program: &'static str, message: String },

    /// 無法取得影片長度，檔案會被排除於時間軸之外
    #[error("無法讀取影片資訊 {}: {message}", path.display())]
    Probe { path: PathBuf, message: String },

    /// 取樣點解碼失敗，該檔案停止取樣
    #[error("解碼失敗 {} @ {seconds:.3}s: {message}", path.display())]
    Decode {
        path: PathBuf,
        seconds: f64,
        message: String,
    },

    /// 片段擷取失敗
    #[error("擷取片段失敗 {}: {message}", path.display())]
    Extract { path: PathBuf, message: String },

    /// 跨檔案合併失敗
    #[error("合併片段失敗 {}: {message}", output.display())]
    Concat { output: PathBuf, message: String },

    /// 暫存檔清理失敗（不影響結果）
    #[error("無法清理暫存檔 {}: {message}", path.display())]
    Cleanup { path: PathBuf, message: String },
}

pub type MediaResult<T> = std::result::Result<T, MediaError>;
