use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 第二次 Ctrl-C 時的結束碼
const FORCED_EXIT_CODE: i32 = 130;

/// 安裝 Ctrl-C 處理器，回傳共用的中斷旗標
///
/// 第一次中斷只設定旗標，讓目前的精華完成並清理暫存檔；
/// 第二次中斷直接結束程式。
pub fn setup_shutdown_signal() -> Result<Arc<AtomicBool>> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let handler_signal = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        if handler_signal.swap(true, Ordering::SeqCst) {
            eprintln!("\n再次收到中斷信號，強制結束");
            std::process::exit(FORCED_EXIT_CODE);
        }
        eprintln!("\n收到中斷信號，完成目前的步驟並清理暫存檔後停止...");
    })
    .context("無法設定 Ctrl-C 處理器")?;

    Ok(shutdown_signal)
}
