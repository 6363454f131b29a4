use crate::component::HighlightExtractor;
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_highlight_extractor(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let mut extractor = HighlightExtractor::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = extractor.run() {
        eprintln!("{} {:#}", style(t!("main_menu.error_prefix")).red().bold(), e);
    }

    // 帶回最近使用的路徑
    config
        .settings
        .recent_paths
        .clone_from(&extractor.settings().recent_paths);

    pause(term)?;
    Ok(())
}
