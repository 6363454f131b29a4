use super::debouncer::{Highlight, HighlightDebouncer};
use super::extraction_planner::ExtractionPlanner;
use super::marker_detector::MarkerDetector;
use super::plan_executor::execute_plan;
use super::segment_mapper::map_highlight;
use super::timeline::{Timeline, build_timeline};
use crate::config::save::{add_recent_path, save_settings};
use crate::config::{Config, HighlightSettings, UserSettings};
use crate::tools::{
    FfmpegBackend, MediaBackend, ensure_directory_exists, scan_video_files,
    validate_directory_exists,
};
use anyhow::Result;
use console::style;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

/// 精華擷取結果
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractionSummary {
    pub total_videos: usize,
    pub probe_failures: usize,
    pub timeline_seconds: f64,
    pub decode_failures: usize,
    pub samples: u64,
    pub markers: usize,
    pub highlights: usize,
    pub produced: Vec<PathBuf>,
    pub failed: usize,
    /// 長度為 0 而略過的精華
    pub skipped: usize,
    pub cleanup_failures: usize,
}

/// 黑畫面精華擷取器
///
/// 四階段流程：
/// A. 讀取每個影片長度，串成全域時間軸
/// B. 取樣偵測黑畫面並套用冷卻時間
/// C. 將精華區間對應回來源檔案並規劃步驟
/// D. 執行擷取（跨檔案時合併重新編碼）
pub struct HighlightExtractor<B: MediaBackend = FfmpegBackend> {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
    backend: B,
}

impl HighlightExtractor<FfmpegBackend> {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self::with_backend(config, shutdown_signal, FfmpegBackend)
    }
}

impl<B: MediaBackend> HighlightExtractor<B> {
    pub const fn with_backend(config: Config, shutdown_signal: Arc<AtomicBool>, backend: B) -> Self {
        Self {
            config,
            shutdown_signal,
            backend,
        }
    }

    #[must_use]
    pub const fn settings(&self) -> &UserSettings {
        &self.config.settings
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style("=== 黑畫面精華擷取 ===").cyan().bold());

        let input_path = self.prompt_input_path()?;
        let input_dir = PathBuf::from(&input_path);
        validate_directory_exists(&input_dir)?;

        let output_path = self.prompt_output_path(&input_dir)?;
        let output_dir = PathBuf::from(&output_path);

        add_recent_path(&mut self.config.settings, &input_path);
        if let Err(e) = save_settings(&self.config.settings) {
            warn!("無法儲存最近使用路徑: {e:#}");
        }

        let summary = self.process(&input_dir, &output_dir)?;
        self.print_summary(&summary);

        Ok(())
    }

    fn prompt_input_path(&self) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt("請輸入影片資料夾路徑");
        if let Some(recent) = self.config.settings.recent_paths.first() {
            input = input.default(recent.clone());
        }
        let path = input.interact_text()?;
        Ok(path.trim().to_string())
    }

    fn prompt_output_path(&self, input_dir: &Path) -> Result<String> {
        let default_output = input_dir.join("highlights").to_string_lossy().to_string();
        let path: String = Input::new()
            .with_prompt("請輸入精華輸出資料夾路徑")
            .default(default_output)
            .interact_text()?;
        Ok(path.trim().to_string())
    }

    /// 不需互動的完整流程
    pub fn process(&self, input_dir: &Path, output_dir: &Path) -> Result<ExtractionSummary> {
        let settings = &self.config.settings.highlight;
        settings.validate()?;
        ensure_directory_exists(output_dir)?;

        let mut summary = ExtractionSummary::default();

        let video_files = scan_video_files(input_dir, &settings.extension())?;
        summary.total_videos = video_files.len();

        if video_files.is_empty() {
            println!(
                "{}",
                style(format!("找不到任何 .{} 影片", settings.extension())).yellow()
            );
            return Ok(summary);
        }

        println!(
            "{}",
            style(format!(
                "找到 {} 個影片檔案，依檔名排序串接",
                video_files.len()
            ))
            .green()
        );

        // Stage A: 建立時間軸
        println!("  {} 讀取影片長度...", style("A").dim());
        let build = build_timeline(&self.backend, &video_files);
        summary.probe_failures = build.failures.len();
        for failure in &build.failures {
            println!("  {} {}", style("✗").red(), failure);
        }

        let timeline = build.timeline;
        summary.timeline_seconds = timeline.total_duration();
        for (index, segment) in timeline.segments().iter().enumerate() {
            println!(
                "    {}. {} [{:.1}s - {:.1}s] 每 {} 幀取樣",
                index + 1,
                segment.file_name(),
                segment.global_start,
                segment.global_end(),
                settings.stride_frames(segment.frame_rate)
            );
        }

        if timeline.is_empty() {
            println!("{}", style("沒有可用的影片").yellow());
            return Ok(summary);
        }

        // Stage B: 偵測黑畫面
        println!("  {} 偵測黑畫面...", style("B").dim());
        let highlights = self.detect_highlights(&timeline, settings, &mut summary);
        println!(
            "    {} 個黑畫面，{} 段精華",
            summary.markers, summary.highlights
        );
        info!("精華區間: {highlights:?}");

        // Stage C + D: 規劃並執行
        println!("  {} 擷取精華...", style("C").dim());
        let temp_dir = output_dir.join(format!(".tmp_highlights_{}", Uuid::new_v4()));
        ensure_directory_exists(&temp_dir)?;

        self.extract_highlights(&timeline, &highlights, output_dir, &temp_dir, &mut summary);

        if temp_dir.exists() && fs::remove_dir_all(&temp_dir).is_err() {
            warn!("無法清理暫存目錄: {}", temp_dir.display());
        }

        Ok(summary)
    }

    fn detect_highlights(
        &self,
        timeline: &Timeline,
        settings: &HighlightSettings,
        summary: &mut ExtractionSummary,
    ) -> Vec<Highlight> {
        let detector = MarkerDetector::from_settings(settings);
        let mut debouncer = HighlightDebouncer::from_settings(settings);
        let mut highlights = Vec::new();

        for segment in timeline.segments() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止偵測");
                break;
            }

            let progress_bar = ProgressBar::new(detector.sample_count(segment));
            progress_bar.set_style(
                ProgressStyle::default_bar()
                    .template("    [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            progress_bar.set_message(segment.file_name());

            let mut scan = detector
                .scan(&self.backend, segment)
                .with_progress(progress_bar)
                .with_shutdown_signal(&self.shutdown_signal);

            for marker in scan.by_ref() {
                summary.markers += 1;
                if let Some(highlight) = debouncer.push(marker) {
                    highlights.push(highlight);
                }
            }

            summary.samples += scan.samples_taken();
            debug!(
                "{}: 取樣 {} 次",
                segment.file_name(),
                scan.samples_taken()
            );

            if let Some(failure) = scan.take_failure() {
                println!("    {} {}", style("⚠").yellow(), failure);
                summary.decode_failures += 1;
            }
        }

        summary.highlights = highlights.len();
        highlights
    }

    fn extract_highlights(
        &self,
        timeline: &Timeline,
        highlights: &[Highlight],
        output_dir: &Path,
        temp_dir: &Path,
        summary: &mut ExtractionSummary,
    ) {
        let planner = ExtractionPlanner::new(output_dir, temp_dir, &self.config.settings.highlight);

        for (index, highlight) in highlights.iter().enumerate() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                warn!("收到中斷訊號，停止擷取");
                break;
            }

            let highlight_id = index + 1;
            let slices = map_highlight(timeline.segments(), highlight);

            let Some(plan) = planner.plan(highlight_id, &slices) else {
                warn!("精華 {highlight_id} 長度為 0，略過");
                println!("    {} highlight_{highlight_id} 長度為 0，略過", style("⤳").dim());
                summary.skipped += 1;
                continue;
            };

            let outcome = execute_plan(&self.backend, &plan);
            summary.cleanup_failures += outcome.cleanup_failures.len();

            match (outcome.output, outcome.failure) {
                (Some(output), _) => {
                    println!(
                        "    {} {} [{:.1}s - {:.1}s, {} 個來源]",
                        style("✓").green(),
                        output.file_name().unwrap_or_default().to_string_lossy(),
                        highlight.start,
                        highlight.end,
                        slices.len()
                    );
                    summary.produced.push(output);
                }
                (None, failure) => {
                    let reason = failure.map_or_else(|| "未知錯誤".to_string(), |e| e.to_string());
                    error!("精華 {highlight_id} 擷取失敗: {reason}");
                    println!("    {} highlight_{highlight_id}: {reason}", style("✗").red());
                    summary.failed += 1;
                }
            }
        }
    }

    fn print_summary(&self, summary: &ExtractionSummary) {
        println!();
        println!("{}", style("=== 精華擷取摘要 ===").cyan().bold());
        println!(
            "  影片: {} 個（時間軸 {:.1} 秒）",
            summary.total_videos, summary.timeline_seconds
        );
        println!(
            "  黑畫面: {} 個（取樣 {} 次）",
            summary.markers, summary.samples
        );
        println!("  成功: {} 段", style(summary.produced.len()).green());

        if summary.skipped > 0 {
            println!("  跳過: {} 段", style(summary.skipped).yellow());
        }
        if summary.failed > 0 {
            println!("  失敗: {} 段", style(summary.failed).red());
        }
        if summary.probe_failures > 0 {
            println!("  無法讀取: {} 個影片", style(summary.probe_failures).red());
        }
        if summary.decode_failures > 0 {
            println!(
                "  提前停止取樣: {} 個影片",
                style(summary.decode_failures).yellow()
            );
        }
        if summary.cleanup_failures > 0 {
            println!("  暫存檔清理失敗: {} 個", style(summary.cleanup_failures).yellow());
        }

        info!(
            "精華擷取完成 - 成功: {}, 跳過: {}, 失敗: {}",
            summary.produced.len(),
            summary.skipped,
            summary.failed
        );
    }
}
