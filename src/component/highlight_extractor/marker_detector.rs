use super::timeline::SourceSegment;
use crate::config::{HighlightSettings, stride_frames};
use crate::tools::{MediaBackend, MediaError};
use indicatif::ProgressBar;
use log::{debug, warn};
use std::sync::atomic::{AtomicBool, Ordering};

/// 每處理多少秒輸出一次進度
const REPORT_EVERY_SECONDS: f64 = 60.0;

/// 偵測到的黑畫面（全域時間）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub global_time: f64,
}

/// 黑畫面偵測設定
#[derive(Debug, Clone, Copy)]
pub struct MarkerDetector {
    darkness_threshold: f64,
    sample_interval_seconds: f64,
}

impl MarkerDetector {
    #[must_use]
    pub const fn new(darkness_threshold: f64, sample_interval_seconds: f64) -> Self {
        Self {
            darkness_threshold,
            sample_interval_seconds,
        }
    }

    #[must_use]
    pub const fn from_settings(settings: &HighlightSettings) -> Self {
        Self::new(settings.darkness_threshold, settings.sample_interval_seconds)
    }

    /// 該檔案的取樣幀數間隔（依檔案本身的幀率換算）
    #[must_use]
    pub fn stride_for(&self, segment: &SourceSegment) -> u64 {
        stride_frames(self.sample_interval_seconds, segment.frame_rate)
    }

    /// 該檔案總共會取樣幾次
    #[must_use]
    pub fn sample_count(&self, segment: &SourceSegment) -> u64 {
        segment.frame_count.div_ceil(self.stride_for(segment))
    }

    /// 建立單一檔案的掃描迭代器，每次呼叫都從頭開始
    #[must_use]
    pub fn scan<'a, B: MediaBackend + ?Sized>(
        &self,
        backend: &'a B,
        segment: &'a SourceSegment,
    ) -> MarkerScan<'a, B> {
        MarkerScan {
            backend,
            segment,
            stride: self.stride_for(segment),
            threshold: self.darkness_threshold,
            next_frame: 0,
            next_report_at: REPORT_EVERY_SECONDS,
            finished: false,
            samples_taken: 0,
            failure: None,
            progress: None,
            shutdown_signal: None,
        }
    }
}

/// 以固定幀數間隔取樣單一檔案，逐一產生黑畫面標記
///
/// 解碼失敗時停止該檔案的取樣，已找到的標記保留。
pub struct MarkerScan<'a, B: MediaBackend + ?Sized> {
    backend: &'a B,
    segment: &'a SourceSegment,
    stride: u64,
    threshold: f64,
    next_frame: u64,
    next_report_at: f64,
    finished: bool,
    samples_taken: u64,
    failure: Option<MediaError>,
    progress: Option<ProgressBar>,
    shutdown_signal: Option<&'a AtomicBool>,
}

impl<'a, B: MediaBackend + ?Sized> MarkerScan<'a, B> {
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn with_shutdown_signal(mut self, shutdown_signal: &'a AtomicBool) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    #[must_use]
    pub const fn samples_taken(&self) -> u64 {
        self.samples_taken
    }

    /// 取出造成提前停止的解碼錯誤
    pub fn take_failure(&mut self) -> Option<MediaError> {
        self.failure.take()
    }

    fn finish(&mut self) {
        self.finished = true;
        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }
    }

    fn report_progress(&mut self, local_seconds: f64) {
        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
        if local_seconds >= self.next_report_at {
            debug!(
                "{}: 已處理 {:.0} 秒",
                self.segment.file_name(),
                local_seconds
            );
            self.next_report_at =
                (local_seconds / REPORT_EVERY_SECONDS).floor() * REPORT_EVERY_SECONDS
                    + REPORT_EVERY_SECONDS;
        }
    }
}

impl<B: MediaBackend + ?Sized> Iterator for MarkerScan<'_, B> {
    type Item = Marker;

    fn next(&mut self) -> Option<Marker> {
        while !self.finished {
            if self.next_frame >= self.segment.frame_count {
                self.finish();
                break;
            }

            if self
                .shutdown_signal
                .is_some_and(|signal| signal.load(Ordering::SeqCst))
            {
                warn!("收到中斷信號，停止取樣 {}", self.segment.file_name());
                self.finish();
                break;
            }

            let frame_index = self.next_frame;
            self.next_frame = self.next_frame.saturating_add(self.stride);
            let local_seconds = frame_index as f64 / self.segment.frame_rate;

            match self
                .backend
                .sample_brightness(&self.segment.path, local_seconds)
            {
                Ok(brightness) => {
                    self.samples_taken += 1;
                    self.report_progress(local_seconds);

                    if brightness < self.threshold {
                        return Some(Marker {
                            global_time: self.segment.global_start + local_seconds,
                        });
                    }
                }
                Err(e) => {
                    warn!("停止取樣 {}: {e}", self.segment.file_name());
                    self.failure = Some(e);
                    self.finish();
                }
            }
        }

        None
    }
}
