use super::error::MediaResult;
use super::ffmpeg_ops::{concat_clips, extract_clip, remove_artifact};
use super::ffprobe_info::{VideoInfo, get_video_info};
use super::frame_sampler::sample_brightness;
use std::path::{Path, PathBuf};

/// 外部媒體工具介面
///
/// 核心流程只透過這五個操作與 ffmpeg/ffprobe 互動，
/// 測試時以假的實作替換。
pub trait MediaBackend: Sync {
    /// 取得影片長度、幀率與總幀數
    fn probe(&self, path: &Path) -> MediaResult<VideoInfo>;

    /// 解碼指定時間點的一幀並回傳所有通道的平均亮度
    fn sample_brightness(&self, path: &Path, seconds: f64) -> MediaResult<f64>;

    /// 以 stream copy 擷取 `[start, start + duration)` 到 `output`
    fn extract(&self, source: &Path, start: f64, duration: f64, output: &Path) -> MediaResult<()>;

    /// 依序合併多個片段並以固定幀率重新編碼
    fn concat(&self, inputs: &[PathBuf], output: &Path, frame_rate: u32, crf: u8)
    -> MediaResult<()>;

    /// 刪除暫存檔
    fn remove(&self, path: &Path) -> MediaResult<()>;
}

/// 以 ffmpeg / ffprobe 命令列實作
#[derive(Debug, Clone, Copy, Default)]
pub struct FfmpegBackend;

impl MediaBackend for FfmpegBackend {
    fn probe(&self, path: &Path) -> MediaResult<VideoInfo> {
        get_video_info(path)
    }

    fn sample_brightness(&self, path: &Path, seconds: f64) -> MediaResult<f64> {
        sample_brightness(path, seconds)
    }

    fn extract(&self, source: &Path, start: f64, duration: f64, output: &Path) -> MediaResult<()> {
        extract_clip(source, start, duration, output)
    }

    fn concat(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        frame_rate: u32,
        crf: u8,
    ) -> MediaResult<()> {
        concat_clips(inputs, output, frame_rate, crf)
    }

    fn remove(&self, path: &Path) -> MediaResult<()> {
        remove_artifact(path)
    }
}

impl<T: MediaBackend + ?Sized> MediaBackend for &T {
    fn probe(&self, path: &Path) -> MediaResult<VideoInfo> {
        (**self).probe(path)
    }

    fn sample_brightness(&self, path: &Path, seconds: f64) -> MediaResult<f64> {
        (**self).sample_brightness(path, seconds)
    }

    fn extract(&self, source: &Path, start: f64, duration: f64, output: &Path) -> MediaResult<()> {
        (**self).extract(source, start, duration, output)
    }

    fn concat(
        &self,
        inputs: &[PathBuf],
        output: &Path,
        frame_rate: u32,
        crf: u8,
    ) -> MediaResult<()> {
        (**self).concat(inputs, output, frame_rate, crf)
    }

    fn remove(&self, path: &Path) -> MediaResult<()> {
        (**self).remove(path)
    }
}
