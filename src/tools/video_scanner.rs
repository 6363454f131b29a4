use anyhow::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 列出資料夾第一層中指定副檔名的影片，依檔名字典序排序
///
/// 排序依據是檔名而非建立時間，錄影軟體以時間戳命名時兩者一致。
pub fn scan_video_files(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let extension = extension.trim_start_matches('.').to_lowercase();

    let mut video_files: Vec<PathBuf> = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| has_extension(entry.path(), &extension))
        .map(walkdir::DirEntry::into_path)
        .collect();

    video_files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(video_files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.to_lowercase() == extension)
}
