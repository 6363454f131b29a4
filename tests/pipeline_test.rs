//! 整合測試 - 以假的媒體工具驗證完整精華擷取流程
//!
//! 不需要 ffmpeg：影片只是空檔案，長度與亮度由 `ScriptedBackend` 提供

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use black_frame_highlights::component::HighlightExtractor;
use black_frame_highlights::component::highlight_extractor::{
    ExtractionPlanner, Highlight, HighlightDebouncer, MarkerDetector, Operation, build_timeline,
    execute_plan, map_highlight,
};
use black_frame_highlights::config::{Config, HighlightSettings, UserSettings};
use black_frame_highlights::tools::{MediaBackend, MediaError, MediaResult, VideoInfo};
use tempfile::TempDir;

struct ScriptedVideo {
    duration: f64,
    frame_rate: f64,
    dark: Vec<(f64, f64)>,
    decode_fails_from: Option<f64>,
}

#[derive(Default)]
struct ScriptedBackend {
    videos: HashMap<String, ScriptedVideo>,
    fail_concat: bool,
    fail_extract_of: Option<String>,
    log: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn video(mut self, name: &str, duration: f64, frame_rate: f64, dark: &[(f64, f64)]) -> Self {
        self.videos.insert(
            name.to_string(),
            ScriptedVideo {
                duration,
                frame_rate,
                dark: dark.to_vec(),
                decode_fails_from: None,
            },
        );
        self
    }

    fn decode_fails_from(mut self, name: &str, seconds: f64) -> Self {
        if let Some(video) = self.videos.get_mut(name) {
            video.decode_fails_from = Some(seconds);
        }
        self
    }

    fn lookup(&self, path: &Path) -> Option<&ScriptedVideo> {
        let name = path.file_name()?.to_str()?;
        self.videos.get(name)
    }

    fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn push(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }
}

fn name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

impl MediaBackend for ScriptedBackend {
    fn probe(&self, path: &Path) -> MediaResult<VideoInfo> {
        let video = self.lookup(path).ok_or_else(|| MediaError::Probe {
            path: path.to_path_buf(),
            message: "unreadable".to_string(),
        })?;
        Ok(VideoInfo {
            duration_seconds: video.duration,
            frame_rate: video.frame_rate,
            frame_count: (video.duration * video.frame_rate).floor() as u64,
        })
    }

    fn sample_brightness(&self, path: &Path, seconds: f64) -> MediaResult<f64> {
        let video = self.lookup(path).ok_or_else(|| MediaError::Decode {
            path: path.to_path_buf(),
            seconds,
            message: "missing".to_string(),
        })?;
        if video.decode_fails_from.is_some_and(|from| seconds >= from) {
            return Err(MediaError::Decode {
                path: path.to_path_buf(),
                seconds,
                message: "corrupt".to_string(),
            });
        }
        let dark = video.dark.iter().any(|&(s, e)| seconds >= s && seconds < e);
        Ok(if dark { 2.0 } else { 200.0 })
    }

    fn extract(&self, source: &Path, start: f64, duration: f64, output: &Path) -> MediaResult<()> {
        self.push(format!(
            "extract {} {start:.1}+{duration:.1} -> {}",
            name_of(source),
            name_of(output)
        ));
        let failing = self.fail_extract_of.as_deref() == Some(name_of(source).as_str());
        // 失敗時和 ffmpeg 一樣留下寫到一半的檔案
        fs::write(output, if failing { &b"trunc"[..] } else { &b"clip"[..] }).map_err(|e| {
            MediaError::Extract {
                path: source.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        if failing {
            return Err(MediaError::Extract {
                path: source.to_path_buf(),
                message: "injected".to_string(),
            });
        }
        Ok(())
    }

    fn concat(&self, inputs: &[PathBuf], output: &Path, _frame_rate: u32, _crf: u8) -> MediaResult<()> {
        let names: Vec<_> = inputs.iter().map(|p| name_of(p)).collect();
        self.push(format!("concat {} -> {}", names.join("+"), name_of(output)));
        if self.fail_concat {
            let _ = fs::write(output, b"trunc");
            return Err(MediaError::Concat {
                output: output.to_path_buf(),
                message: "injected".to_string(),
            });
        }
        fs::write(output, b"joined").map_err(|e| MediaError::Concat {
            output: output.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn remove(&self, path: &Path) -> MediaResult<()> {
        self.push(format!("remove {}", name_of(path)));
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(MediaError::Cleanup {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }
}

fn setup_input(names: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for name in names {
        fs::write(temp_dir.path().join(name), b"").unwrap();
    }
    temp_dir
}

fn extractor<B: MediaBackend>(backend: B) -> HighlightExtractor<B> {
    let config = Config {
        settings: UserSettings::default(),
    };
    HighlightExtractor::with_backend(config, Arc::new(AtomicBool::new(false)), backend)
}

/// 測試 1: 單一檔案內的精華直接 stream copy，不需要合併
#[test]
fn test_single_file_highlight() {
    let input = setup_input(&["clip_01.mp4"]);
    let output = input.path().join("out");
    // 預設每 5 秒取樣：60s 與 65s 都是黑畫面，65s 在冷卻時間內
    let backend = ScriptedBackend::default().video("clip_01.mp4", 120.0, 24.0, &[(60.0, 66.0)]);

    let summary = extractor(&backend).process(input.path(), &output).unwrap();

    assert_eq!(summary.total_videos, 1);
    // 120 秒、每 120 幀（5 秒）取樣一次
    assert_eq!(summary.samples, 24);
    assert_eq!(summary.markers, 2);
    assert_eq!(summary.highlights, 1);
    assert_eq!(summary.produced, vec![output.join("highlight_1.mp4")]);
    assert_eq!(
        backend.log(),
        vec!["extract clip_01.mp4 40.0+20.0 -> highlight_1.mp4"]
    );
}

/// 測試 2: 跨檔案精華需要合併，暫存檔全部清除
#[test]
fn test_highlight_across_files() {
    let input = setup_input(&["b.mp4", "a.mp4", "ignore.txt"]);
    let output = input.path().join("out");
    // a: [0, 50)，b: [50, 120)；b 在本地 10s（全域 60s）變黑
    let backend = ScriptedBackend::default()
        .video("a.mp4", 50.0, 24.0, &[])
        .video("b.mp4", 70.0, 24.0, &[(10.0, 11.0)]);

    let summary = extractor(backend).process(input.path(), &output).unwrap();

    assert_eq!(summary.total_videos, 2);
    assert!((summary.timeline_seconds - 120.0).abs() < 1e-9);
    assert_eq!(summary.markers, 1);
    assert_eq!(summary.highlights, 1);
    assert_eq!(summary.produced, vec![output.join("highlight_1.mp4")]);
    assert!(output.join("highlight_1.mp4").exists());

    // 只剩輸出檔，沒有殘留暫存資料夾
    let leftovers: Vec<_> = fs::read_dir(&output)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(leftovers, vec!["highlight_1.mp4"]);
}

/// 測試 3: 冷卻時間與編號
#[test]
fn test_cooldown_and_numbering() {
    let input = setup_input(&["rec.mp4"]);
    let output = input.path().join("out");
    // 每 5 秒取樣：5, 10(冷卻中), 25, 30(冷卻中), 60
    let backend = ScriptedBackend::default().video(
        "rec.mp4",
        100.0,
        30.0,
        &[(5.0, 11.0), (25.0, 31.0), (60.0, 61.0)],
    );

    let summary = extractor(backend).process(input.path(), &output).unwrap();

    assert_eq!(summary.markers, 5);
    assert_eq!(summary.highlights, 3);
    assert_eq!(
        summary.produced,
        vec![
            output.join("highlight_1.mp4"),
            output.join("highlight_2.mp4"),
            output.join("highlight_3.mp4"),
        ]
    );
}

/// 測試 4: 讀取失敗與解碼失敗都不會中止流程
#[test]
fn test_failures_are_local() {
    let input = setup_input(&["1.mp4", "2.mp4", "3.mp4"]);
    let output = input.path().join("out");
    let backend = ScriptedBackend::default()
        .video("1.mp4", 40.0, 24.0, &[(30.0, 31.0)])
        // 2.mp4 無法讀取
        .video("3.mp4", 40.0, 24.0, &[(5.0, 6.0), (35.0, 36.0)])
        .decode_fails_from("3.mp4", 20.0);

    let summary = extractor(backend).process(input.path(), &output).unwrap();

    assert_eq!(summary.probe_failures, 1);
    assert_eq!(summary.decode_failures, 1);
    // 1.mp4 取樣 8 次；3.mp4 在 20s 解碼失敗前取樣 4 次
    assert_eq!(summary.samples, 12);
    assert!((summary.timeline_seconds - 80.0).abs() < 1e-9);
    // 30s（1.mp4）與 45s（3.mp4 本地 5s）
    assert_eq!(summary.markers, 2);
    assert_eq!(summary.produced.len(), 2);
}

/// 測試 5: 合併失敗時仍清除暫存檔，下一段精華繼續處理
#[test]
fn test_concat_failure_still_cleans_up() {
    let input = setup_input(&["a.mp4", "b.mp4"]);
    let output = input.path().join("out");
    let mut backend = ScriptedBackend::default()
        .video("a.mp4", 50.0, 24.0, &[])
        .video("b.mp4", 70.0, 24.0, &[(10.0, 11.0), (50.0, 51.0)]);
    backend.fail_concat = true;

    let summary = extractor(backend).process(input.path(), &output).unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.produced, vec![output.join("highlight_2.mp4")]);
    assert_eq!(summary.cleanup_failures, 0);
    assert!(!output.join("highlight_1.mp4").exists());
}

/// 測試 8: 擷取失敗時不留下寫到一半的輸出檔
#[test]
fn test_failed_extract_leaves_no_output() {
    let input = setup_input(&["clip_01.mp4"]);
    let output = input.path().join("out");
    let mut backend = ScriptedBackend::default().video("clip_01.mp4", 120.0, 24.0, &[(60.0, 61.0)]);
    backend.fail_extract_of = Some("clip_01.mp4".to_string());

    let summary = extractor(&backend).process(input.path(), &output).unwrap();

    assert_eq!(summary.highlights, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.produced.is_empty());
    assert_eq!(summary.cleanup_failures, 0);
    assert!(!output.join("highlight_1.mp4").exists());
    assert_eq!(
        backend.log(),
        vec![
            "extract clip_01.mp4 40.0+20.0 -> highlight_1.mp4",
            "remove highlight_1.mp4",
        ]
    );
}

/// 測試 6: 觸發點在時間軸起點時略過
#[test]
fn test_zero_length_highlight_skipped() {
    let input = setup_input(&["a.mp4"]);
    let output = input.path().join("out");
    let backend = ScriptedBackend::default().video("a.mp4", 30.0, 24.0, &[(0.0, 1.0), (20.0, 21.0)]);

    let summary = extractor(backend).process(input.path(), &output).unwrap();

    assert_eq!(summary.highlights, 2);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.produced, vec![output.join("highlight_2.mp4")]);
}

/// 測試 7: 各元件可直接組合成惰性管線
#[test]
fn test_components_compose_lazily() {
    let input = setup_input(&["A.mp4", "B.mp4"]);
    let backend = ScriptedBackend::default()
        .video("A.mp4", 50.0, 25.0, &[])
        .video("B.mp4", 70.0, 50.0, &[(10.0, 11.0)]);
    let files = vec![input.path().join("A.mp4"), input.path().join("B.mp4")];
    let settings = HighlightSettings::default();

    let build = build_timeline(&backend, &files);
    let timeline = build.timeline;
    let detector = MarkerDetector::from_settings(&settings);

    let markers = timeline
        .segments()
        .iter()
        .flat_map(|segment| detector.scan(&backend, segment));
    let highlights: Vec<Highlight> = HighlightDebouncer::from_settings(&settings)
        .debounce(markers)
        .collect();
    assert_eq!(highlights, vec![Highlight { start: 40.0, end: 60.0 }]);

    let slices = map_highlight(timeline.segments(), &highlights[0]);
    assert_eq!(slices.len(), 2);

    let output = input.path().join("out");
    let temp = input.path().join("tmp");
    fs::create_dir_all(&output).unwrap();
    fs::create_dir_all(&temp).unwrap();
    let planner = ExtractionPlanner::new(&output, &temp, &settings);
    let plan = planner.plan(1, &slices).unwrap();
    assert!(matches!(plan.operations.last(), Some(Operation::Cleanup { .. })));

    let outcome = execute_plan(&backend, &plan);
    assert!(outcome.is_success());
    assert_eq!(
        backend.log(),
        vec![
            "extract A.mp4 40.0+10.0 -> highlight_1_part_0.mp4",
            "extract B.mp4 0.0+10.0 -> highlight_1_part_1.mp4",
            "concat highlight_1_part_0.mp4+highlight_1_part_1.mp4 -> highlight_1.mp4",
            "remove highlight_1_part_0.mp4",
            "remove highlight_1_part_1.mp4",
        ]
    );
}
