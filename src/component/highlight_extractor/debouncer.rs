use super::marker_detector::Marker;
use crate::config::HighlightSettings;

/// 以觸發點為終點、往前回推固定長度的精華區間（全域時間）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight {
    pub start: f64,
    pub end: f64,
}

impl Highlight {
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// 觸發點恰好在時間軸起點時長度為 0
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.duration() <= 0.0
    }
}

/// 冷卻時間去抖動
///
/// 只和最後一次「輸出」的觸發點比較，因此一串密集標記中
/// 最早的那一個會勝出。
#[derive(Debug, Clone)]
pub struct HighlightDebouncer {
    highlight_duration: f64,
    cooldown_period: f64,
    last_emitted_time: Option<f64>,
}

impl HighlightDebouncer {
    #[must_use]
    pub const fn new(highlight_duration: f64, cooldown_period: f64) -> Self {
        Self {
            highlight_duration,
            cooldown_period,
            last_emitted_time: None,
        }
    }

    #[must_use]
    pub const fn from_settings(settings: &HighlightSettings) -> Self {
        Self::new(settings.highlight_duration, settings.cooldown_period)
    }

    /// 餵入下一個標記，通過冷卻檢查時回傳新的精華區間
    pub fn push(&mut self, marker: Marker) -> Option<Highlight> {
        let time = marker.global_time;
        let accepted = self
            .last_emitted_time
            .is_none_or(|last| time - last > self.cooldown_period);

        if !accepted {
            return None;
        }

        self.last_emitted_time = Some(time);
        Some(Highlight {
            start: (time - self.highlight_duration).max(0.0),
            end: time,
        })
    }

    /// 包裝成惰性迭代器，不需要先收集所有標記
    pub fn debounce<I>(self, markers: I) -> Debounced<I::IntoIter>
    where
        I: IntoIterator<Item = Marker>,
    {
        Debounced {
            markers: markers.into_iter(),
            debouncer: self,
        }
    }
}

pub struct Debounced<I> {
    markers: I,
    debouncer: HighlightDebouncer,
}

impl<I: Iterator<Item = Marker>> Iterator for Debounced<I> {
    type Item = Highlight;

    fn next(&mut self) -> Option<Highlight> {
        for marker in self.markers.by_ref() {
            if let Some(highlight) = self.debouncer.push(marker) {
                return Some(highlight);
            }
        }
        None
    }
}
