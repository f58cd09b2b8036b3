use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// What a bar counts, which decides how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressUnit {
    Bytes,
    Files,
}

/// Receiver of progress updates, addressed by bar key.
///
/// Updating or removing a key that was never created must be a no-op: a
/// transfer without a known content length never registers a bar but still
/// reports its chunks.
pub trait ProgressSink: Send + Sync {
    fn create(&self, key: &str, total: u64, unit: ProgressUnit);

    fn increment(&self, key: &str, delta: u64);

    fn set(&self, key: &str, value: u64);

    fn remove(&self, key: &str);

    fn stop(&self);
}

/// Terminal progress bars backed by an indicatif [`MultiProgress`].
pub struct ProgressManager {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self::with_multi(MultiProgress::new())
    }

    /// A manager that tracks bars without drawing them.
    pub fn hidden() -> Self {
        Self::with_multi(MultiProgress::with_draw_target(ProgressDrawTarget::hidden()))
    }

    fn with_multi(multi: MultiProgress) -> Self {
        Self {
            multi,
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn bars(&self) -> MutexGuard<'_, HashMap<String, ProgressBar>> {
        // A panic while holding the lock leaves the map itself intact.
        self.bars.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn position(&self, key: &str) -> Option<u64> {
        self.bars().get(key).map(ProgressBar::position)
    }

    pub fn len(&self) -> usize {
        self.bars().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars().is_empty()
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

fn style_for(unit: ProgressUnit) -> ProgressStyle {
    let template = match unit {
        ProgressUnit::Bytes => "{msg} {bar:40} {bytes}/{total_bytes} ({bytes_per_sec})",
        ProgressUnit::Files => "{msg} {bar:40} {pos}/{len}",
    };

    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
}

impl ProgressSink for ProgressManager {
    fn create(&self, key: &str, total: u64, unit: ProgressUnit) {
        let pb = self.multi.add(ProgressBar::new(total));
        pb.set_style(style_for(unit));
        pb.set_message(key.to_string());

        if let Some(previous) = self.bars().insert(key.to_string(), pb) {
            previous.finish_and_clear();
            self.multi.remove(&previous);
        }
    }

    fn increment(&self, key: &str, delta: u64) {
        if let Some(pb) = self.bars().get(key) {
            pb.inc(delta);
        }
    }

    fn set(&self, key: &str, value: u64) {
        if let Some(pb) = self.bars().get(key) {
            pb.set_position(value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(pb) = self.bars().remove(key) {
            pb.finish_and_clear();
            self.multi.remove(&pb);
        }
    }

    fn stop(&self) {
        for (_, pb) in self.bars().drain() {
            pb.finish();
        }
    }
}
