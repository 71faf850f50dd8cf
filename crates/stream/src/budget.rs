use std::collections::VecDeque;
use std::time::Duration;

/// Per-advance streaming statistics for instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StreamStats {
    pub spawned_this_tick: usize,
    pub retired_this_tick: usize,
    pub destroyed_this_tick: usize,
    pub active_sections: usize,
    pub fading_sections: usize,
    pub advance_time: Duration,
}

/// Rolling window of recent advance durations.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
    }

    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.samples.iter().sum::<Duration>() / self.samples.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.samples.iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.samples.iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(120)
    }
}
