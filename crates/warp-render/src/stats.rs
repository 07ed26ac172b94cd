use instant::{Duration, Instant};

/// Counts presented frames and reports a rate once per window.
pub struct FrameStats {
    window: Duration,
    started: Instant,
    frames: u32,
}

impl FrameStats {
    pub fn new(window: Duration) -> Self {
        Self::starting_at(window, Instant::now())
    }

    pub fn starting_at(window: Duration, now: Instant) -> Self {
        Self {
            window,
            started: now,
            frames: 0,
        }
    }

    /// Count one frame; returns frames per second when a window closes.
    pub fn record(&mut self) -> Option<f32> {
        self.record_at(Instant::now())
    }

    pub fn record_at(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        if now <= self.started {
            return None;
        }
        let elapsed = now - self.started;
        if elapsed < self.window {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.started = now;
        self.frames = 0;
        Some(fps)
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_window() {
        let t0 = Instant::now();
        let mut stats = FrameStats::starting_at(Duration::from_secs(1), t0);
        for i in 1..60 {
            assert_eq!(stats.record_at(t0 + Duration::from_millis(i * 16)), None);
        }
        let fps = stats.record_at(t0 + Duration::from_secs(1)).unwrap_or(0.0);
        assert!((fps - 60.0).abs() < 1e-3);
        // window restarts
        assert_eq!(stats.record_at(t0 + Duration::from_millis(1016)), None);
    }
}
