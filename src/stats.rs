use std::time::{Duration, Instant};

/// Counts frames and reports the rate once per interval.
pub struct FrameStats {
    frames: u32,
    since: Instant,
    interval: Duration,
}

impl FrameStats {
    pub fn new(now: Instant, interval: Duration) -> Self {
        Self {
            frames: 0,
            since: now,
            interval,
        }
    }

    /// Record a frame finished at `now`. Returns frames per second when an
    /// interval has elapsed, then starts counting again.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.since);
        if elapsed < self.interval || elapsed.is_zero() {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.since = now;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reports_once_per_interval() {
        let t0 = Instant::now();
        let mut stats = FrameStats::new(t0, Duration::from_secs(1));
        for i in 1..50u64 {
            assert!(stats.frame(t0 + Duration::from_millis(i * 20)).is_none());
        }
        let fps = stats.frame(t0 + Duration::from_secs(1)).unwrap();
        assert_relative_eq!(fps, 50.0, epsilon = 1e-3);

        assert!(stats.frame(t0 + Duration::from_millis(1500)).is_none());
    }
}
