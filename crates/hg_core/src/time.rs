use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

/// Wall-clock frame timing with a moving-average FPS readout.
pub struct FrameClock {
    pub frame_count: u64,
    pub real_dt: f64,
    pub total_time: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            real_dt: 0.0,
            total_time: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure the time since the previous tick.
    pub fn tick(&mut self) {
        let now = Instant::now();
        self.advance(now.duration_since(self.last_instant));
        self.last_instant = now;
    }

    /// Record one frame of length `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.real_dt = dt.as_secs_f64();
        self.total_time += self.real_dt;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
