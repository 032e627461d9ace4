use std::time::Instant;

const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Frame clock: per-frame delta time plus a once-per-second FPS estimate.
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    frame_count: u32,
    fps_update_timer: f32,
    fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            frame_count: 0,
            fps_update_timer: 0.0,
            fps: 0.0,
        }
    }

    /// Seconds since the previous tick. Advances the clock.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.record_frame(delta);
        delta
    }

    /// Average frames per second over the last full interval.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Average milliseconds per frame over the last full interval.
    pub fn frame_time_ms(&self) -> f32 {
        if self.fps > 0.0 {
            1000.0 / self.fps
        } else {
            0.0
        }
    }

    fn record_frame(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            log::debug!("FPS: {:.1}", self.fps);
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
