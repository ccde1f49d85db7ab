use crate::color::Rgb;

/// Linear colour fade sampled once per frame. The clock starts on the first
/// sample so a transition requested between frames begins at `t = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorTransition {
    pub from: Rgb,
    pub to: Rgb,
    pub duration_secs: f32,
    started_at: Option<f64>,
}

impl ColorTransition {
    pub fn new(from: Rgb, to: Rgb, duration_secs: f32) -> Self {
        Self {
            from,
            to,
            duration_secs,
            started_at: None,
        }
    }

    /// Same target and timing, starting from another colour. Used to keep a
    /// child in lock-step with its parent's fade.
    pub fn joined_from(&self, from: Rgb) -> Self {
        Self { from, ..*self }
    }

    /// Progress in \[0, 1\] at `now` (seconds).
    pub fn progress(&mut self, now: f64) -> f32 {
        let start = *self.started_at.get_or_insert(now);
        if self.duration_secs <= 0.0 {
            return 1.0;
        }
        (((now - start) as f32) / self.duration_secs).clamp(0.0, 1.0)
    }

    /// Colour at `now` and whether the transition has finished.
    pub fn sample(&mut self, now: f64) -> (Rgb, bool) {
        let t = self.progress(now);
        (self.from.lerp(self.to, t), t >= 1.0)
    }
}
