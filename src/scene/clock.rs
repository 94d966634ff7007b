use std::time::{Duration, Instant};

/// Source of per-frame delta times for a layer
#[derive(Debug, Clone)]
pub enum FrameClock {
    /// Wall-clock time between successive `delta` calls
    Realtime { last: Option<Instant> },
    /// Constant step, for headless runs and tests
    Fixed { step: f32 },
}

impl FrameClock {
    pub fn realtime() -> Self {
        FrameClock::Realtime { last: None }
    }

    pub fn fixed(step: f32) -> Self {
        FrameClock::Fixed { step }
    }

    /// Seconds since the previous call. The first realtime call returns zero.
    pub fn delta(&mut self) -> f32 {
        match self {
            FrameClock::Realtime { last } => {
                let now = Instant::now();
                let elapsed = last.map_or(Duration::ZERO, |previous| now - previous);
                *last = Some(now);
                elapsed.as_secs_f32()
            }
            FrameClock::Fixed { step } => *step,
        }
    }

    /// Forget the previous frame so the next delta starts from zero
    pub fn reset(&mut self) {
        if let FrameClock::Realtime { last } = self {
            *last = None;
        }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::realtime()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_step() {
        let mut clock = FrameClock::fixed(1.0 / 60.0);
        assert_eq!(clock.delta(), 1.0 / 60.0);
        assert_eq!(clock.delta(), 1.0 / 60.0);
    }

    #[test]
    fn test_realtime_first_delta_is_zero() {
        let mut clock = FrameClock::realtime();
        assert_eq!(clock.delta(), 0.0);
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.delta() > 0.0);

        clock.reset();
        assert_eq!(clock.delta(), 0.0);
    }
}
