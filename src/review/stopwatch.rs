//! Smoke-time stopwatch
//!
//! Every operation has an `*_at` variant taking the current instant so
//! callers with their own clock (and tests) can drive it.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopwatchState {
    #[default]
    Idle,
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Stopwatch {
    state: StopwatchState,
    /// Time banked by earlier running spans
    banked: Duration,
    /// Start of the current running span
    since: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StopwatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StopwatchState::Running
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Start from zero; ignored unless idle
    pub fn start_at(&mut self, now: Instant) {
        if self.state == StopwatchState::Idle {
            self.since = Some(now);
            self.state = StopwatchState::Running;
        }
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if let Some(since) = self.since.take() {
            self.banked += now.saturating_duration_since(since);
            self.state = StopwatchState::Paused;
        }
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    /// Continue after a pause; ignored unless paused
    pub fn resume_at(&mut self, now: Instant) {
        if self.state == StopwatchState::Paused {
            self.since = Some(now);
            self.state = StopwatchState::Running;
        }
    }

    pub fn reset(&mut self) {
        self.state = StopwatchState::Idle;
        self.banked = Duration::ZERO;
        self.since = None;
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn elapsed_at(&self, now: Instant) -> Duration {
        match self.since {
            Some(since) => self.banked + now.saturating_duration_since(since),
            None => self.banked,
        }
    }
}

/// `h:mm:ss`, or `m:ss` under an hour
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_across_pause_and_resume() {
        let t0 = Instant::now();
        let mut watch = Stopwatch::new();
        assert_eq!(watch.state(), StopwatchState::Idle);

        watch.start_at(t0);
        assert_eq!(watch.state(), StopwatchState::Running);
        assert_eq!(watch.elapsed_at(t0 + Duration::from_secs(10)), Duration::from_secs(10));

        watch.pause_at(t0 + Duration::from_secs(30));
        assert_eq!(watch.state(), StopwatchState::Paused);
        // paused time does not count
        assert_eq!(watch.elapsed_at(t0 + Duration::from_secs(500)), Duration::from_secs(30));

        watch.resume_at(t0 + Duration::from_secs(600));
        watch.pause_at(t0 + Duration::from_secs(645));
        assert_eq!(watch.elapsed_at(t0 + Duration::from_secs(700)), Duration::from_secs(75));
    }

    #[test]
    fn test_ignores_out_of_order_calls() {
        let t0 = Instant::now();
        let mut watch = Stopwatch::new();

        watch.resume_at(t0);
        assert_eq!(watch.state(), StopwatchState::Idle);
        watch.pause_at(t0);
        assert_eq!(watch.state(), StopwatchState::Idle);

        watch.start_at(t0);
        watch.start_at(t0 + Duration::from_secs(5));
        assert_eq!(watch.elapsed_at(t0 + Duration::from_secs(10)), Duration::from_secs(10));
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let t0 = Instant::now();
        let mut watch = Stopwatch::new();
        watch.start_at(t0);
        watch.pause_at(t0 + Duration::from_secs(3));
        watch.reset();

        assert_eq!(watch.state(), StopwatchState::Idle);
        assert_eq!(watch.elapsed_at(t0 + Duration::from_secs(9)), Duration::ZERO);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0:00");
        assert_eq!(format_elapsed(Duration::from_secs(75)), "1:15");
        assert_eq!(format_elapsed(Duration::from_secs(3 * 3600 + 62)), "3:01:02");
    }
}
