//! Recording state machine and elapsed-time accounting.
//!
//! A session alternates between [`RecordingState::Idle`] and [`RecordingState::Recording`].
//! Two accounting disciplines are supported:
//! - snapshot: every start opens an independent window, the total time is the duration of the last window;
//! - persistent: successive windows accumulate into one total time, and the start time is the start of the first window.
use crate::error::MonitorError;
use crate::Time;

/// The state of a recording session.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
}

/// Timing bookkeeping of the start/stop cycles of a monitor.
/// Unset times are `None`.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct RecordingSession {
    state: RecordingState,
    /// Start of the first window (persistent) or of the last window (snapshot).
    start_time: Option<Time>,
    /// Start of the last window.
    last_start_time: Option<Time>,
    /// End of the last window.
    stop_time: Option<Time>,
    /// Time accumulated over the previous windows.
    accum_time: Time,
    /// Total recording time at the end of the last window.
    total_time: Option<Time>,
}

impl RecordingSession {
    /// Create an idle session with all times unset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    pub fn start_time(&self) -> Option<Time> {
        self.start_time
    }

    pub fn last_start_time(&self) -> Option<Time> {
        self.last_start_time
    }

    pub fn stop_time(&self) -> Option<Time> {
        self.stop_time
    }

    pub fn total_time(&self) -> Option<Time> {
        self.total_time
    }

    /// Reset all times to the unset state.
    /// The state is left untouched, callers only reset idle sessions.
    pub fn reset(&mut self) {
        self.start_time = None;
        self.last_start_time = None;
        self.stop_time = None;
        self.accum_time = 0;
        self.total_time = None;
    }

    /// Open a new recording window at time `now`.
    pub fn start(&mut self, now: Time, persistent: bool) -> Result<(), MonitorError> {
        if self.is_recording() {
            return Err(MonitorError::InconsistentTiming(
                "a recording window is already open".to_string(),
            ));
        }

        if persistent {
            self.start_time = Some(self.start_time.unwrap_or(now));
            self.last_start_time = Some(now);
            self.accum_time = self.total_time.filter(|&t| t > 0).unwrap_or(0);
        } else {
            self.start_time = Some(now);
            self.last_start_time = Some(now);
            self.accum_time = 0;
        }

        self.state = RecordingState::Recording;
        Ok(())
    }

    /// Check the timing bookkeeping of the open window.
    pub fn check_timing(&self) -> Result<(), MonitorError> {
        match (self.start_time, self.last_start_time) {
            (Some(start), Some(last_start))
                if start >= 0 && last_start >= 0 && self.accum_time >= 0 =>
            {
                Ok(())
            }
            _ => Err(MonitorError::InconsistentTiming(format!(
                "start time {:?}, last start time {:?}, accumulated time {}",
                self.start_time, self.last_start_time, self.accum_time
            ))),
        }
    }

    /// Returns the total recording time if the window were closed at time `now`,
    /// without closing it.
    pub fn check_stop(&self, now: Time) -> Result<Time, MonitorError> {
        if !self.is_recording() {
            return Err(MonitorError::InconsistentTiming(
                "no recording window is open".to_string(),
            ));
        }
        self.check_timing()?;

        let last_start = self.last_start_time.unwrap_or(now);
        let total_time = now
            .checked_sub(last_start)
            .and_then(|elapsed| elapsed.checked_add(self.accum_time))
            .ok_or_else(|| {
                MonitorError::InconsistentTiming(format!(
                    "total time overflows (stop at {}, last start at {}, accumulated {})",
                    now, last_start, self.accum_time
                ))
            })?;
        if total_time < 0 {
            return Err(MonitorError::InconsistentTiming(format!(
                "negative total time {} (stop at {}, last start at {})",
                total_time, now, last_start
            )));
        }
        Ok(total_time)
    }

    /// Close the recording window at time `now` and returns the total recording time.
    /// On error, the session is left unchanged.
    pub fn stop(&mut self, now: Time) -> Result<Time, MonitorError> {
        let total_time = self.check_stop(now)?;

        self.stop_time = Some(now);
        self.total_time = Some(total_time);
        self.state = RecordingState::Idle;
        Ok(total_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = RecordingSession::new();
        assert_eq!(session.state(), RecordingState::Idle);
        assert_eq!(session.start_time(), None);
        assert_eq!(session.last_start_time(), None);
        assert_eq!(session.stop_time(), None);
        assert_eq!(session.total_time(), None);
    }

    #[test]
    fn test_snapshot_windows() {
        let mut session = RecordingSession::new();

        session.start(100, false).unwrap();
        assert!(session.is_recording());
        assert_eq!(session.stop(600).unwrap(), 500);

        session.start(1000, false).unwrap();
        assert_eq!(session.start_time(), Some(1000));
        assert_eq!(session.stop(1200).unwrap(), 200);
        assert_eq!(session.stop_time(), Some(1200));
        assert_eq!(session.total_time(), Some(200));
    }

    #[test]
    fn test_persistent_windows() {
        let mut session = RecordingSession::new();

        session.start(0, true).unwrap();
        session.stop(500).unwrap();

        session.start(2000, true).unwrap();
        assert_eq!(session.start_time(), Some(0));
        assert_eq!(session.last_start_time(), Some(2000));
        assert_eq!(session.stop(2500).unwrap(), 1000);
        assert_eq!(session.total_time(), Some(1000));
    }

    #[test]
    fn test_zero_length_window() {
        let mut session = RecordingSession::new();
        session.start(42, false).unwrap();
        assert_eq!(session.stop(42).unwrap(), 0);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut session = RecordingSession::new();
        assert!(session.stop(10).is_err());

        session.start(10, false).unwrap();
        assert!(session.start(20, false).is_err());

        // Going back in time is rejected and the window stays open
        assert!(matches!(
            session.stop(5),
            Err(MonitorError::InconsistentTiming(_))
        ));
        assert!(session.is_recording());
        assert_eq!(session.total_time(), None);

        // Negative start times are inconsistent
        let mut session = RecordingSession::new();
        session.start(-3, false).unwrap();
        assert!(session.stop(10).is_err());
    }

    #[test]
    fn test_check_stop_leaves_session_open() {
        let mut session = RecordingSession::new();
        session.start(500, true).unwrap();

        assert!(session.check_stop(400).is_err());
        assert_eq!(session.check_stop(800).unwrap(), 300);
        assert!(session.is_recording());
        assert_eq!(session.stop_time(), None);
    }

    #[test]
    fn test_stop_overflow() {
        let mut session = RecordingSession::new();
        session.start(10, false).unwrap();

        assert!(matches!(
            session.stop(Time::MIN),
            Err(MonitorError::InconsistentTiming(_))
        ));
        assert!(session.is_recording());
        assert_eq!(session.stop(20).unwrap(), 10);
    }

    #[test]
    fn test_reset() {
        let mut session = RecordingSession::new();
        session.start(0, true).unwrap();
        session.stop(300).unwrap();
        session.reset();

        assert_eq!(session.total_time(), None);
        session.start(400, true).unwrap();
        assert_eq!(session.start_time(), Some(400));
        assert_eq!(session.stop(500).unwrap(), 100);
    }
}
