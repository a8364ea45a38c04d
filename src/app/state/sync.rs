//! Debounced buffer-to-store synchronization state machine.
//!
//! The controller never reads the clock itself: every transition takes an
//! explicit `Instant`, so the event loop drives it with wall time and tests
//! drive it with fabricated instants.

use std::time::{Duration, Instant};

/// Save lifecycle of the buffer relative to the remote store.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SaveState {
    Clean,
    PendingDebounce,
    Saving,
    Error,
}

/// Upsert request produced when a debounce or retry deadline fires.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SaveRequest {
    pub code: String,
}

/// Consecutive failed writes tolerated before the error state becomes
/// terminal until the next mutation.
pub const MAX_SAVE_ATTEMPTS: u32 = 3;

/// Owns the buffer text, its saved baseline, and the debounce scheduling.
#[derive(Debug, Clone)]
pub struct SyncController {
    text: String,
    baseline: String,
    dirty: bool,
    state: SaveState,
    deadline: Option<Instant>,
    in_flight: Option<String>,
    failures: u32,
    debounce: Duration,
    edited: bool,
}

impl SyncController {
    /// Starts clean on `initial_text`, which is also the baseline until the
    /// initial fetch resolves or the user edits.
    pub fn new(initial_text: impl Into<String>, debounce: Duration) -> Self {
        let text = initial_text.into();
        Self {
            baseline: text.clone(),
            text,
            dirty: false,
            state: SaveState::Clean,
            deadline: None,
            in_flight: None,
            failures: 0,
            debounce,
            edited: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn save_state(&self) -> SaveState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Accepts a full-buffer replacement from the editor and (re)arms the
    /// debounce deadline. A mutation during an in-flight write is captured by
    /// the next cycle once that write settles.
    pub fn record_mutation(&mut self, text: impl Into<String>, now: Instant) {
        self.text = text.into();
        self.edited = true;
        self.dirty = true;

        if self.state != SaveState::Saving {
            self.state = SaveState::PendingDebounce;
            self.failures = 0;
            self.deadline = Some(now + self.debounce);
        }
    }

    /// Fires at most one save request when the armed deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<SaveRequest> {
        if !self.deadline.is_some_and(|deadline| deadline <= now) {
            return None;
        }

        match self.state {
            SaveState::PendingDebounce | SaveState::Error => {
                self.state = SaveState::Saving;
                self.deadline = None;
                self.in_flight = Some(self.text.clone());
                Some(SaveRequest {
                    code: self.text.clone(),
                })
            }
            _ => None,
        }
    }

    /// Records the in-flight text as the new baseline. If the buffer diverged
    /// while the write was in flight, a fresh debounce cycle is armed.
    pub fn save_succeeded(&mut self, now: Instant) {
        let Some(saved) = self.in_flight.take() else {
            return;
        };

        self.baseline = saved;
        self.failures = 0;

        if self.text == self.baseline {
            self.dirty = false;
            self.state = SaveState::Clean;
            self.deadline = None;
        } else {
            self.dirty = true;
            self.state = SaveState::PendingDebounce;
            self.deadline = Some(now + self.debounce);
        }
    }

    /// Enters the error state. Retries are armed with doubling backoff until
    /// `MAX_SAVE_ATTEMPTS` consecutive failures; after that only a new
    /// mutation restarts the cycle.
    pub fn save_failed(&mut self, now: Instant) {
        self.in_flight = None;
        self.dirty = true;
        self.state = SaveState::Error;
        self.failures += 1;

        if self.failures < MAX_SAVE_ATTEMPTS {
            let backoff = self.debounce * 2u32.saturating_pow(self.failures - 1);
            self.deadline = Some(now + backoff);
        } else {
            self.deadline = None;
        }
    }

    /// Adopts the initially fetched record as buffer and baseline. A fetch
    /// resolving after the user already started typing is discarded so a slow
    /// read cannot clobber fast typing; returns false in that case.
    pub fn adopt_remote(&mut self, code: impl Into<String>) -> bool {
        if self.edited {
            return false;
        }

        let code = code.into();
        self.text = code.clone();
        self.baseline = code;
        self.dirty = false;
        self.state = SaveState::Clean;
        self.deadline = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_SAVE_ATTEMPTS, SaveState, SyncController};
    use std::time::{Duration, Instant};

    const DEBOUNCE: Duration = Duration::from_millis(1000);

    fn controller() -> (SyncController, Instant) {
        (SyncController::new("base", DEBOUNCE), Instant::now())
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn burst_of_edits_yields_one_save_with_final_text() {
        let (mut sync, t0) = controller();

        sync.record_mutation("a", t0);
        sync.record_mutation("ab", t0 + ms(200));
        sync.record_mutation("abc", t0 + ms(400));

        // The deadline tracks the last edit, so polling before it fires nothing.
        assert!(sync.poll(t0 + ms(1000)).is_none());
        assert_eq!(sync.save_state(), SaveState::PendingDebounce);

        let request = sync.poll(t0 + ms(1400)).expect("debounce deadline fired");
        assert_eq!(request.code, "abc");
        assert_eq!(sync.save_state(), SaveState::Saving);

        assert!(sync.poll(t0 + ms(5000)).is_none());
    }

    #[test]
    fn successful_save_returns_to_clean() {
        let (mut sync, t0) = controller();

        sync.record_mutation("abc", t0);
        sync.poll(t0 + ms(1000)).expect("save fired");
        sync.save_succeeded(t0 + ms(1100));

        assert_eq!(sync.save_state(), SaveState::Clean);
        assert!(!sync.is_dirty());
        assert!(sync.poll(t0 + ms(9000)).is_none());
    }

    #[test]
    fn mutation_during_saving_is_captured_by_next_cycle() {
        let (mut sync, t0) = controller();

        sync.record_mutation("abc", t0);
        sync.poll(t0 + ms(1000)).expect("first save fired");

        sync.record_mutation("abcd", t0 + ms(1050));
        assert_eq!(sync.save_state(), SaveState::Saving);
        assert!(sync.poll(t0 + ms(1100)).is_none());

        sync.save_succeeded(t0 + ms(1200));
        assert_eq!(sync.save_state(), SaveState::PendingDebounce);
        assert!(sync.is_dirty());

        let request = sync.poll(t0 + ms(2200)).expect("second save fired");
        assert_eq!(request.code, "abcd");
    }

    #[test]
    fn failed_save_keeps_dirty_and_enters_error() {
        let (mut sync, t0) = controller();

        sync.record_mutation("abc", t0);
        sync.poll(t0 + ms(1000)).expect("save fired");
        sync.save_failed(t0 + ms(1100));

        assert_eq!(sync.save_state(), SaveState::Error);
        assert!(sync.is_dirty());
    }

    #[test]
    fn error_state_retries_with_backoff_then_goes_terminal() {
        let (mut sync, t0) = controller();
        sync.record_mutation("abc", t0);

        let mut at = t0 + ms(1000);
        for attempt in 0..MAX_SAVE_ATTEMPTS {
            let request = sync.poll(at).unwrap_or_else(|| {
                panic!("attempt {attempt} should fire");
            });
            assert_eq!(request.code, "abc");
            at += ms(10);
            sync.save_failed(at);
            // Backoff doubles per failure; jump past the widest window.
            at += ms(8000);
        }

        assert_eq!(sync.save_state(), SaveState::Error);
        assert!(sync.poll(at + ms(60_000)).is_none());
    }

    #[test]
    fn mutation_heals_error_state() {
        let (mut sync, t0) = controller();

        sync.record_mutation("abc", t0);
        sync.poll(t0 + ms(1000)).expect("save fired");
        sync.save_failed(t0 + ms(1100));

        sync.record_mutation("abcd", t0 + ms(2000));
        assert_eq!(sync.save_state(), SaveState::PendingDebounce);

        let request = sync.poll(t0 + ms(3000)).expect("save after healing");
        assert_eq!(request.code, "abcd");
    }

    #[test]
    fn retry_carries_latest_buffer_text() {
        let (mut sync, t0) = controller();

        sync.record_mutation("abc", t0);
        sync.poll(t0 + ms(1000)).expect("save fired");
        sync.record_mutation("abcdef", t0 + ms(1050));
        sync.save_failed(t0 + ms(1100));

        let request = sync.poll(t0 + ms(2200)).expect("retry fired");
        assert_eq!(request.code, "abcdef");
    }

    #[test]
    fn late_fetch_is_discarded_after_local_edit() {
        let (mut sync, t0) = controller();

        sync.record_mutation("typed", t0);
        assert!(!sync.adopt_remote("remote value"));
        assert_eq!(sync.text(), "typed");
        assert!(sync.is_dirty());
    }

    #[test]
    fn fetch_adopts_when_no_edit_happened() {
        let (mut sync, _) = controller();

        assert!(sync.adopt_remote("remote value"));
        assert_eq!(sync.text(), "remote value");
        assert_eq!(sync.save_state(), SaveState::Clean);
        assert!(!sync.is_dirty());
    }

    #[test]
    fn adopted_default_does_not_trigger_a_save() {
        let (mut sync, t0) = controller();

        sync.adopt_remote("default snippet");
        assert!(sync.poll(t0 + ms(60_000)).is_none());

        sync.record_mutation("default snippet edited", t0 + ms(60_000));
        assert!(sync.poll(t0 + ms(61_000)).is_some());
    }
}
