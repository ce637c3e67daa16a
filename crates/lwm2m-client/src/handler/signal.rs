//! One-shot completion signal of a bootstrap session.

use crate::error::WaitError;
use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalState {
    Pending,
    Finished,
    Interrupted,
}

/// Condition variable pair recreated for every session. Only the first
/// transition out of `Pending` counts.
pub(crate) struct CompletionSignal {
    state: Mutex<SignalState>,
    condvar: Condvar,
}

impl CompletionSignal {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SignalState::Pending),
            condvar: Condvar::new(),
        }
    }

    pub(crate) fn finish(&self) {
        self.settle(SignalState::Finished);
    }

    pub(crate) fn interrupt(&self) {
        self.settle(SignalState::Interrupted);
    }

    fn settle(&self, outcome: SignalState) {
        let mut state = self.state.lock();
        if *state == SignalState::Pending {
            *state = outcome;
            self.condvar.notify_all();
        }
    }

    /// `Ok(true)` once finished, `Ok(false)` when `timeout` elapses first.
    /// A timeout too large for the clock waits without a deadline.
    pub(crate) fn wait(&self, timeout: Duration) -> Result<bool, WaitError> {
        let deadline = Instant::now().checked_add(timeout);
        let mut state = self.state.lock();
        while *state == SignalState::Pending {
            match deadline {
                Some(deadline) => {
                    if self.condvar.wait_until(&mut state, deadline).timed_out() {
                        break;
                    }
                }
                None => self.condvar.wait(&mut state),
            }
        }
        match *state {
            SignalState::Finished => Ok(true),
            SignalState::Interrupted => Err(WaitError::Interrupted),
            SignalState::Pending => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_unbounded_timeout_waits_for_settlement() {
        let signal = Arc::new(CompletionSignal::new());
        let waiter = {
            let signal = signal.clone();
            thread::spawn(move || signal.wait(Duration::MAX))
        };
        thread::sleep(Duration::from_millis(50));
        signal.interrupt();
        assert_eq!(waiter.join().unwrap(), Err(WaitError::Interrupted));
    }

    #[test]
    fn test_only_first_settlement_counts() {
        let signal = CompletionSignal::new();
        signal.finish();
        signal.interrupt();
        assert_eq!(signal.wait(Duration::from_secs(u64::MAX)), Ok(true));
    }
}
