//! Pass scheduling.
//!
//! An explicit state machine replaces the classic `setInterval`-with-manual-
//! clear loop: `Idle -> Polling -> Settled`, with the single trailing pass
//! after document completion a visible transition rather than a timer side
//! effect. The machine itself is runtime-free; the async driver lives on
//! [`crate::SvgFallback::activate`].

use std::time::Duration;
use svgkit_common::BackoffConfig;
use svgkit_dom::DocumentReadyState;

use crate::config::FallbackConfig;

/// Scheduler lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not started.
    Idle,
    /// Repeating passes until the document completes.
    Polling,
    /// No further passes will ever be scheduled.
    Settled,
}

/// What the driver should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Run a pass now, then ask again after the delay.
    Pass { next_in: Duration },
    /// Run a pass now and one trailing pass after the delay, then stop.
    FinalPass { after: Duration },
    /// Nothing left to do.
    Done,
}

/// Drives repeated fallback passes until the document settles.
#[derive(Debug)]
pub struct FallbackScheduler {
    state: SchedulerState,
    passes: u32,
    backoff: BackoffConfig,
    settle_delay: Duration,
}

impl FallbackScheduler {
    pub fn new(config: &FallbackConfig) -> Self {
        Self {
            state: SchedulerState::Idle,
            passes: 0,
            backoff: config.backoff.clone(),
            settle_delay: config.settle_delay,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Number of regular passes issued so far (the trailing pass not
    /// included).
    pub fn passes(&self) -> u32 {
        self.passes
    }

    /// Start the scheduler. Returns whether polling actually began: a host
    /// with native SVG support settles immediately and stays inert. Calling
    /// `begin` on an already-started scheduler is a no-op.
    pub fn begin(&mut self, svg_supported: bool) -> bool {
        if self.state != SchedulerState::Idle {
            return false;
        }
        if svg_supported {
            self.state = SchedulerState::Settled;
            return false;
        }
        self.state = SchedulerState::Polling;
        true
    }

    /// Advance the machine given the document's current ready state.
    ///
    /// The first `Complete` observation yields the final-pass transition and
    /// settles the scheduler; afterwards only [`Step::Done`] is returned.
    pub fn next(&mut self, ready_state: DocumentReadyState) -> Step {
        match self.state {
            SchedulerState::Polling => {
                self.passes += 1;
                if ready_state.is_complete() {
                    self.state = SchedulerState::Settled;
                    Step::FinalPass {
                        after: self.settle_delay,
                    }
                } else {
                    Step::Pass {
                        next_in: self.backoff.delay_after_pass(self.passes),
                    }
                }
            }
            SchedulerState::Idle | SchedulerState::Settled => Step::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> FallbackScheduler {
        FallbackScheduler::new(&FallbackConfig::default())
    }

    #[test]
    fn test_supported_host_settles_immediately() {
        let mut s = scheduler();
        assert!(!s.begin(true));
        assert_eq!(s.state(), SchedulerState::Settled);
        assert_eq!(s.next(DocumentReadyState::Loading), Step::Done);
        assert_eq!(s.passes(), 0);
    }

    #[test]
    fn test_polls_until_complete_then_settles() {
        let mut s = scheduler();
        assert!(s.begin(false));
        assert_eq!(s.state(), SchedulerState::Polling);

        assert!(matches!(
            s.next(DocumentReadyState::Loading),
            Step::Pass { .. }
        ));
        assert!(matches!(
            s.next(DocumentReadyState::Interactive),
            Step::Pass { .. }
        ));
        assert!(matches!(
            s.next(DocumentReadyState::Complete),
            Step::FinalPass { .. }
        ));

        assert_eq!(s.state(), SchedulerState::Settled);
        assert_eq!(s.next(DocumentReadyState::Complete), Step::Done);
        assert_eq!(s.passes(), 3);
    }

    #[test]
    fn test_already_complete_document_gets_one_pass_plus_trailing() {
        let mut s = scheduler();
        assert!(s.begin(false));

        // Degenerate case: document was complete before the scheduler began.
        assert!(matches!(
            s.next(DocumentReadyState::Complete),
            Step::FinalPass { .. }
        ));
        assert_eq!(s.next(DocumentReadyState::Complete), Step::Done);
        assert_eq!(s.passes(), 1);
    }

    #[test]
    fn test_backoff_delays_grow() {
        let mut s = scheduler();
        s.begin(false);

        let Step::Pass { next_in: first } = s.next(DocumentReadyState::Loading) else {
            panic!("expected pass");
        };
        let Step::Pass { next_in: second } = s.next(DocumentReadyState::Loading) else {
            panic!("expected pass");
        };
        assert!(second > first);
    }

    #[test]
    fn test_next_before_begin_is_done() {
        let mut s = scheduler();
        assert_eq!(s.next(DocumentReadyState::Loading), Step::Done);
    }

    #[test]
    fn test_begin_twice_is_a_no_op() {
        let mut s = scheduler();
        assert!(s.begin(false));
        assert!(!s.begin(false));
        assert_eq!(s.state(), SchedulerState::Polling);
    }
}
