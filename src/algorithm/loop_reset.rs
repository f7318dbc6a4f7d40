//! Wraparound from the last section back to the first.
//!
//! `Idle → CommittingEnd → ResettingOffset → ReleasingGuard → Idle`. Scroll
//! input is refused in every phase except `Idle`.

use crate::models::config::LoopResetConfig;
use crate::session::timers::{TimerQueue, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopResetPhase {
    #[default]
    Idle,
    /// Terminal pose is shown; the offset has not moved yet.
    CommittingEnd,
    /// Offset is back at 0; input still refused while scroll events settle.
    ResettingOffset,
    /// Passed through within the same step that leaves `ResettingOffset`;
    /// never observable from outside.
    ReleasingGuard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopResetStep {
    ResetOffset,
    ReleaseGuard,
}

#[derive(Debug, Clone)]
pub struct LoopReset {
    phase: LoopResetPhase,
    commit_delay_ms: u64,
    release_delay_ms: u64,
    pending: Option<TimerToken>,
}

impl LoopReset {
    pub fn new(config: &LoopResetConfig) -> Self {
        Self {
            phase: LoopResetPhase::Idle,
            commit_delay_ms: config.commit_delay_ms,
            release_delay_ms: config.release_delay_ms,
            pending: None,
        }
    }

    pub fn phase(&self) -> LoopResetPhase {
        self.phase
    }

    pub fn is_guarding(&self) -> bool {
        self.phase != LoopResetPhase::Idle
    }

    /// `Idle → CommittingEnd`. Returns false when a reset is already running.
    pub fn begin<T: From<LoopResetStep>>(&mut self, timers: &mut TimerQueue<T>, now_ms: u64) -> bool {
        if self.phase != LoopResetPhase::Idle {
            return false;
        }
        self.phase = LoopResetPhase::CommittingEnd;
        self.pending = Some(timers.schedule(
            now_ms.saturating_add(self.commit_delay_ms),
            T::from(LoopResetStep::ResetOffset),
        ));
        log::info!("loop_reset: Idle -> CommittingEnd");
        true
    }

    /// Applies a fired timer. Returns the step the owner must carry out, or
    /// `None` for a stale token or a step that does not fit the current phase.
    pub fn advance<T: From<LoopResetStep>>(
        &mut self,
        timers: &mut TimerQueue<T>,
        now_ms: u64,
        token: TimerToken,
        step: LoopResetStep,
    ) -> Option<LoopResetStep> {
        if self.pending != Some(token) {
            return None;
        }
        self.pending = None;

        match (self.phase, step) {
            (LoopResetPhase::CommittingEnd, LoopResetStep::ResetOffset) => {
                self.phase = LoopResetPhase::ResettingOffset;
                self.pending = Some(timers.schedule(
                    now_ms.saturating_add(self.release_delay_ms),
                    T::from(LoopResetStep::ReleaseGuard),
                ));
                log::info!("loop_reset: CommittingEnd -> ResettingOffset");
                Some(step)
            }
            (LoopResetPhase::ResettingOffset, LoopResetStep::ReleaseGuard) => {
                self.phase = LoopResetPhase::ReleasingGuard;
                log::info!("loop_reset: ResettingOffset -> ReleasingGuard -> Idle");
                self.phase = LoopResetPhase::Idle;
                Some(step)
            }
            (phase, step) => {
                log::warn!("loop_reset: ignoring {step:?} in phase {phase:?}");
                None
            }
        }
    }

    pub fn abort<T>(&mut self, timers: &mut TimerQueue<T>) {
        if let Some(token) = self.pending.take() {
            timers.cancel(token);
        }
        if self.phase != LoopResetPhase::Idle {
            log::info!("loop_reset: aborted in phase {:?}", self.phase);
        }
        self.phase = LoopResetPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_every_phase_with_configured_delays() {
        let mut timers: TimerQueue<LoopResetStep> = TimerQueue::new();
        let mut reset = LoopReset::new(&LoopResetConfig::default());

        assert!(reset.begin(&mut timers, 1_000));
        assert_eq!(reset.phase(), LoopResetPhase::CommittingEnd);
        assert!(reset.is_guarding());
        assert!(!reset.begin(&mut timers, 1_010));

        assert!(timers.pop_due(1_099).is_empty());
        let (token, step) = timers.pop_due(1_100)[0];
        assert_eq!(
            reset.advance(&mut timers, 1_100, token, step),
            Some(LoopResetStep::ResetOffset)
        );
        assert_eq!(reset.phase(), LoopResetPhase::ResettingOffset);
        assert!(reset.is_guarding());

        assert!(timers.pop_due(1_149).is_empty());
        let (token, step) = timers.pop_due(1_150)[0];
        assert_eq!(
            reset.advance(&mut timers, 1_150, token, step),
            Some(LoopResetStep::ReleaseGuard)
        );
        assert_eq!(reset.phase(), LoopResetPhase::Idle);
        assert!(!reset.is_guarding());
        assert!(timers.is_empty());
    }

    #[test]
    fn abort_leaves_no_pending_timer() {
        let mut timers: TimerQueue<LoopResetStep> = TimerQueue::new();
        let mut reset = LoopReset::new(&LoopResetConfig::default());
        reset.begin(&mut timers, 0);
        reset.abort(&mut timers);
        assert!(timers.is_empty());
        assert_eq!(reset.phase(), LoopResetPhase::Idle);
    }

    #[test]
    fn stale_token_is_ignored() {
        let mut timers: TimerQueue<LoopResetStep> = TimerQueue::new();
        let mut reset = LoopReset::new(&LoopResetConfig::default());
        reset.begin(&mut timers, 0);
        let (token, step) = timers.pop_due(100)[0];
        reset.abort(&mut timers);
        assert_eq!(reset.advance(&mut timers, 100, token, step), None);
        assert_eq!(reset.phase(), LoopResetPhase::Idle);
    }
}
