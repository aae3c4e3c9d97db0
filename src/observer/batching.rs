//! Batched observer dispatch.

use super::{EvaluationEvent, EvaluationObserver, RuleSkipReason, StateHash};
use crate::flows::ConditionResponse;

/// Decorator that buffers callbacks and forwards them in order.
///
/// The buffer is preallocated to `capacity` and drained into the inner
/// observer when a rule is applied, when an event is ignored, when the
/// buffer is full, and on [`flush`](EvaluationObserver::flush). Draining
/// never reorders.
#[derive(Debug)]
pub struct BatchingObserver<O: EvaluationObserver> {
    inner: O,
    buffer: Vec<EvaluationEvent>,
    capacity: usize,
    batches: usize,
}

impl<O: EvaluationObserver> BatchingObserver<O> {
    pub fn new(inner: O, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            buffer: Vec::with_capacity(capacity),
            capacity,
            batches: 0,
        }
    }

    /// Number of non-empty batches dispatched so far.
    #[must_use]
    pub fn batches(&self) -> usize {
        self.batches
    }

    /// Callbacks waiting in the buffer.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn inner(&self) -> &O {
        &self.inner
    }

    /// Drain the buffer and return the inner observer.
    pub fn into_inner(mut self) -> O {
        self.drain();
        self.inner
    }

    fn push(&mut self, event: EvaluationEvent, flush_now: bool) {
        self.buffer.push(event);
        if flush_now || self.buffer.len() >= self.capacity {
            self.drain();
        }
    }

    fn drain(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        for event in self.buffer.drain(..) {
            event.dispatch(&mut self.inner);
        }
        self.batches += 1;
    }
}

impl<O: EvaluationObserver> EvaluationObserver for BatchingObserver<O> {
    fn on_phase_enter(&mut self, phase: u32, label: &str) {
        self.push(
            EvaluationEvent::PhaseEnter {
                phase,
                label: label.to_owned(),
            },
            false,
        );
    }

    fn on_rule_evaluated(&mut self, phase: u32, rule: &str, response: &ConditionResponse) {
        self.push(
            EvaluationEvent::RuleEvaluated {
                phase,
                rule: rule.to_owned(),
                outcome: response.outcome,
                reason: response.reason.clone(),
            },
            false,
        );
    }

    fn on_rule_applied(&mut self, phase: u32, rule: &str) {
        self.push(
            EvaluationEvent::RuleApplied {
                phase,
                rule: rule.to_owned(),
            },
            true,
        );
    }

    fn on_rule_skipped(&mut self, phase: u32, rule: &str, reason: RuleSkipReason) {
        self.push(
            EvaluationEvent::RuleSkipped {
                phase,
                rule: rule.to_owned(),
                reason,
            },
            false,
        );
    }

    fn on_event_ignored(&mut self, event: &str, reason: &str) {
        self.push(
            EvaluationEvent::EventIgnored {
                event: event.to_owned(),
                reason: reason.to_owned(),
            },
            true,
        );
    }

    fn on_state_hashed(&mut self, sequence: u64, hash: StateHash) {
        self.push(EvaluationEvent::StateHashed { sequence, hash }, false);
    }

    fn flush(&mut self) {
        self.drain();
        self.inner.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::RecordingObserver;

    #[test]
    fn test_flush_points() {
        let mut batching = BatchingObserver::new(RecordingObserver::new(), 8);

        batching.on_phase_enter(1, "play");
        batching.on_rule_skipped(1, "roll", RuleSkipReason::EventKindFiltered);
        assert_eq!(batching.pending(), 2);
        assert!(batching.inner().events().is_empty());

        batching.on_rule_applied(1, "move");
        assert_eq!(batching.pending(), 0);
        assert_eq!(batching.inner().kinds(), vec!["PhaseEnter", "RuleSkipped", "RuleApplied"]);

        batching.on_state_hashed(1, StateHash::from_raw(7));
        batching.flush();
        assert_eq!(batching.batches(), 2);
        assert_eq!(batching.inner().flushes(), 1);
    }

    #[test]
    fn test_full_buffer_drains_in_order() {
        let mut batching = BatchingObserver::new(RecordingObserver::new(), 2);
        for phase in 1..=5 {
            batching.on_phase_enter(phase, "p");
        }
        assert_eq!(batching.pending(), 1);

        let recorder = batching.into_inner();
        let phases: Vec<u32> = recorder
            .events()
            .iter()
            .map(|e| match e {
                EvaluationEvent::PhaseEnter { phase, .. } => *phase,
                _ => 0,
            })
            .collect();
        assert_eq!(phases, vec![1, 2, 3, 4, 5]);
    }
}
