//! Evaluation observers.
//!
//! Observers watch the engine evaluate an event: phases entered, rules
//! evaluated, applied or skipped, events ignored, and resulting state
//! fingerprints. They are read-only with respect to game state, and for
//! identical inputs the engine calls them in an identical order.
//!
//! [`BatchingObserver`] buffers callbacks and dispatches them in batches
//! without changing their relative order.

mod batching;
mod hash;

pub use batching::BatchingObserver;
pub use hash::StateHash;

use serde::{Deserialize, Serialize};

use crate::flows::{ConditionOutcome, ConditionResponse};

/// Why a rule was not evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleSkipReason {
    /// The rule handles a different event type.
    EventKindFiltered,
    /// Another rule in the same exclusivity group already applied.
    ExclusivityMasked,
}

/// Evaluation callbacks. Every method defaults to a no-op.
#[allow(unused_variables)]
pub trait EvaluationObserver {
    fn on_phase_enter(&mut self, phase: u32, label: &str) {}

    fn on_rule_evaluated(&mut self, phase: u32, rule: &str, response: &ConditionResponse) {}

    fn on_rule_applied(&mut self, phase: u32, rule: &str) {}

    fn on_rule_skipped(&mut self, phase: u32, rule: &str, reason: RuleSkipReason) {}

    fn on_event_ignored(&mut self, event: &str, reason: &str) {}

    fn on_state_hashed(&mut self, sequence: u64, hash: StateHash) {}

    /// Called once at the end of every handled event.
    fn flush(&mut self) {}
}

impl<O: EvaluationObserver + ?Sized> EvaluationObserver for &mut O {
    fn on_phase_enter(&mut self, phase: u32, label: &str) {
        (**self).on_phase_enter(phase, label);
    }

    fn on_rule_evaluated(&mut self, phase: u32, rule: &str, response: &ConditionResponse) {
        (**self).on_rule_evaluated(phase, rule, response);
    }

    fn on_rule_applied(&mut self, phase: u32, rule: &str) {
        (**self).on_rule_applied(phase, rule);
    }

    fn on_rule_skipped(&mut self, phase: u32, rule: &str, reason: RuleSkipReason) {
        (**self).on_rule_skipped(phase, rule, reason);
    }

    fn on_event_ignored(&mut self, event: &str, reason: &str) {
        (**self).on_event_ignored(event, reason);
    }

    fn on_state_hashed(&mut self, sequence: u64, hash: StateHash) {
        (**self).on_state_hashed(sequence, hash);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl EvaluationObserver for NoopObserver {}

/// Owned record of one observer callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationEvent {
    PhaseEnter {
        phase: u32,
        label: String,
    },
    RuleEvaluated {
        phase: u32,
        rule: String,
        outcome: ConditionOutcome,
        reason: Option<String>,
    },
    RuleApplied {
        phase: u32,
        rule: String,
    },
    RuleSkipped {
        phase: u32,
        rule: String,
        reason: RuleSkipReason,
    },
    EventIgnored {
        event: String,
        reason: String,
    },
    StateHashed {
        sequence: u64,
        hash: StateHash,
    },
}

impl EvaluationEvent {
    /// Callback name, for comparing traces by shape.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PhaseEnter { .. } => "PhaseEnter",
            Self::RuleEvaluated { .. } => "RuleEvaluated",
            Self::RuleApplied { .. } => "RuleApplied",
            Self::RuleSkipped { .. } => "RuleSkipped",
            Self::EventIgnored { .. } => "EventIgnored",
            Self::StateHashed { .. } => "StateHashed",
        }
    }

    /// Replay this record onto an observer.
    pub fn dispatch(&self, observer: &mut dyn EvaluationObserver) {
        match self {
            Self::PhaseEnter { phase, label } => observer.on_phase_enter(*phase, label),
            Self::RuleEvaluated {
                phase,
                rule,
                outcome,
                reason,
            } => observer.on_rule_evaluated(
                *phase,
                rule,
                &ConditionResponse {
                    outcome: *outcome,
                    reason: reason.clone(),
                },
            ),
            Self::RuleApplied { phase, rule } => observer.on_rule_applied(*phase, rule),
            Self::RuleSkipped { phase, rule, reason } => observer.on_rule_skipped(*phase, rule, *reason),
            Self::EventIgnored { event, reason } => observer.on_event_ignored(event, reason),
            Self::StateHashed { sequence, hash } => observer.on_state_hashed(*sequence, *hash),
        }
    }
}

/// Observer that keeps every callback as an [`EvaluationEvent`].
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Vec<EvaluationEvent>,
    flushes: usize,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[EvaluationEvent] {
        &self.events
    }

    /// Callback names in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(EvaluationEvent::kind).collect()
    }

    /// Number of `flush` calls received.
    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.flushes = 0;
    }

    fn record(&mut self, event: EvaluationEvent) {
        self.events.push(event);
    }
}

impl EvaluationObserver for RecordingObserver {
    fn on_phase_enter(&mut self, phase: u32, label: &str) {
        self.record(EvaluationEvent::PhaseEnter {
            phase,
            label: label.to_owned(),
        });
    }

    fn on_rule_evaluated(&mut self, phase: u32, rule: &str, response: &ConditionResponse) {
        self.record(EvaluationEvent::RuleEvaluated {
            phase,
            rule: rule.to_owned(),
            outcome: response.outcome,
            reason: response.reason.clone(),
        });
    }

    fn on_rule_applied(&mut self, phase: u32, rule: &str) {
        self.record(EvaluationEvent::RuleApplied {
            phase,
            rule: rule.to_owned(),
        });
    }

    fn on_rule_skipped(&mut self, phase: u32, rule: &str, reason: RuleSkipReason) {
        self.record(EvaluationEvent::RuleSkipped {
            phase,
            rule: rule.to_owned(),
            reason,
        });
    }

    fn on_event_ignored(&mut self, event: &str, reason: &str) {
        self.record(EvaluationEvent::EventIgnored {
            event: event.to_owned(),
            reason: reason.to_owned(),
        });
    }

    fn on_state_hashed(&mut self, sequence: u64, hash: StateHash) {
        self.record(EvaluationEvent::StateHashed { sequence, hash });
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }
}
