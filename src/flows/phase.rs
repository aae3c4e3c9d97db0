//! The phase tree.
//!
//! Every [`GamePhase`] has a positive number, a gating condition, and either
//! rules (leaf) or child phases (composite). Nothing is ever "exited": the
//! active phase is found afresh from the roots on every event.
//!
//! ## Activation
//!
//! - a leaf is active iff its condition is `Valid`
//! - a composite first checks its own condition, then activates the first
//!   child (declaration order) that is active; later children are never
//!   evaluated

use super::condition::{ConditionResponse, GameStateCondition};
use super::events::GameEvent;
use super::preprocess::{EventPreProcessor, PreProcessOutcome};
use super::rule::RuleEntry;
use crate::core::{BuildError, GameState};
use crate::engine::EvaluationContext;

enum PhaseBody {
    Leaf {
        rules: Vec<RuleEntry>,
        preprocessors: Vec<Box<dyn EventPreProcessor>>,
    },
    Composite {
        children: Vec<GamePhase>,
    },
}

/// A node of the phase tree.
pub struct GamePhase {
    number: u32,
    label: String,
    condition: Box<dyn GameStateCondition>,
    body: PhaseBody,
}

impl GamePhase {
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.body, PhaseBody::Leaf { .. })
    }

    /// Rules of a leaf phase (empty for composites).
    #[must_use]
    pub fn rules(&self) -> &[RuleEntry] {
        match &self.body {
            PhaseBody::Leaf { rules, .. } => rules,
            PhaseBody::Composite { .. } => &[],
        }
    }

    /// Child phases of a composite (empty for leaves).
    #[must_use]
    pub fn children(&self) -> &[GamePhase] {
        match &self.body {
            PhaseBody::Leaf { .. } => &[],
            PhaseBody::Composite { children } => children,
        }
    }

    pub fn evaluate_condition(&self, ctx: &EvaluationContext<'_>, state: &GameState) -> ConditionResponse {
        self.condition.evaluate(ctx, state)
    }

    /// The active leaf under this phase, if any.
    pub fn active_phase(&self, ctx: &EvaluationContext<'_>, state: &GameState) -> Option<&GamePhase> {
        let mut path = Vec::new();
        if self.activate(ctx, state, &mut path) {
            path.pop()
        } else {
            None
        }
    }

    /// Push the chain of active phases (this one down to the leaf) onto
    /// `path`. Returns `false`, leaving `path` as it was, if none is active.
    pub fn activate<'p>(&'p self, ctx: &EvaluationContext<'_>, state: &GameState, path: &mut Vec<&'p GamePhase>) -> bool {
        if !self.condition.evaluate(ctx, state).is_valid() {
            return false;
        }
        path.push(self);

        let active = match &self.body {
            PhaseBody::Leaf { .. } => true,
            PhaseBody::Composite { children } => children.iter().any(|child| child.activate(ctx, state, path)),
        };
        if !active {
            path.pop();
        }
        active
    }

    /// Run this leaf's pre-processors; the first one that expands wins.
    pub fn preprocess(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &dyn GameEvent) -> PreProcessOutcome {
        let PhaseBody::Leaf { preprocessors, .. } = &self.body else {
            return PreProcessOutcome::PassThrough;
        };
        for preprocessor in preprocessors {
            let outcome = preprocessor.process(ctx, state, event);
            if !matches!(outcome, PreProcessOutcome::PassThrough) {
                return outcome;
            }
        }
        PreProcessOutcome::PassThrough
    }
}

impl std::fmt::Debug for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GamePhase")
            .field("number", &self.number)
            .field("label", &self.label)
            .field("rules", &self.rules())
            .field("children", &self.children())
            .finish()
    }
}

/// Builder for [`GamePhase`].
///
/// ```
/// use rust_boards::flows::{AlwaysCondition, EndTurnEvent, NextPlayerMutator, PhaseBuilder, Rule};
///
/// let phase = PhaseBuilder::new(1, "play")
///     .with_condition(AlwaysCondition)
///     .with_rule(Rule::<EndTurnEvent>::new("end turn", AlwaysCondition, NextPlayerMutator::new()))
///     .build()
///     .unwrap();
/// assert!(phase.is_leaf());
///
/// let err = PhaseBuilder::new(2, "broken").build().unwrap_err();
/// assert_eq!(err.to_string(), "phase 2 has no condition");
/// ```
pub struct PhaseBuilder {
    number: u32,
    label: String,
    condition: Option<Box<dyn GameStateCondition>>,
    rules: Vec<RuleEntry>,
    preprocessors: Vec<Box<dyn EventPreProcessor>>,
    children: Vec<PhaseBuilder>,
}

impl PhaseBuilder {
    pub fn new(number: u32, label: impl Into<String>) -> Self {
        Self {
            number,
            label: label.into(),
            condition: None,
            rules: Vec::new(),
            preprocessors: Vec::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_condition(mut self, condition: impl GameStateCondition + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<RuleEntry>) -> Self {
        self.rules.push(rule.into());
        self
    }

    #[must_use]
    pub fn with_preprocessor(mut self, preprocessor: impl EventPreProcessor + 'static) -> Self {
        self.preprocessors.push(Box::new(preprocessor));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: PhaseBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn build(self) -> Result<GamePhase, BuildError> {
        if self.number == 0 {
            return Err(BuildError::InvalidPhaseNumber { label: self.label });
        }
        let Some(condition) = self.condition else {
            return Err(BuildError::MissingCondition { number: self.number });
        };

        let is_leaf = !self.rules.is_empty() || !self.preprocessors.is_empty();
        let body = match (is_leaf, self.children.is_empty()) {
            (true, false) => return Err(BuildError::AmbiguousPhase { number: self.number }),
            (false, true) => return Err(BuildError::MissingRule { number: self.number }),
            (true, true) if self.rules.is_empty() => {
                return Err(BuildError::MissingRule { number: self.number })
            }
            (true, true) => PhaseBody::Leaf {
                rules: self.rules,
                preprocessors: self.preprocessors,
            },
            (false, false) => PhaseBody::Composite {
                children: self
                    .children
                    .into_iter()
                    .map(PhaseBuilder::build)
                    .collect::<Result<_, _>>()?,
            },
        };

        Ok(GamePhase {
            number: self.number,
            label: self.label,
            condition,
            body,
        })
    }
}
