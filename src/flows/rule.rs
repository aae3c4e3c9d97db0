//! Rules: a typed event condition plus a state mutator.
//!
//! A [`Rule<E>`] only sees events of type `E`. Leaf phases store rules as
//! [`RuleEntry`] values, which erase the event type and carry the rule's
//! name and resolved exclusivity group.
//!
//! ## Exclusivity groups
//!
//! Rules sharing a group are mutually exclusive per event: once one of them
//! applies, later rules in the group are skipped even if they would accept.
//! The group is resolved when the entry is created, in precedence order:
//! explicit tag, then the condition's group, then the mutator's group.

use std::any::TypeId;

use super::condition::{ConditionResponse, GameEventCondition};
use super::events::GameEvent;
use crate::core::{EngineError, GameState};
use crate::engine::EvaluationContext;

/// Produces the successor state for an accepted event.
pub trait StateMutator<E: GameEvent>: Send + Sync {
    fn apply(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &E) -> Result<GameState, EngineError>;

    /// Exclusivity group this mutator places its rule in, if any.
    fn exclusivity_group(&self) -> Option<&str> {
        None
    }
}

/// Mutator backed by a closure. See [`mutator`].
pub struct MutatorFn<F>(F);

/// Wrap a closure as a [`StateMutator`].
pub fn mutator<E, F>(f: F) -> MutatorFn<F>
where
    E: GameEvent,
    F: Fn(&EvaluationContext<'_>, &GameState, &E) -> Result<GameState, EngineError> + Send + Sync,
{
    MutatorFn(f)
}

impl<E, F> StateMutator<E> for MutatorFn<F>
where
    E: GameEvent,
    F: Fn(&EvaluationContext<'_>, &GameState, &E) -> Result<GameState, EngineError> + Send + Sync,
{
    fn apply(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &E) -> Result<GameState, EngineError> {
        (self.0)(ctx, state, event)
    }
}

/// A typed rule.
pub struct Rule<E: GameEvent> {
    name: String,
    condition: Box<dyn GameEventCondition<E>>,
    mutator: Box<dyn StateMutator<E>>,
    group: Option<String>,
}

impl<E: GameEvent> Rule<E> {
    pub fn new(
        name: impl Into<String>,
        condition: impl GameEventCondition<E> + 'static,
        mutator: impl StateMutator<E> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            condition: Box::new(condition),
            mutator: Box::new(mutator),
            group: None,
        }
    }

    /// Tag the rule with an exclusivity group (overrides inherited groups).
    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective exclusivity group.
    #[must_use]
    pub fn exclusivity_group(&self) -> Option<&str> {
        self.group
            .as_deref()
            .or_else(|| self.condition.exclusivity_group())
            .or_else(|| self.mutator.exclusivity_group())
    }
}

/// Type-erased view of a [`Rule`].
trait ErasedRule: Send + Sync {
    fn event_type(&self) -> TypeId;

    fn event_kind(&self) -> &'static str;

    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &dyn GameEvent) -> ConditionResponse;

    fn apply(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &dyn GameEvent) -> Result<GameState, EngineError>;
}

impl<E: GameEvent> ErasedRule for Rule<E> {
    fn event_type(&self) -> TypeId {
        TypeId::of::<E>()
    }

    fn event_kind(&self) -> &'static str {
        std::any::type_name::<E>()
    }

    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        match event.downcast_ref::<E>() {
            Some(event) => self.condition.evaluate(ctx, state, event),
            None => ConditionResponse::not_applicable(format!("rule expects {}", self.event_kind())),
        }
    }

    fn apply(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &dyn GameEvent) -> Result<GameState, EngineError> {
        let event = event.downcast_ref::<E>().ok_or_else(|| {
            EngineError::Invariant(format!("rule '{}' applied to {}", self.name, event.kind()))
        })?;
        self.mutator.apply(ctx, state, event)
    }
}

/// A rule registered on a leaf phase.
pub struct RuleEntry {
    name: String,
    group: Option<String>,
    rule: Box<dyn ErasedRule>,
}

impl RuleEntry {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Check whether the rule handles this event's type.
    #[must_use]
    pub fn accepts(&self, event: &dyn GameEvent) -> bool {
        event.as_any().type_id() == self.rule.event_type()
    }

    pub fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &dyn GameEvent) -> ConditionResponse {
        self.rule.evaluate(ctx, state, event)
    }

    pub fn apply(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &dyn GameEvent) -> Result<GameState, EngineError> {
        self.rule.apply(ctx, state, event)
    }
}

impl<E: GameEvent> From<Rule<E>> for RuleEntry {
    fn from(rule: Rule<E>) -> Self {
        Self {
            name: rule.name.clone(),
            group: rule.exclusivity_group().map(str::to_owned),
            rule: Box::new(rule),
        }
    }
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEntry")
            .field("name", &self.name)
            .field("group", &self.group)
            .field("event", &self.rule.event_kind())
            .finish()
    }
}
