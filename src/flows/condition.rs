//! Conditions over game state.
//!
//! A condition is a pure function of `(context, state)` returning a
//! [`ConditionResponse`]. Rejections are values, never errors.
//!
//! ## Composition
//!
//! [`Composite`] combines children under `All` (first non-valid response
//! short-circuits) or `Any` (first valid response short-circuits). One
//! composite level uses a single mode; mixing them is a build error, so
//! mixed logic has to nest composites explicitly.

use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use crate::core::{BuildError, GameState};
use crate::engine::EvaluationContext;

/// Outcome of a condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionOutcome {
    /// Applies and accepts.
    Valid,
    /// Applies but rejects.
    Invalid,
    /// Does not apply; not a rejection.
    Ignore,
    /// Does not apply to this kind of input.
    NotApplicable,
}

/// Condition outcome with an optional human-readable reason.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResponse {
    pub outcome: ConditionOutcome,
    pub reason: Option<String>,
}

impl ConditionResponse {
    #[must_use]
    pub fn valid() -> Self {
        Self {
            outcome: ConditionOutcome::Valid,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            outcome: ConditionOutcome::Invalid,
            reason: Some(reason.into()),
        }
    }

    pub fn ignore(reason: impl Into<String>) -> Self {
        Self {
            outcome: ConditionOutcome::Ignore,
            reason: Some(reason.into()),
        }
    }

    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Self {
            outcome: ConditionOutcome::NotApplicable,
            reason: Some(reason.into()),
        }
    }

    /// Attach or replace the reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.outcome == ConditionOutcome::Valid
    }

    /// `Valid` when `ok`, otherwise `Invalid` with `reason`.
    pub fn check(ok: bool, reason: impl FnOnce() -> String) -> Self {
        if ok {
            Self::valid()
        } else {
            Self::invalid(reason())
        }
    }
}

/// Condition over a game state (phase gates, rule preconditions).
pub trait GameStateCondition: Send + Sync {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState) -> ConditionResponse;

    /// Exclusivity group this condition places its rule in, if any.
    fn exclusivity_group(&self) -> Option<&str> {
        None
    }
}

/// Condition over a game state and a typed event.
pub trait GameEventCondition<E: GameEvent>: Send + Sync {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &E) -> ConditionResponse;

    /// Exclusivity group this condition places its rule in, if any.
    fn exclusivity_group(&self) -> Option<&str> {
        None
    }
}

impl GameStateCondition for Box<dyn GameStateCondition> {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState) -> ConditionResponse {
        (**self).evaluate(ctx, state)
    }

    fn exclusivity_group(&self) -> Option<&str> {
        (**self).exclusivity_group()
    }
}

impl<E: GameEvent> GameEventCondition<E> for Box<dyn GameEventCondition<E>> {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &E) -> ConditionResponse {
        (**self).evaluate(ctx, state, event)
    }

    fn exclusivity_group(&self) -> Option<&str> {
        (**self).exclusivity_group()
    }
}

/// State condition backed by a closure. See [`state_condition`].
pub struct StateConditionFn<F>(F);

/// Wrap a closure as a [`GameStateCondition`].
pub fn state_condition<F>(f: F) -> StateConditionFn<F>
where
    F: Fn(&EvaluationContext<'_>, &GameState) -> ConditionResponse + Send + Sync,
{
    StateConditionFn(f)
}

impl<F> GameStateCondition for StateConditionFn<F>
where
    F: Fn(&EvaluationContext<'_>, &GameState) -> ConditionResponse + Send + Sync,
{
    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState) -> ConditionResponse {
        (self.0)(ctx, state)
    }
}

/// Event condition backed by a closure. See [`event_condition`].
pub struct EventConditionFn<F>(F);

/// Wrap a closure as a [`GameEventCondition`].
pub fn event_condition<E, F>(f: F) -> EventConditionFn<F>
where
    E: GameEvent,
    F: Fn(&EvaluationContext<'_>, &GameState, &E) -> ConditionResponse + Send + Sync,
{
    EventConditionFn(f)
}

impl<E, F> GameEventCondition<E> for EventConditionFn<F>
where
    E: GameEvent,
    F: Fn(&EvaluationContext<'_>, &GameState, &E) -> ConditionResponse + Send + Sync,
{
    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &E) -> ConditionResponse {
        (self.0)(ctx, state, event)
    }
}

/// How a composite combines its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Composition {
    All,
    Any,
}

/// One level of condition composition.
pub struct Composite<C> {
    mode: Composition,
    children: Vec<C>,
}

/// Composite over state conditions.
pub type CompositeCondition = Composite<Box<dyn GameStateCondition>>;

/// Composite over event conditions.
pub type CompositeEventCondition<E> = Composite<Box<dyn GameEventCondition<E>>>;

impl<C> Composite<C> {
    pub fn builder() -> CompositeBuilder<C> {
        CompositeBuilder {
            mode: None,
            children: Vec::new(),
            mixed: false,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Composition {
        self.mode
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    fn combine(&self, mut evaluate: impl FnMut(&C) -> ConditionResponse) -> ConditionResponse {
        match self.mode {
            Composition::All => {
                for child in &self.children {
                    let response = evaluate(child);
                    if !response.is_valid() {
                        return response;
                    }
                }
                ConditionResponse::valid()
            }
            Composition::Any => {
                let mut first = None;
                let mut first_invalid = None;
                for child in &self.children {
                    let response = evaluate(child);
                    if response.is_valid() {
                        return response;
                    }
                    if first_invalid.is_none() && response.outcome == ConditionOutcome::Invalid {
                        first_invalid = Some(response.clone());
                    }
                    first.get_or_insert(response);
                }
                first_invalid
                    .or(first)
                    .unwrap_or_else(|| ConditionResponse::invalid("no alternative accepted"))
            }
        }
    }
}

impl GameStateCondition for CompositeCondition {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState) -> ConditionResponse {
        self.combine(|child| child.evaluate(ctx, state))
    }
}

impl<E: GameEvent> GameEventCondition<E> for CompositeEventCondition<E> {
    fn evaluate(&self, ctx: &EvaluationContext<'_>, state: &GameState, event: &E) -> ConditionResponse {
        self.combine(|child| child.evaluate(ctx, state, event))
    }
}

/// Builder for [`Composite`].
pub struct CompositeBuilder<C> {
    mode: Option<Composition>,
    children: Vec<C>,
    mixed: bool,
}

impl<C> CompositeBuilder<C> {
    /// Add a child combined with AND.
    #[must_use]
    pub fn all(self, child: C) -> Self {
        self.push(Composition::All, child)
    }

    /// Add a child combined with OR.
    #[must_use]
    pub fn any(self, child: C) -> Self {
        self.push(Composition::Any, child)
    }

    fn push(mut self, mode: Composition, child: C) -> Self {
        match self.mode {
            Some(existing) if existing != mode => self.mixed = true,
            _ => self.mode = Some(mode),
        }
        self.children.push(child);
        self
    }

    pub fn build(self) -> Result<Composite<C>, BuildError> {
        if self.mixed {
            return Err(BuildError::MixedComposition);
        }
        match self.mode {
            Some(mode) if !self.children.is_empty() => Ok(Composite {
                mode,
                children: self.children,
            }),
            _ => Err(BuildError::EmptyComposition),
        }
    }
}
