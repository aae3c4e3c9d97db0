//! Phases, conditions, rules and event pre-processing.
//!
//! ## Key Components
//!
//! - [`ConditionResponse`]: `Valid | Invalid | Ignore | NotApplicable` plus reason
//! - [`GameStateCondition`] / [`GameEventCondition`]: pure checks
//! - [`StateMutator`]: produces the successor state for an accepted event
//! - [`Rule`] / [`RuleEntry`]: condition + mutator, with an exclusivity group
//! - [`GamePhase`] / [`PhaseBuilder`]: the condition-gated phase tree
//! - [`EventPreProcessor`]: expands one event into derived events
//!   ([`DicePathPreProcessor`] via [`SingleStepPathFinder`])
//!
//! ## Failure semantics
//!
//! A condition that does not accept is not an error: the rule simply does
//! not apply. If nothing applies, the event is ignored and the state is
//! returned unchanged. Only structural misconfiguration (a
//! [`BuildError`](crate::core::BuildError)) and engine defects (an
//! [`EngineError`](crate::core::EngineError)) are errors.
//!
//! Event contents come from the host, so rules check them in conditions:
//! a roll rule pairs [`RollDiceMutator`] with [`RollValuesValidCondition`]
//! so an impossible face is ignored rather than reported as a defect.

mod builtins;
mod condition;
mod events;
mod phase;
mod preprocess;
mod rule;

pub use builtins::{
    ActivePlayerOwnsPieceCondition, AlwaysCondition, DestinationNotFriendlyCondition, DiceMatchesPathCondition,
    DiceMoveMutator, DiceRolledCondition, MovePieceMutator, NeverCondition, NextPlayerMutator,
    PathResolvesCondition, PathUnblockedCondition, PieceOnSourceCondition, RollDiceMutator,
    RollValuesValidCondition, ValueAbsentCondition, ValueEqualsCondition,
};
pub use condition::{
    event_condition, state_condition, Composite, CompositeBuilder, CompositeCondition, CompositeEventCondition,
    Composition, ConditionOutcome, ConditionResponse, EventConditionFn, GameEventCondition, GameStateCondition,
    StateConditionFn,
};
pub use events::{AsAny, DiceMoveEvent, EndTurnEvent, GameEvent, MovePieceEvent, PieceMovement, RollDiceEvent};
pub use phase::{GamePhase, PhaseBuilder};
pub use preprocess::{DicePathPreProcessor, DiceStep, EventPreProcessor, PreProcessOutcome, SingleStepPathFinder};
pub use rule::{mutator, MutatorFn, Rule, RuleEntry, StateMutator};
