//! Event handling.
//!
//! A [`GameProgress`] is one position in a game: the compiled engine, the
//! current immutable state and the acceleration caches for that state.
//! Handling an event never mutates a progress; it returns the successor
//! (or an unchanged copy when the event is ignored).
//!
//! ## Evaluation order
//!
//! 1. Root phases are tried in declaration order; the first one that
//!    activates supplies the active path down to a leaf. Every phase on
//!    that path is reported to the observer.
//! 2. The leaf's pre-processors may expand the event. Derived events are
//!    evaluated from the roots again, one after the other, without further
//!    expansion. An expansion is all-or-nothing: if any derived event is
//!    not applied the original event is ignored.
//! 3. The leaf's rules are evaluated in declaration order. Rules for other
//!    event types are skipped as `EventKindFiltered`; rules whose
//!    exclusivity group already fired are skipped as `ExclusivityMasked`.
//!    `FirstMatch` stops at the first applied rule, `Cascade` keeps going
//!    with the state the previous rule produced.
//! 4. Mutator output is checked against the game definition, the
//!    acceleration caches are rebuilt (or patched) and the resulting state
//!    is fingerprinted.

use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, instrument};

use super::context::{EngineCapabilities, EvaluationContext};
use super::game::Game;
use crate::accel::AccelerationContext;
use crate::core::{ArtifactId, ArtifactState, EngineError, GameRng, GameState, RuleEvaluation};
use crate::flows::{GameEvent, GamePhase, MovePieceEvent, PreProcessOutcome, RollDiceEvent};
use crate::observer::{BatchingObserver, EvaluationObserver, NoopObserver, RuleSkipReason, StateHash};

/// A compiled game: definition, capabilities and phase tree.
#[derive(Debug)]
pub struct GameEngine {
    game: Game,
    capabilities: EngineCapabilities,
    phases: Vec<GamePhase>,
}

impl GameEngine {
    pub(crate) fn new(game: Game, capabilities: EngineCapabilities, phases: Vec<GamePhase>) -> Self {
        Self {
            game,
            capabilities,
            phases,
        }
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn capabilities(&self) -> &EngineCapabilities {
        &self.capabilities
    }

    /// Root phases in declaration order.
    #[must_use]
    pub fn phases(&self) -> &[GamePhase] {
        &self.phases
    }

    /// Evaluation context for `state`.
    #[must_use]
    pub fn context<'a>(
        &'a self,
        state: &'a GameState,
        acceleration: Option<&'a AccelerationContext>,
    ) -> EvaluationContext<'a> {
        EvaluationContext::new(&self.game, &self.capabilities, state, acceleration)
    }

    /// Active phase path (root to leaf) for `state`.
    #[must_use]
    pub fn active_path<'a>(&'a self, ctx: &EvaluationContext<'_>, state: &GameState) -> Vec<&'a GamePhase> {
        let mut path = Vec::new();
        for root in &self.phases {
            if root.activate(ctx, state, &mut path) {
                break;
            }
        }
        path
    }

    /// Reject mutator output that references artifacts the game does not
    /// define or places pieces off the board.
    fn check_transition(&self, previous: &GameState, next: &GameState) -> Result<(), EngineError> {
        if next.sequence() < previous.sequence() {
            return Err(EngineError::Invariant(format!(
                "sequence went backwards ({} -> {})",
                previous.sequence(),
                next.sequence()
            )));
        }
        for artifact in previous.changed_artifacts(next) {
            if !self.game.contains_artifact(&artifact) {
                return Err(EngineError::UnknownArtifact(artifact));
            }
            if let Some(ArtifactState::Piece { tile }) = next.get(&artifact) {
                if !self.game.board().contains_tile(tile) {
                    return Err(EngineError::Invariant(format!(
                        "piece '{artifact}' placed on unknown tile '{tile}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Result of evaluating one event against one state.
enum Evaluation {
    Applied {
        state: GameState,
        acceleration: Option<Arc<AccelerationContext>>,
    },
    Ignored(String),
}

/// One position in a game.
#[derive(Clone, Debug)]
pub struct GameProgress {
    engine: Arc<GameEngine>,
    state: GameState,
    acceleration: Option<Arc<AccelerationContext>>,
    events: u64,
}

impl GameProgress {
    pub(crate) fn initial(engine: Arc<GameEngine>, state: GameState) -> Self {
        let acceleration = engine.capabilities().accelerate(&state).map(Arc::new);
        Self {
            engine,
            state,
            acceleration,
            events: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        self.engine.game()
    }

    /// Acceleration caches for the current state (bitboards enabled only).
    #[must_use]
    pub fn acceleration(&self) -> Option<&AccelerationContext> {
        self.acceleration.as_deref()
    }

    /// Number of events that changed the state.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.events
    }

    /// Evaluation context for the current state.
    #[must_use]
    pub fn context(&self) -> EvaluationContext<'_> {
        self.engine.context(&self.state, self.acceleration())
    }

    /// Handle an event without observing evaluation.
    pub fn handle_event(&self, event: &dyn GameEvent) -> Result<GameProgress, EngineError> {
        self.handle_event_observed(event, &mut NoopObserver)
    }

    /// Handle an event, reporting every evaluation step to `observer`.
    ///
    /// An event no rule accepts is not an error: the returned progress holds
    /// the unchanged state.
    #[instrument(skip_all, fields(event = event.kind(), sequence = self.state.sequence()))]
    pub fn handle_event_observed(
        &self,
        event: &dyn GameEvent,
        observer: &mut dyn EvaluationObserver,
    ) -> Result<GameProgress, EngineError> {
        let config = self.engine.capabilities().config();
        if config.observer_batching {
            let mut batching = BatchingObserver::new(observer, config.batch_capacity);
            let result = self.process(event, &mut batching);
            batching.flush();
            result
        } else {
            let result = self.process(event, observer);
            observer.flush();
            result
        }
    }

    /// Resolve a path for `piece` to `to` and submit a [`MovePieceEvent`].
    ///
    /// Ignored (unchanged progress) when the piece is unknown, off the
    /// board, or has no path to `to`.
    pub fn move_piece(&self, piece: &ArtifactId, to: &ArtifactId) -> Result<GameProgress, EngineError> {
        let path = self.game().piece(piece).and_then(|definition| {
            let from = self.state.piece_tile(piece)?;
            self.engine.capabilities().resolver().resolve(definition, from, to)
        });
        match path {
            Some(path) => self.handle_event(&MovePieceEvent::new(piece.clone(), path)),
            None => {
                debug!(%piece, %to, "no path for move");
                Ok(self.clone())
            }
        }
    }

    /// Roll every die of the game and submit the result.
    pub fn roll_dice(&self, rng: &mut GameRng) -> Result<GameProgress, EngineError> {
        let values = self
            .game()
            .dice()
            .iter()
            .map(|die| (die.id.clone(), rng.roll(die.sides)))
            .collect();
        self.handle_event(&RollDiceEvent { values })
    }

    fn process(&self, event: &dyn GameEvent, observer: &mut dyn EvaluationObserver) -> Result<GameProgress, EngineError> {
        match self.evaluate(&self.state, self.acceleration.as_ref(), event, observer, true)? {
            Evaluation::Applied { state, acceleration } => {
                if self.engine.capabilities().config().hash_states {
                    observer.on_state_hashed(state.sequence(), StateHash::of(&state)?);
                }
                let events = if state.sequence() == self.state.sequence() {
                    self.events
                } else {
                    self.events + 1
                };
                Ok(GameProgress {
                    engine: Arc::clone(&self.engine),
                    state,
                    acceleration,
                    events,
                })
            }
            Evaluation::Ignored(reason) => {
                debug!(event = event.kind(), %reason, "event ignored");
                observer.on_event_ignored(event.kind(), &reason);
                Ok(self.clone())
            }
        }
    }

    fn evaluate(
        &self,
        state: &GameState,
        acceleration: Option<&Arc<AccelerationContext>>,
        event: &dyn GameEvent,
        observer: &mut dyn EvaluationObserver,
        preprocess: bool,
    ) -> Result<Evaluation, EngineError> {
        let ctx = self.engine.context(state, acceleration.map(Arc::as_ref));
        let path = self.engine.active_path(&ctx, state);
        let Some(&leaf) = path.last() else {
            return Ok(Evaluation::Ignored("no active phase".to_owned()));
        };
        for phase in &path {
            observer.on_phase_enter(phase.number(), phase.label());
        }

        if preprocess {
            if let PreProcessOutcome::Expanded(derived) = leaf.preprocess(&ctx, state, event) {
                return self.evaluate_expansion(state, acceleration, &derived, observer);
            }
        }

        self.apply_rules(leaf, state, acceleration, event, observer)
    }

    fn evaluate_expansion(
        &self,
        state: &GameState,
        acceleration: Option<&Arc<AccelerationContext>>,
        derived: &[Box<dyn GameEvent>],
        observer: &mut dyn EvaluationObserver,
    ) -> Result<Evaluation, EngineError> {
        if derived.is_empty() {
            return Ok(Evaluation::Ignored("pre-processor produced no events".to_owned()));
        }

        let mut current = state.clone();
        let mut current_acceleration = acceleration.cloned();
        for event in derived {
            match self.evaluate(&current, current_acceleration.as_ref(), event.as_ref(), observer, false)? {
                Evaluation::Applied { state, acceleration } => {
                    current = state;
                    current_acceleration = acceleration;
                }
                Evaluation::Ignored(reason) => {
                    return Ok(Evaluation::Ignored(format!("derived {} not applied: {reason}", event.kind())));
                }
            }
        }

        Ok(Evaluation::Applied {
            state: current,
            acceleration: current_acceleration,
        })
    }

    fn apply_rules(
        &self,
        leaf: &GamePhase,
        state: &GameState,
        acceleration: Option<&Arc<AccelerationContext>>,
        event: &dyn GameEvent,
        observer: &mut dyn EvaluationObserver,
    ) -> Result<Evaluation, EngineError> {
        let config = self.engine.capabilities().config();
        let phase = leaf.number();

        let mut fired: SmallVec<[&str; 4]> = SmallVec::new();
        let mut applied: Option<(GameState, Option<Arc<AccelerationContext>>)> = None;
        let mut last_reason: Option<String> = None;

        for rule in leaf.rules() {
            if !rule.accepts(event) {
                observer.on_rule_skipped(phase, rule.name(), RuleSkipReason::EventKindFiltered);
                continue;
            }
            if rule.group().is_some_and(|group| fired.contains(&group)) {
                observer.on_rule_skipped(phase, rule.name(), RuleSkipReason::ExclusivityMasked);
                continue;
            }
            if applied.is_some() && config.rule_evaluation == RuleEvaluation::FirstMatch {
                continue;
            }

            let (current, current_acceleration) = match &applied {
                Some((next, next_acceleration)) => (next, next_acceleration.as_ref()),
                None => (state, acceleration),
            };
            let ctx = self.engine.context(current, current_acceleration.map(Arc::as_ref));

            let response = rule.evaluate(&ctx, current, event);
            observer.on_rule_evaluated(phase, rule.name(), &response);
            if !response.is_valid() {
                last_reason = response.reason;
                continue;
            }

            let next = rule.apply(&ctx, current, event)?;
            self.engine.check_transition(current, &next)?;
            observer.on_rule_applied(phase, rule.name());
            debug!(phase, rule = rule.name(), sequence = next.sequence(), "rule applied");

            if let Some(group) = rule.group() {
                fired.push(group);
            }
            let next_acceleration = current_acceleration.map(|a| Arc::new(a.advance(current, &next, config)));
            applied = Some((next, next_acceleration));
        }

        Ok(match applied {
            Some((state, acceleration)) => Evaluation::Applied { state, acceleration },
            None => Evaluation::Ignored(last_reason.unwrap_or_else(|| "no rule accepted the event".to_owned())),
        })
    }
}
