//! Engine integration tests: phase activation, rule evaluation modes,
//! exclusivity groups, idempotent re-application and mutator checks.

use rust_boards::core::{ArtifactId, ArtifactState, EngineConfig, EngineError, GameState, Piece, RuleEvaluation};
use rust_boards::engine::{GameBuilder, GameProgress};
use rust_boards::flows::{
    event_condition, mutator, AlwaysCondition, ConditionResponse, EndTurnEvent, GameEvent, PhaseBuilder, Rule,
    StateMutator, ValueAbsentCondition, ValueEqualsCondition,
};
use rust_boards::observer::{EvaluationEvent, RecordingObserver, RuleSkipReason};

/// Set a game-defined flag.
#[derive(Debug)]
struct SetFlag(i64);

impl GameEvent for SetFlag {
    fn kind(&self) -> &'static str {
        "SetFlag"
    }
}

/// Declare the game over.
#[derive(Debug)]
struct Resign;

impl GameEvent for Resign {}

fn id(s: &str) -> ArtifactId {
    ArtifactId::new(s)
}

/// Increment a counter by one.
fn bump(counter: &'static str) -> impl StateMutator<EndTurnEvent> + 'static {
    mutator(move |_, state: &GameState, _: &EndTurnEvent| {
        let current = state.value_of(&id(counter)).unwrap_or(0);
        Ok(state.next([(id(counter), ArtifactState::Value(current + 1))]))
    })
}

/// Double a counter.
fn double(counter: &'static str) -> impl StateMutator<EndTurnEvent> + 'static {
    mutator(move |_, state: &GameState, _: &EndTurnEvent| {
        let current = state.value_of(&id(counter)).unwrap_or(0);
        Ok(state.next([(id(counter), ArtifactState::Value(current * 2))]))
    })
}

fn counters() -> GameBuilder {
    GameBuilder::new()
        .with_tile("x")
        .with_player("solo")
        .with_counter("a", 0)
        .with_counter("b", 0)
        .with_sentinel("flag")
}

fn compile(builder: GameBuilder, phase: PhaseBuilder, config: EngineConfig) -> GameProgress {
    builder.with_phase(phase).with_config(config).compile().unwrap()
}

fn skipped(recorder: &RecordingObserver) -> Vec<(String, RuleSkipReason)> {
    recorder
        .events()
        .iter()
        .filter_map(|event| match event {
            EvaluationEvent::RuleSkipped { rule, reason, .. } => Some((rule.clone(), *reason)),
            _ => None,
        })
        .collect()
}

fn applied(recorder: &RecordingObserver) -> Vec<String> {
    recorder
        .events()
        .iter()
        .filter_map(|event| match event {
            EvaluationEvent::RuleApplied { rule, .. } => Some(rule.clone()),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Exclusivity Groups
// =============================================================================

fn grouped_phase() -> PhaseBuilder {
    PhaseBuilder::new(1, "turn")
        .with_condition(AlwaysCondition)
        .with_rule(Rule::<EndTurnEvent>::new("first", AlwaysCondition, bump("a")).in_group("turn"))
        .with_rule(Rule::<EndTurnEvent>::new("second", AlwaysCondition, bump("b")).in_group("turn"))
}

/// Test that only the first of two grouped rules applies, and the second
/// is reported as masked, in both evaluation modes.
#[test]
fn test_exclusivity_masking() {
    for mode in [RuleEvaluation::FirstMatch, RuleEvaluation::Cascade] {
        let progress = compile(
            counters(),
            grouped_phase(),
            EngineConfig::default().with_rule_evaluation(mode),
        );
        let mut recorder = RecordingObserver::new();
        let next = progress.handle_event_observed(&EndTurnEvent, &mut recorder).unwrap();

        assert_eq!(next.state().value_of(&id("a")), Some(1), "{mode:?}");
        assert_eq!(next.state().value_of(&id("b")), Some(0), "{mode:?}");
        assert_eq!(applied(&recorder), vec!["first"]);
        assert_eq!(skipped(&recorder), vec![("second".to_owned(), RuleSkipReason::ExclusivityMasked)]);
    }
}

/// Test that an ungrouped later rule is silently passed over in
/// first-match mode but applies in cascade mode.
#[test]
fn test_first_match_vs_cascade() {
    let phase = || {
        PhaseBuilder::new(1, "turn")
            .with_condition(AlwaysCondition)
            .with_rule(Rule::<EndTurnEvent>::new("bump", AlwaysCondition, bump("a")))
            .with_rule(Rule::<EndTurnEvent>::new(
                "double",
                event_condition(|_, state: &GameState, _: &EndTurnEvent| {
                    ConditionResponse::check(state.value_of(&id("a")) == Some(1), || "a is not 1".to_owned())
                }),
                double("a"),
            ))
    };

    let first = compile(counters(), phase(), EngineConfig::default());
    let mut recorder = RecordingObserver::new();
    let next = first.handle_event_observed(&EndTurnEvent, &mut recorder).unwrap();
    assert_eq!(next.state().value_of(&id("a")), Some(1));
    assert_eq!(applied(&recorder), vec!["bump"]);
    assert!(skipped(&recorder).is_empty());

    // Cascade threads the state: "double" sees a == 1 produced by "bump"
    let cascade = compile(
        counters(),
        phase(),
        EngineConfig::default().with_rule_evaluation(RuleEvaluation::Cascade),
    );
    let next = cascade.handle_event(&EndTurnEvent).unwrap();
    assert_eq!(next.state().value_of(&id("a")), Some(2));
    assert_eq!(next.event_count(), 1);
}

/// Test that rules for other event types are reported as filtered.
#[test]
fn test_event_kind_filtering() {
    let phase = PhaseBuilder::new(1, "turn")
        .with_condition(AlwaysCondition)
        .with_rule(Rule::<SetFlag>::new(
            "flag",
            AlwaysCondition,
            mutator(|_, state: &GameState, event: &SetFlag| Ok(state.next([(id("flag"), ArtifactState::Value(event.0))]))),
        ))
        .with_rule(Rule::<EndTurnEvent>::new("bump", AlwaysCondition, bump("a")));
    let progress = compile(counters(), phase, EngineConfig::default());

    let mut recorder = RecordingObserver::new();
    progress.handle_event_observed(&EndTurnEvent, &mut recorder).unwrap();
    assert_eq!(skipped(&recorder), vec![("flag".to_owned(), RuleSkipReason::EventKindFiltered)]);

    recorder.clear();
    progress.handle_event_observed(&SetFlag(3), &mut recorder).unwrap();
    assert_eq!(skipped(&recorder), vec![("bump".to_owned(), RuleSkipReason::EventKindFiltered)]);
}

// =============================================================================
// Idempotence and Ignored Events
// =============================================================================

fn flag_phase() -> PhaseBuilder {
    PhaseBuilder::new(1, "flags")
        .with_condition(AlwaysCondition)
        .with_rule(Rule::<SetFlag>::new(
            "set",
            AlwaysCondition,
            mutator(|_, state: &GameState, event: &SetFlag| Ok(state.next([(id("flag"), ArtifactState::Value(event.0))]))),
        ))
}

/// Test that re-applying an accepted event changes nothing and does not
/// advance the sequence or the event counter.
#[test]
fn test_idempotent_reapplication() {
    let progress = compile(counters(), flag_phase(), EngineConfig::default());

    let once = progress.handle_event(&SetFlag(7)).unwrap();
    let twice = once.handle_event(&SetFlag(7)).unwrap();

    assert_eq!(once.state().sequence(), 1);
    assert_eq!(once.event_count(), 1);
    assert_eq!(twice.state(), once.state());
    assert_eq!(twice.event_count(), 1);

    let changed = twice.handle_event(&SetFlag(8)).unwrap();
    assert_eq!(changed.state().sequence(), 2);
    assert_eq!(changed.event_count(), 2);
}

/// Test that an event no rule handles comes back unchanged with an
/// ignore notification carrying the reason.
#[test]
fn test_ignored_event_is_echoed() {
    let progress = compile(counters(), flag_phase(), EngineConfig::default());
    let mut recorder = RecordingObserver::new();

    let next = progress.handle_event_observed(&EndTurnEvent, &mut recorder).unwrap();
    assert_eq!(next.state(), progress.state());
    assert_eq!(next.event_count(), 0);
    assert_eq!(recorder.kinds(), vec!["PhaseEnter", "RuleSkipped", "EventIgnored"]);

    let rejecting = PhaseBuilder::new(1, "closed")
        .with_condition(AlwaysCondition)
        .with_rule(Rule::<EndTurnEvent>::new(
            "never",
            event_condition(|_, _: &GameState, _: &EndTurnEvent| ConditionResponse::invalid("not your turn")),
            bump("a"),
        ));
    let progress = compile(counters(), rejecting, EngineConfig::default());
    recorder.clear();
    progress.handle_event_observed(&EndTurnEvent, &mut recorder).unwrap();

    let last = recorder.events().last().unwrap();
    assert_eq!(
        last,
        &EvaluationEvent::EventIgnored {
            event: EndTurnEvent.kind().to_owned(),
            reason: "not your turn".to_owned(),
        }
    );
}

// =============================================================================
// Phase Tree
// =============================================================================

/// Test a composite root gated by a "game over" sentinel: once a player
/// resigns no phase is active and every later event is ignored.
#[test]
fn test_phase_tree_and_game_over() {
    let root = PhaseBuilder::new(1, "game")
        .with_condition(ValueAbsentCondition::new("game-over"))
        .with_child(
            PhaseBuilder::new(2, "opening")
                .with_condition(ValueEqualsCondition::new("a", 0))
                .with_rule(Rule::<EndTurnEvent>::new("open", AlwaysCondition, bump("a"))),
        )
        .with_child(
            PhaseBuilder::new(3, "middle")
                .with_condition(AlwaysCondition)
                .with_rule(Rule::<EndTurnEvent>::new("continue", AlwaysCondition, bump("b")))
                .with_rule(Rule::<Resign>::new(
                    "resign",
                    AlwaysCondition,
                    mutator(|_, state: &GameState, _: &Resign| {
                        Ok(state.next([(id("game-over"), ArtifactState::Value(1))]))
                    }),
                )),
        );
    let progress = compile(counters().with_sentinel("game-over"), root, EngineConfig::default());

    let mut recorder = RecordingObserver::new();
    let opened = progress.handle_event_observed(&EndTurnEvent, &mut recorder).unwrap();
    assert_eq!(opened.state().value_of(&id("a")), Some(1));
    let entered: Vec<u32> = recorder
        .events()
        .iter()
        .filter_map(|e| match e {
            EvaluationEvent::PhaseEnter { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect();
    assert_eq!(entered, vec![1, 2]);

    // "opening" no longer activates; "middle" takes over
    let middle = opened.handle_event(&EndTurnEvent).unwrap();
    assert_eq!(middle.state().value_of(&id("b")), Some(1));

    let over = middle.handle_event(&Resign).unwrap();
    assert_eq!(over.state().value_of(&id("game-over")), Some(1));

    recorder.clear();
    let after = over.handle_event_observed(&EndTurnEvent, &mut recorder).unwrap();
    assert_eq!(after.state(), over.state());
    assert_eq!(recorder.kinds(), vec!["EventIgnored"]);
}

/// Test that root phases are tried in declaration order.
#[test]
fn test_first_active_root_wins() {
    let progress = counters()
        .with_phase(
            PhaseBuilder::new(1, "locked")
                .with_condition(ValueEqualsCondition::new("a", 99))
                .with_rule(Rule::<EndTurnEvent>::new("locked", AlwaysCondition, bump("b"))),
        )
        .with_phase(
            PhaseBuilder::new(2, "open")
                .with_condition(AlwaysCondition)
                .with_rule(Rule::<EndTurnEvent>::new("open", AlwaysCondition, bump("a"))),
        )
        .compile()
        .unwrap();

    let next = progress.handle_event(&EndTurnEvent).unwrap();
    assert_eq!(next.state().value_of(&id("a")), Some(1));
    assert_eq!(next.state().value_of(&id("b")), Some(0));
}

// =============================================================================
// Mutator Checks
// =============================================================================

/// Test that writing state for an artifact the game never declared is an
/// engine error.
#[test]
fn test_unknown_artifact_is_rejected() {
    let phase = PhaseBuilder::new(1, "rogue")
        .with_condition(AlwaysCondition)
        .with_rule(Rule::<EndTurnEvent>::new(
            "ghost",
            AlwaysCondition,
            mutator(|_, state: &GameState, _: &EndTurnEvent| Ok(state.next([(id("ghost"), ArtifactState::Value(1))]))),
        ));
    let progress = compile(counters(), phase, EngineConfig::default());

    let err = progress.handle_event(&EndTurnEvent).unwrap_err();
    assert!(matches!(err, EngineError::UnknownArtifact(ref a) if a.as_str() == "ghost"));
}

/// Test that placing a piece on a tile outside the board is an invariant
/// violation.
#[test]
fn test_piece_off_board_is_rejected() {
    let phase = PhaseBuilder::new(1, "rogue")
        .with_condition(AlwaysCondition)
        .with_rule(Rule::<EndTurnEvent>::new(
            "teleport",
            AlwaysCondition,
            mutator(|_, state: &GameState, _: &EndTurnEvent| {
                Ok(state.next([(id("pawn"), ArtifactState::piece_on("nowhere"))]))
            }),
        ));
    let progress = compile(
        counters().with_piece_at(Piece::new("pawn").owned_by("solo"), "x"),
        phase,
        EngineConfig::default(),
    );

    let err = progress.handle_event(&EndTurnEvent).unwrap_err();
    assert!(matches!(err, EngineError::Invariant(_)));
}

// =============================================================================
// Configuration
// =============================================================================

/// Test that two engines with different configurations coexist and agree.
#[test]
fn test_configurations_agree() {
    let configs = [
        EngineConfig::baseline(),
        EngineConfig::default(),
        EngineConfig::default().with_incremental_bitboards(true, true),
        EngineConfig::default().with_observer_batching(2).with_state_hashing(false),
    ];
    let states: Vec<GameState> = configs
        .into_iter()
        .map(|config| {
            let progress = compile(counters(), grouped_phase(), config);
            let progress = progress.handle_event(&EndTurnEvent).unwrap();
            progress.handle_event(&EndTurnEvent).unwrap().state().clone()
        })
        .collect();

    assert!(states.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(states[0].value_of(&id("a")), Some(2));
}
