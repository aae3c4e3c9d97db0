//! Engine capabilities and the per-evaluation context handed to
//! conditions, mutators and pre-processors.

use std::sync::Arc;

use crate::accel::{
    AccelerationContext, AttackRays, BitboardOccupancy, Mobility, NaiveOccupancy, OccupancyIndex, PieceLayout,
};
use crate::board::BoardShape;
use crate::core::{EngineConfig, GameState, PlayerId};
use crate::patterns::PathResolver;

use super::game::Game;

/// Optional accelerated services, fixed when the game is compiled.
#[derive(Clone, Debug)]
pub struct EngineCapabilities {
    resolver: Arc<dyn PathResolver>,
    shape: Arc<BoardShape>,
    layout: Arc<PieceLayout>,
    rays: Option<Arc<AttackRays>>,
    config: EngineConfig,
}

impl EngineCapabilities {
    pub(crate) fn new(
        resolver: Arc<dyn PathResolver>,
        shape: Arc<BoardShape>,
        layout: Arc<PieceLayout>,
        rays: Option<Arc<AttackRays>>,
        config: EngineConfig,
    ) -> Self {
        Self {
            resolver,
            shape,
            layout,
            rays,
            config,
        }
    }

    /// The configured path resolver (compiled or geometric).
    #[must_use]
    pub fn resolver(&self) -> &dyn PathResolver {
        self.resolver.as_ref()
    }

    #[must_use]
    pub fn shape(&self) -> &BoardShape {
        &self.shape
    }

    #[must_use]
    pub fn layout(&self) -> &PieceLayout {
        &self.layout
    }

    /// Attack rays, when bitboards are enabled.
    #[must_use]
    pub fn rays(&self) -> Option<&AttackRays> {
        self.rays.as_deref()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Acceleration caches for `state`, if bitboards are enabled.
    #[must_use]
    pub fn accelerate(&self, state: &GameState) -> Option<AccelerationContext> {
        self.config
            .bitboards
            .then(|| AccelerationContext::build(Arc::clone(&self.shape), Arc::clone(&self.layout), state))
    }
}

/// Everything a condition or mutator may consult besides the state itself.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    game: &'a Game,
    capabilities: &'a EngineCapabilities,
    state: &'a GameState,
    acceleration: Option<&'a AccelerationContext>,
}

impl<'a> EvaluationContext<'a> {
    /// Context for `state`. `acceleration`, when given, must describe the
    /// same state.
    pub fn new(
        game: &'a Game,
        capabilities: &'a EngineCapabilities,
        state: &'a GameState,
        acceleration: Option<&'a AccelerationContext>,
    ) -> Self {
        Self {
            game,
            capabilities,
            state,
            acceleration,
        }
    }

    #[must_use]
    pub fn game(&self) -> &'a Game {
        self.game
    }

    #[must_use]
    pub fn capabilities(&self) -> &'a EngineCapabilities {
        self.capabilities
    }

    #[must_use]
    pub fn state(&self) -> &'a GameState {
        self.state
    }

    #[must_use]
    pub fn resolver(&self) -> &'a dyn PathResolver {
        self.capabilities.resolver()
    }

    #[must_use]
    pub fn acceleration(&self) -> Option<&'a AccelerationContext> {
        self.acceleration
    }

    /// Bitboard occupancy when available, otherwise a linear scan.
    #[must_use]
    pub fn occupancy(&self) -> Box<dyn OccupancyIndex + 'a> {
        match self.acceleration {
            Some(context) => Box::new(BitboardOccupancy::new(context)),
            None => Box::new(NaiveOccupancy::new(
                self.state,
                self.capabilities.shape(),
                self.capabilities.layout(),
            )),
        }
    }

    /// Sliding mobility of `player`'s pieces in this state.
    #[must_use]
    pub fn mobility(&self, player: PlayerId) -> u32 {
        let occupancy = self.occupancy();
        Mobility::new(occupancy.as_ref(), self.capabilities.rays()).player_total(
            self.state,
            self.game.pieces(),
            self.capabilities.layout(),
            player,
        )
    }
}

impl std::fmt::Debug for EvaluationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("sequence", &self.state.sequence())
            .field("accelerated", &self.acceleration.is_some())
            .finish()
    }
}
