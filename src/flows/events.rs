//! Game events.
//!
//! Events are open-ended: game modules define their own types and implement
//! [`GameEvent`]. Rules are keyed by the concrete event type and receive the
//! event downcast to it.

use std::any::Any;
use std::fmt::Debug;

use crate::board::TilePath;
use crate::core::ArtifactId;

/// Upcast helper so `dyn GameEvent` can be downcast.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An incoming event.
pub trait GameEvent: AsAny + Debug + Send + Sync + 'static {
    /// Name used in traces and logs.
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn GameEvent {
    /// Downcast to a concrete event type.
    #[must_use]
    pub fn downcast_ref<E: GameEvent>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    #[must_use]
    pub fn is<E: GameEvent>(&self) -> bool {
        self.as_any().is::<E>()
    }
}

/// Events that move one piece along a path.
pub trait PieceMovement {
    fn piece(&self) -> &ArtifactId;
    fn from(&self) -> &ArtifactId;
    fn to(&self) -> &ArtifactId;
    fn path(&self) -> &TilePath;
}

/// Move a piece from one tile to another along a resolved path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePieceEvent {
    pub piece: ArtifactId,
    pub from: ArtifactId,
    pub to: ArtifactId,
    pub path: TilePath,
}

impl MovePieceEvent {
    /// Build from a resolved path (endpoints taken from the path).
    pub fn new(piece: impl Into<ArtifactId>, path: TilePath) -> Self {
        Self {
            piece: piece.into(),
            from: path.from().clone(),
            to: path.to().clone(),
            path,
        }
    }
}

impl GameEvent for MovePieceEvent {
    fn kind(&self) -> &'static str {
        "MovePiece"
    }
}

/// One dice-driven step of a piece, consuming one die.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiceMoveEvent {
    pub piece: ArtifactId,
    pub from: ArtifactId,
    pub to: ArtifactId,
    pub path: TilePath,
    pub dice: ArtifactId,
}

impl GameEvent for DiceMoveEvent {
    fn kind(&self) -> &'static str {
        "DiceMove"
    }
}

/// Outcome of rolling dice, as `(dice, value)` pairs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RollDiceEvent {
    pub values: Vec<(ArtifactId, u32)>,
}

impl GameEvent for RollDiceEvent {
    fn kind(&self) -> &'static str {
        "RollDice"
    }
}

/// The active player ends their turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EndTurnEvent;

impl GameEvent for EndTurnEvent {
    fn kind(&self) -> &'static str {
        "EndTurn"
    }
}

macro_rules! impl_piece_movement {
    ($($event:ty),*) => {
        $(
            impl PieceMovement for $event {
                fn piece(&self) -> &ArtifactId {
                    &self.piece
                }

                fn from(&self) -> &ArtifactId {
                    &self.from
                }

                fn to(&self) -> &ArtifactId {
                    &self.to
                }

                fn path(&self) -> &TilePath {
                    &self.path
                }
            }
        )*
    };
}

impl_piece_movement!(MovePieceEvent, DiceMoveEvent);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct CustomEvent;

    impl GameEvent for CustomEvent {}

    #[test]
    fn test_downcast() {
        let event: Box<dyn GameEvent> = Box::new(MovePieceEvent::new(
            "rook",
            TilePath::synthetic("a1", "a2", "north", 1),
        ));
        let event: &dyn GameEvent = event.as_ref();

        assert!(event.is::<MovePieceEvent>());
        assert!(!event.is::<DiceMoveEvent>());
        assert_eq!(event.downcast_ref::<MovePieceEvent>().unwrap().to, ArtifactId::new("a2"));
        assert_eq!(event.kind(), "MovePiece");
    }

    #[test]
    fn test_default_kind_is_type_name() {
        let event: &dyn GameEvent = &CustomEvent;
        assert!(event.kind().ends_with("CustomEvent"));
    }
}
