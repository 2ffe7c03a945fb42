//! Common model types, re-exported from `skua_base`, plus game outcome types.

use std::fmt::{self, Display};

pub use skua_base::types::{
    CastlingRights, CastlingRightsParseError, CastlingSide, Color, ColorParseError, File, Piece,
    PieceKind, PieceParseError, Rank, Square, SquareParseError,
};

/// Reason why a game was won
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WinReason {
    Checkmate,
    Resign,
}

/// Reason why a game was drawn
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    Moves75,
    Repeat5,
    Moves50,
    Repeat3,
    Agreement,
}

/// Game result, either a win for one of the sides or a draw
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win { side: Color, reason: WinReason },
    Draw(DrawReason),
}

/// Strictness levels for finishing a game automatically
///
/// `Force` accepts only the outcomes that end the game by the rules regardless
/// of the players' will (checkmate and stalemate). `Strict` adds the draws
/// which are claimed automatically under FIDE rules (insufficient material,
/// 75 moves, fivefold repetition). `Relaxed` also adds the draws a player may
/// claim (50 moves, threefold repetition).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OutcomeFilter {
    Force,
    Strict,
    Relaxed,
}

impl Outcome {
    pub fn win(side: Color, reason: WinReason) -> Outcome {
        Outcome::Win { side, reason }
    }

    pub fn winner(&self) -> Option<Color> {
        match self {
            Outcome::Win { side, .. } => Some(*side),
            Outcome::Draw(_) => None,
        }
    }

    pub fn is_force(&self) -> bool {
        matches!(
            *self,
            Outcome::Win {
                reason: WinReason::Checkmate,
                ..
            } | Outcome::Draw(DrawReason::Stalemate)
        )
    }

    pub fn passes(&self, filter: OutcomeFilter) -> bool {
        if self.is_force() {
            return true;
        }
        if matches!(filter, OutcomeFilter::Strict | OutcomeFilter::Relaxed)
            && matches!(
                *self,
                Outcome::Draw(
                    DrawReason::InsufficientMaterial | DrawReason::Moves75 | DrawReason::Repeat5
                )
            )
        {
            return true;
        }
        matches!(filter, OutcomeFilter::Relaxed)
            && matches!(
                *self,
                Outcome::Draw(DrawReason::Moves50 | DrawReason::Repeat3)
            )
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Outcome::Win { side, reason } => {
                let side = match side {
                    Color::White => "white",
                    Color::Black => "black",
                };
                let reason = match reason {
                    WinReason::Checkmate => "checkmate",
                    WinReason::Resign => "opponent resigned",
                };
                write!(f, "{} wins: {}", side, reason)
            }
            Outcome::Draw(reason) => {
                let reason = match reason {
                    DrawReason::Stalemate => "stalemate",
                    DrawReason::InsufficientMaterial => "insufficient material",
                    DrawReason::Moves75 => "75 moves without progress",
                    DrawReason::Repeat5 => "position repeated five times",
                    DrawReason::Moves50 => "50 moves without progress",
                    DrawReason::Repeat3 => "position repeated three times",
                    DrawReason::Agreement => "agreement",
                };
                write!(f, "draw: {}", reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_filters() {
        let mate = Outcome::win(Color::White, WinReason::Checkmate);
        assert!(mate.is_force());
        assert!(mate.passes(OutcomeFilter::Force));
        assert_eq!(mate.winner(), Some(Color::White));

        let stale = Outcome::Draw(DrawReason::Stalemate);
        assert!(stale.is_force());
        assert_eq!(stale.winner(), None);

        let m75 = Outcome::Draw(DrawReason::Moves75);
        assert!(!m75.passes(OutcomeFilter::Force));
        assert!(m75.passes(OutcomeFilter::Strict));

        let m50 = Outcome::Draw(DrawReason::Moves50);
        assert!(!m50.passes(OutcomeFilter::Strict));
        assert!(m50.passes(OutcomeFilter::Relaxed));

        let resign = Outcome::win(Color::Black, WinReason::Resign);
        assert!(!resign.is_force());
        assert_eq!(resign.to_string(), "black wins: opponent resigned");
    }
}
