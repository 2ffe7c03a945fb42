//! Position evaluation.
//!
//! Scores are always given from White's point of view, so negating a score
//! flips the side. Both bundled evaluators are antisymmetric under
//! [`Position::mirror`], which the search relies upon.

use crate::position::Position;
use crate::types::{Color, PieceKind, Square};

use std::fmt;

use derive_more::{Add, AddAssign, Neg, Sub, SubAssign};

const MATE_VALUE: i32 = 1_000_000;

/// Scores closer to [`Score::MATE`] than this margin encode a forced mate.
const MATE_MARGIN: i32 = 1000;

/// Position score in centipawns, from White's point of view.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Add, AddAssign, Neg, Sub,
    SubAssign,
)]
pub struct Score(i32);

impl Score {
    /// Score of an equal position.
    pub const ZERO: Score = Score(0);

    /// Score of a delivered checkmate.
    pub const MATE: Score = Score(MATE_VALUE);

    /// Creates a score of `value` centipawns.
    #[inline]
    pub const fn new(value: i32) -> Score {
        Score(value)
    }

    /// Returns the score in centipawns.
    #[inline]
    pub const fn value(&self) -> i32 {
        self.0
    }

    /// Score of checkmating the opponent in `ply` halfmoves.
    ///
    /// Quicker mates score higher, so the search prefers the shortest one.
    #[inline]
    pub const fn mate_in(ply: u32) -> Score {
        Score(MATE_VALUE - ply as i32)
    }

    /// Score of being checkmated in `ply` halfmoves.
    ///
    /// Longer defenses score higher, so the losing side drags the mate out.
    #[inline]
    pub const fn mated_in(ply: u32) -> Score {
        Score(-(MATE_VALUE - ply as i32))
    }

    /// Returns `true` if the score encodes a forced mate for either side.
    #[inline]
    pub const fn is_mate(&self) -> bool {
        self.0.abs() >= MATE_VALUE - MATE_MARGIN
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_mate() {
            let plies = MATE_VALUE - self.0.abs();
            let moves = (plies + 1) / 2;
            match self.0 > 0 {
                true => write!(f, "#{}", moves),
                false => write!(f, "#-{}", moves),
            }
        } else {
            write!(f, "{:+.2}", self.0 as f64 / 100.0)
        }
    }
}

/// Trait for static position evaluators.
pub trait Evaluate {
    /// Evaluates `pos` from White's point of view.
    fn evaluate(&self, pos: &Position) -> Score;
}

fn material_weight(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 300,
        PieceKind::Bishop => 300,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        // The kings cancel out while both are on the board.
        PieceKind::King => 20_000,
    }
}

/// Pure material counting with the classic 1/3/3/5/9 weights.
#[derive(Debug, Default, Copy, Clone)]
pub struct MaterialEval;

impl Evaluate for MaterialEval {
    fn evaluate(&self, pos: &Position) -> Score {
        let mut total = 0;
        for sq in Square::iter() {
            if let Some(piece) = pos.get(sq) {
                match piece.color {
                    Color::White => total += material_weight(piece.kind),
                    Color::Black => total -= material_weight(piece.kind),
                }
            }
        }
        Score(total)
    }
}

// Piece-square tables are written rank 8 first, as a board diagram. White
// pieces read them flipped by rank, black pieces as is, so the tables stay
// antisymmetric by construction.

#[rustfmt::skip]
static PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
static KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
static BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
static ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
static QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
static KING_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

fn table_weight(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}

fn piece_table(kind: PieceKind) -> &'static [i32; 64] {
    match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
    }
}

/// Material plus piece-square tables.
///
/// A textbook handcrafted evaluation: strong enough to make the bundled
/// search play sensible chess, simple enough to stay out of the way.
#[derive(Debug, Default, Copy, Clone)]
pub struct TableEval;

impl Evaluate for TableEval {
    fn evaluate(&self, pos: &Position) -> Score {
        let mut total = 0;
        for sq in Square::iter() {
            if let Some(piece) = pos.get(sq) {
                let table = piece_table(piece.kind);
                match piece.color {
                    Color::White => total += table_weight(piece.kind) + table[sq.index() ^ 56],
                    Color::Black => total -= table_weight(piece.kind) + table[sq.index()],
                }
            }
        }
        Score(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score() {
        assert_eq!(Score::new(150) + Score::new(-30), Score::new(120));
        assert_eq!(-Score::new(70), Score::new(-70));
        assert!(Score::mate_in(1) > Score::mate_in(3));
        assert!(Score::mate_in(3) > Score::new(5000));
        assert!(Score::mated_in(2) < Score::mated_in(4));
        assert!(Score::mated_in(4) < Score::new(-5000));
        assert!(Score::mate_in(5).is_mate());
        assert!(!Score::new(900).is_mate());

        assert_eq!(Score::new(150).to_string(), "+1.50");
        assert_eq!(Score::new(-30).to_string(), "-0.30");
        assert_eq!(Score::ZERO.to_string(), "+0.00");
        assert_eq!(Score::mate_in(1).to_string(), "#1");
        assert_eq!(Score::mate_in(3).to_string(), "#2");
        assert_eq!(Score::mated_in(2).to_string(), "#-1");
    }

    #[test]
    fn test_material() {
        let eval = MaterialEval;
        assert_eq!(eval.evaluate(&Position::initial()), Score::ZERO);

        let pos = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        assert_eq!(eval.evaluate(&pos), Score::new(100));

        // Queen versus rook and knight.
        let pos = Position::from_fen("1n2k2r/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert_eq!(eval.evaluate(&pos), Score::new(900 - 500 - 300));
    }

    #[test]
    fn test_tables_initial() {
        assert_eq!(TableEval.evaluate(&Position::initial()), Score::ZERO);

        // A developed knight beats one in the corner.
        let center = Position::from_fen("4k3/8/8/8/4N3/8/8/4K3 w - - 0 1").unwrap();
        let corner = Position::from_fen("4k3/8/8/8/8/8/8/N3K3 w - - 0 1").unwrap();
        assert!(TableEval.evaluate(&center) > TableEval.evaluate(&corner));
    }

    #[test]
    fn test_mirror_antisymmetry() {
        for fen in [
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "1rb1kb1r/pp1pnppp/2n2q2/2p1p1B1/3PP3/2P2N2/PP3PPP/RN1QKB1R w KQk - 1 8",
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
            "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        ] {
            let pos = Position::from_fen(fen).unwrap();
            let mirrored = pos.mirror();
            for eval in [
                &MaterialEval as &dyn Evaluate,
                &TableEval as &dyn Evaluate,
            ] {
                assert_eq!(
                    eval.evaluate(&mirrored),
                    -eval.evaluate(&pos),
                    "mirror of {}",
                    fen,
                );
            }
        }
    }
}
