//! Move generation.
//!
//! The generator produces either semilegal moves (obeying the movement rules
//! but possibly leaving the own king under attack) or strictly legal ones.
//! Semilegal generation plus [`moves::try_make_move_unchecked`] is the faster
//! path for tree searches, while [`legal::gen_all`] is the convenient one.

use crate::geometry;
use crate::moves::{self, Move, MoveKind};
use crate::position::Position;
use crate::types::{CastlingSide, Color, File, Piece, PieceKind, Square};

use std::convert::Infallible;
use std::ops::{Deref, DerefMut};

use arrayvec::ArrayVec;

fn first_piece_on_ray(pos: &Position, from: Square, df: isize, dr: isize) -> Option<Piece> {
    let mut cur = from.shift(df, dr);
    while let Some(sq) = cur {
        if let Some(piece) = pos.get(sq) {
            return Some(piece);
        }
        cur = sq.shift(df, dr);
    }
    None
}

/// Returns `true` if `sq` is attacked by any piece of color `by`.
pub fn is_square_attacked(pos: &Position, sq: Square, by: Color) -> bool {
    for &(df, dr) in &geometry::KNIGHT_DELTAS {
        if let Some(src) = sq.shift(df, dr) {
            if pos.get(src) == Some(Piece::new(by, PieceKind::Knight)) {
                return true;
            }
        }
    }
    for &(df, dr) in &geometry::KING_DELTAS {
        if let Some(src) = sq.shift(df, dr) {
            if pos.get(src) == Some(Piece::new(by, PieceKind::King)) {
                return true;
            }
        }
    }
    // Trace pawn attacks backwards from the attacked square.
    for df in [-1, 1] {
        if let Some(src) = sq.shift(df, -geometry::pawn_forward(by)) {
            if pos.get(src) == Some(Piece::new(by, PieceKind::Pawn)) {
                return true;
            }
        }
    }
    for &(df, dr) in &geometry::BISHOP_DIRS {
        if let Some(piece) = first_piece_on_ray(pos, sq, df, dr) {
            if piece.color == by && matches!(piece.kind, PieceKind::Bishop | PieceKind::Queen) {
                return true;
            }
        }
    }
    for &(df, dr) in &geometry::ROOK_DIRS {
        if let Some(piece) = first_piece_on_ray(pos, sq, df, dr) {
            if piece.color == by && matches!(piece.kind, PieceKind::Rook | PieceKind::Queen) {
                return true;
            }
        }
    }
    false
}

fn ray_clear(pos: &Position, src: Square, dst: Square, df: isize, dr: isize) -> bool {
    let mut cur = src.shift(df, dr);
    while let Some(sq) = cur {
        if sq == dst {
            return true;
        }
        if pos.get(sq).is_some() {
            return false;
        }
        cur = sq.shift(df, dr);
    }
    false
}

/// Returns `true` if a non-pawn piece of kind `kind` standing on `src` can
/// move to `dst`, ignoring the contents of `dst` itself.
pub(crate) fn piece_reaches(pos: &Position, kind: PieceKind, src: Square, dst: Square) -> bool {
    let df = dst.file().index() as isize - src.file().index() as isize;
    let dr = dst.rank().index() as isize - src.rank().index() as isize;
    match kind {
        PieceKind::Knight => geometry::KNIGHT_DELTAS.contains(&(df, dr)),
        PieceKind::King => df.abs() <= 1 && dr.abs() <= 1 && (df, dr) != (0, 0),
        PieceKind::Bishop => {
            df.abs() == dr.abs() && df != 0 && ray_clear(pos, src, dst, df.signum(), dr.signum())
        }
        PieceKind::Rook => {
            (df == 0) != (dr == 0) && ray_clear(pos, src, dst, df.signum(), dr.signum())
        }
        PieceKind::Queen => {
            (df.abs() == dr.abs() || df == 0 || dr == 0)
                && (df, dr) != (0, 0)
                && ray_clear(pos, src, dst, df.signum(), dr.signum())
        }
        PieceKind::Pawn => false,
    }
}

/// Returns `true` if `side` can castle to `castle` side in `pos`, apart from
/// the king's destination square being attacked.
///
/// The destination square is deliberately not checked here, as the legality
/// filter catches it like any other move of the king into an attack.
pub(crate) fn can_castle(pos: &Position, side: Color, castle: CastlingSide) -> bool {
    if !pos.castling().has(side, castle) {
        return false;
    }
    let rank = geometry::back_rank(side);
    let empty_files: &[File] = match castle {
        CastlingSide::King => &[File::F, File::G],
        CastlingSide::Queen => &[File::B, File::C, File::D],
    };
    if empty_files
        .iter()
        .any(|&file| pos.get(Square::from_parts(file, rank)).is_some())
    {
        return false;
    }
    let enemy = side.inv();
    // The king must not castle out of or through a check.
    !is_square_attacked(pos, geometry::king_home(side), enemy)
        && !is_square_attacked(pos, geometry::castle_rook_dst(side, castle), enemy)
}

trait MaybeMovePush {
    type Err;

    fn push(&mut self, mv: Move) -> Result<(), Self::Err>;
}

/// Trait for sinks accepting generated moves.
pub trait MovePush {
    fn push(&mut self, mv: Move);
}

impl<P: MovePush> MaybeMovePush for P {
    type Err = Infallible;

    fn push(&mut self, mv: Move) -> Result<(), Infallible> {
        MovePush::push(self, mv);
        Ok(())
    }
}

/// Stack-allocated list of moves.
///
/// 256 slots are enough for any reachable position.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl MoveList {
    pub fn new() -> Self {
        MoveList(ArrayVec::new())
    }
}

impl Deref for MoveList {
    type Target = [Move];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = <ArrayVec<Move, 256> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl MovePush for MoveList {
    fn push(&mut self, mv: Move) {
        self.0.push(mv);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, mv: Move) {
        Vec::push(self, mv);
    }
}

struct LegalFilter<'a, P> {
    pos: Position,
    inner: &'a mut P,
}

impl<P: MaybeMovePush> MaybeMovePush for LegalFilter<'_, P> {
    type Err = P::Err;

    fn push(&mut self, mv: Move) -> Result<(), Self::Err> {
        let undo = moves::make_move_unchecked(&mut self.pos, mv);
        let legal = !self.pos.is_opponent_king_attacked();
        moves::unmake_move_unchecked(&mut self.pos, mv, undo);
        match legal {
            true => self.inner.push(mv),
            false => Ok(()),
        }
    }
}

/// Sink failing on the first accepted move, to detect whether any exists.
struct ErrOnFirst;

impl MaybeMovePush for ErrOnFirst {
    type Err = ();

    fn push(&mut self, _mv: Move) -> Result<(), ()> {
        Err(())
    }
}

struct MoveGen<'a, P> {
    pos: &'a Position,
    side: Color,
    dst: &'a mut P,
}

impl<'a, P: MaybeMovePush> MoveGen<'a, P> {
    fn new(pos: &'a Position, dst: &'a mut P) -> Self {
        MoveGen {
            pos,
            side: pos.side(),
            dst,
        }
    }

    fn add(&mut self, kind: MoveKind, src: Square, dst: Square) -> Result<(), P::Err> {
        self.dst.push(Move::new_unchecked(kind, src, dst))
    }

    fn add_pawn(&mut self, src: Square, dst: Square) -> Result<(), P::Err> {
        // A pawn reaching the last rank must promote.
        if dst.rank() == geometry::back_rank(self.side.inv()) {
            for piece in [
                PieceKind::Knight,
                PieceKind::Bishop,
                PieceKind::Rook,
                PieceKind::Queen,
            ] {
                self.add(MoveKind::Promote(piece), src, dst)?;
            }
            return Ok(());
        }
        self.add(MoveKind::PawnSingle, src, dst)
    }

    fn gen_pawn(&mut self, src: Square) -> Result<(), P::Err> {
        let forward = geometry::pawn_forward(self.side);
        if let Some(dst) = src.shift(0, forward) {
            if self.pos.get(dst).is_none() {
                self.add_pawn(src, dst)?;
                if src.rank() == geometry::pawn_home_rank(self.side) {
                    let dst2 = Square::from_parts(src.file(), geometry::double_dst_rank(self.side));
                    if self.pos.get(dst2).is_none() {
                        self.add(MoveKind::PawnDouble, src, dst2)?;
                    }
                }
            }
        }
        for df in [-1, 1] {
            if let Some(dst) = src.shift(df, forward) {
                if matches!(self.pos.get(dst), Some(piece) if piece.color != self.side) {
                    self.add_pawn(src, dst)?;
                }
            }
        }
        Ok(())
    }

    fn gen_enpassant(&mut self) -> Result<(), P::Err> {
        let target = match self.pos.ep_target() {
            Some(target) => target,
            None => return Ok(()),
        };
        let forward = geometry::pawn_forward(self.side);
        for df in [-1, 1] {
            if let Some(src) = target.shift(df, -forward) {
                if self.pos.get(src) == Some(Piece::new(self.side, PieceKind::Pawn)) {
                    self.add(MoveKind::EnPassant, src, target)?;
                }
            }
        }
        Ok(())
    }

    fn gen_steps(&mut self, src: Square, deltas: &[(isize, isize); 8]) -> Result<(), P::Err> {
        for &(df, dr) in deltas {
            if let Some(dst) = src.shift(df, dr) {
                if !matches!(self.pos.get(dst), Some(piece) if piece.color == self.side) {
                    self.add(MoveKind::Simple, src, dst)?;
                }
            }
        }
        Ok(())
    }

    fn gen_rays(&mut self, src: Square, dirs: &[(isize, isize); 4]) -> Result<(), P::Err> {
        for &(df, dr) in dirs {
            let mut cur = src.shift(df, dr);
            while let Some(dst) = cur {
                match self.pos.get(dst) {
                    None => {
                        self.add(MoveKind::Simple, src, dst)?;
                        cur = dst.shift(df, dr);
                    }
                    Some(piece) => {
                        if piece.color != self.side {
                            self.add(MoveKind::Simple, src, dst)?;
                        }
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn gen_castling(&mut self) -> Result<(), P::Err> {
        for castle in [CastlingSide::King, CastlingSide::Queen] {
            if can_castle(self.pos, self.side, castle) {
                self.add(
                    match castle {
                        CastlingSide::King => MoveKind::CastleKing,
                        CastlingSide::Queen => MoveKind::CastleQueen,
                    },
                    geometry::king_home(self.side),
                    geometry::castle_king_dst(self.side, castle),
                )?;
            }
        }
        Ok(())
    }

    fn gen_piece(&mut self, kind: PieceKind, src: Square) -> Result<(), P::Err> {
        match kind {
            PieceKind::Pawn => self.gen_pawn(src),
            PieceKind::Knight => self.gen_steps(src, &geometry::KNIGHT_DELTAS),
            PieceKind::King => self.gen_steps(src, &geometry::KING_DELTAS),
            PieceKind::Bishop => self.gen_rays(src, &geometry::BISHOP_DIRS),
            PieceKind::Rook => self.gen_rays(src, &geometry::ROOK_DIRS),
            PieceKind::Queen => {
                self.gen_rays(src, &geometry::BISHOP_DIRS)?;
                self.gen_rays(src, &geometry::ROOK_DIRS)
            }
        }
    }

    fn gen_all(&mut self) -> Result<(), P::Err> {
        for src in Square::iter() {
            if let Some(piece) = self.pos.get(src) {
                if piece.color == self.side {
                    self.gen_piece(piece.kind, src)?;
                }
            }
        }
        self.gen_enpassant()?;
        self.gen_castling()
    }

    fn gen_for_detect(&mut self) -> Result<(), P::Err> {
        // King steps first, as stepping away is the most common escape from
        // a check. Castling is skipped: it is never the only legal move,
        // since the king could also step to the rook destination square.
        self.gen_steps(self.pos.king_square(self.side), &geometry::KING_DELTAS)?;
        for src in Square::iter() {
            if let Some(piece) = self.pos.get(src) {
                if piece.color == self.side && piece.kind != PieceKind::King {
                    self.gen_piece(piece.kind, src)?;
                }
            }
        }
        self.gen_enpassant()
    }
}

/// Semilegal move generation.
///
/// The generated moves obey the movement rules but may leave the own king
/// under attack.
pub mod semilegal {
    use super::{MoveGen, MoveList, MovePush};
    use crate::position::Position;

    /// Generates all semilegal moves into `dst`.
    pub fn gen_all_into<P: MovePush>(pos: &Position, dst: &mut P) {
        let _ = MoveGen::new(pos, dst).gen_all();
    }

    /// Generates all semilegal moves.
    pub fn gen_all(pos: &Position) -> MoveList {
        let mut list = MoveList::new();
        gen_all_into(pos, &mut list);
        list
    }
}

/// Strictly legal move generation.
pub mod legal {
    use super::{LegalFilter, MoveGen, MoveList, MovePush};
    use crate::position::Position;

    /// Generates all legal moves into `dst`.
    pub fn gen_all_into<P: MovePush>(pos: &Position, dst: &mut P) {
        let mut filter = LegalFilter {
            pos: pos.clone(),
            inner: dst,
        };
        let _ = MoveGen::new(pos, &mut filter).gen_all();
    }

    /// Generates all legal moves.
    pub fn gen_all(pos: &Position) -> MoveList {
        let mut list = MoveList::new();
        gen_all_into(pos, &mut list);
        list
    }
}

/// Returns `true` if the side to move has at least one legal move.
///
/// Faster than generating all the moves, as it stops on the first one found.
pub fn has_legal_moves(pos: &Position) -> bool {
    let mut detect = ErrOnFirst;
    let mut filter = LegalFilter {
        pos: pos.clone(),
        inner: &mut detect,
    };
    MoveGen::new(pos, &mut filter).gen_for_detect().is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::{make_move_unchecked, unmake_move_unchecked, Uci};
    use std::collections::BTreeSet;

    fn legal_ucis(pos: &Position) -> BTreeSet<String> {
        legal::gen_all(pos).iter().map(Move::to_string).collect()
    }

    #[test]
    fn test_initial() {
        let pos = Position::initial();
        let moves = legal::gen_all(&pos);
        assert_eq!(moves.len(), 20);
        let ucis = legal_ucis(&pos);
        for uci in ["e2e4", "e2e3", "g1f3", "b1a3", "h2h4"] {
            assert!(ucis.contains(uci), "missing {}", uci);
        }
        assert!(!ucis.contains("e1g1"));

        let pos = pos.make_move(Uci("e2e4")).unwrap();
        assert_eq!(legal::gen_all(&pos).len(), 20);
    }

    #[test]
    fn test_enpassant_window() {
        let pos = Position::from_fen("4k3/8/8/8/4p3/8/3P4/4K3 w - - 0 1").unwrap();

        // Without a double push there is nothing to capture en passant.
        let alt = pos.make_move(Uci("e1d1")).unwrap();
        assert_eq!(alt.ep_target(), None);
        assert!(!legal_ucis(&alt).contains("e4d3"));
        assert!(legal_ucis(&alt).contains("e4e3"));

        let pos = pos.make_move(Uci("d2d4")).unwrap();
        assert_eq!(pos.ep_target().map(|sq| sq.to_string()), Some("d3".into()));
        assert!(legal_ucis(&pos).contains("e4d3"));

        // The window closes after any reply.
        let pos = pos.make_move(Uci("e8e7")).unwrap();
        let pos = pos.make_move(Uci("e1e2")).unwrap();
        assert_eq!(pos.ep_target(), None);
        assert!(!legal_ucis(&pos).contains("e4d3"));
    }

    #[test]
    fn test_castling() {
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let ucis = legal_ucis(&pos);
        assert!(ucis.contains("e1g1"));
        assert!(ucis.contains("e1c1"));

        // No castling through an attacked square.
        let pos = Position::from_fen("r3k2r/8/8/8/8/5r2/8/R3K2R w KQkq - 0 1").unwrap();
        let ucis = legal_ucis(&pos);
        assert!(!ucis.contains("e1g1"));
        assert!(ucis.contains("e1c1"));

        // No castling out of a check.
        let pos = Position::from_fen("r3k2r/8/8/8/8/4q3/8/R3K2R w KQkq - 0 1").unwrap();
        let ucis = legal_ucis(&pos);
        assert!(!ucis.contains("e1g1"));
        assert!(!ucis.contains("e1c1"));

        // No castling through pieces, but the b1 square may be attacked.
        let pos = Position::from_fen("r3k2r/8/8/8/8/8/8/RN2K1NR w KQkq - 0 1").unwrap();
        let ucis = legal_ucis(&pos);
        assert!(!ucis.contains("e1g1"));
        assert!(!ucis.contains("e1c1"));
        let pos = Position::from_fen("r3k2r/8/8/8/8/1r6/8/R3K2R w KQkq - 0 1").unwrap();
        assert!(legal_ucis(&pos).contains("e1c1"));
    }

    #[test]
    fn test_has_legal_moves() {
        let pos = Position::initial();
        assert!(has_legal_moves(&pos));
        // Checkmate.
        let pos = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        assert!(!has_legal_moves(&pos));
        // Stalemate.
        let pos = Position::from_fen("7K/8/5n2/5n2/8/8/7k/8 w - - 0 1").unwrap();
        assert!(!has_legal_moves(&pos));
    }

    fn perft(pos: &mut Position, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = legal::gen_all(pos);
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut result = 0;
        for mv in &moves {
            let undo = make_move_unchecked(pos, *mv);
            result += perft(pos, depth - 1);
            unmake_move_unchecked(pos, *mv, undo);
        }
        result
    }

    fn assert_perft(fen: &str, expected: &[u64]) {
        let mut pos = Position::from_fen(fen).unwrap();
        for (depth, &count) in expected.iter().enumerate() {
            assert_eq!(
                perft(&mut pos, depth + 1),
                count,
                "perft({}) for {}",
                depth + 1,
                fen,
            );
        }
        assert_eq!(pos.as_fen(), fen);
    }

    #[test]
    fn test_perft_initial() {
        assert_perft(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            &[20, 400, 8902, 197_281],
        );
    }

    #[test]
    fn test_perft_positions() {
        assert_perft(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            &[48, 2039, 97_862],
        );
        assert_perft("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", &[14, 191, 2812, 43_238]);
        assert_perft(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PR/R2Q1RK1 w kq - 0 1",
            &[6, 264, 9467],
        );
        assert_perft(
            "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
            &[44, 1486, 62_379],
        );
        assert_perft(
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
            &[46, 2079, 89_890],
        );
    }

    #[test]
    fn test_semilegal_superset() {
        let pos = Position::from_fen("4k3/8/8/8/8/4r3/4N3/4K3 w - - 0 1").unwrap();
        let semi = semilegal::gen_all(&pos);
        let legal = legal::gen_all(&pos);
        assert!(legal.len() < semi.len());
        for mv in &legal {
            assert!(semi.contains(mv));
        }
        // All knight moves are semilegal but illegal due to the pin.
        for mv in &semi {
            assert_eq!(mv.validate(&pos).is_ok(), legal.contains(mv));
        }
    }
}
