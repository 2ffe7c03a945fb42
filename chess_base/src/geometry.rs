use crate::types::{CastlingSide, Color, File, Rank, Square};

// Step tables are (file, rank) deltas for use with `Square::shift`.
pub const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub const KING_DELTAS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub const BISHOP_DIRS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub const ROOK_DIRS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[inline]
pub const fn back_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

#[inline]
pub const fn pawn_home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

#[inline]
pub const fn promote_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R7,
        Color::Black => Rank::R2,
    }
}

#[inline]
pub const fn double_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R4,
        Color::Black => Rank::R5,
    }
}

// Rank of the square skipped by a double push of color `c`, i.e. the rank an
// en-passant target sits on after `c` has pushed.
#[inline]
pub const fn enpassant_skip_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R3,
        Color::Black => Rank::R6,
    }
}

// Rank where pawns of color `c` must stand to take en-passant.
#[inline]
pub const fn enpassant_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R5,
        Color::Black => Rank::R4,
    }
}

#[inline]
pub const fn pawn_forward(c: Color) -> isize {
    match c {
        Color::White => 1,
        Color::Black => -1,
    }
}

#[inline]
pub const fn king_home(c: Color) -> Square {
    Square::from_parts(File::E, back_rank(c))
}

#[inline]
pub const fn rook_home(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::Queen => File::A,
        CastlingSide::King => File::H,
    };
    Square::from_parts(file, back_rank(c))
}

#[inline]
pub const fn castle_king_dst(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::Queen => File::C,
        CastlingSide::King => File::G,
    };
    Square::from_parts(file, back_rank(c))
}

#[inline]
pub const fn castle_rook_dst(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::Queen => File::D,
        CastlingSide::King => File::F,
    };
    Square::from_parts(file, back_rank(c))
}
