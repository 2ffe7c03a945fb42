use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skua::{
    eval::{Evaluate, TableEval},
    movegen::{self, legal, semilegal},
    moves, Color, Position, Square,
};

const POSITIONS: [(&str, &str); 6] = [
    (
        "initial",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    ),
    (
        "kiwipete",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ),
    ("endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
    (
        "closed",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    ),
    (
        "promotions",
        "8/PPPPPPPP/8/2k1K3/8/8/pppppppp/8 w - - 0 1",
    ),
    ("max", "3Q4/1Q4Q1/4Q3/2Q4R/Q4Q2/3Q4/NR4Q1/kN1BB1K1 w - - 0 1"),
];

fn positions() -> impl Iterator<Item = (&'static str, Position)> {
    POSITIONS
        .iter()
        .map(|&(name, fen)| (name, Position::from_fen(fen).unwrap()))
}

fn bench_gen_semilegal(c: &mut Criterion) {
    let mut group = c.benchmark_group("gen_semilegal");
    for (name, pos) in positions() {
        group.bench_function(name, |b| {
            b.iter(|| black_box(semilegal::gen_all(&pos).len()))
        });
    }
}

fn bench_gen_legal(c: &mut Criterion) {
    let mut group = c.benchmark_group("gen_legal");
    for (name, pos) in positions() {
        group.bench_function(name, |b| b.iter(|| black_box(legal::gen_all(&pos).len())));
    }
}

fn bench_make_unmake(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_unmake");
    for (name, mut pos) in positions() {
        let list = semilegal::gen_all(&pos);
        group.bench_function(name, |b| {
            b.iter(|| {
                for mv in &list {
                    let undo = moves::make_move_unchecked(&mut pos, *mv);
                    moves::unmake_move_unchecked(&mut pos, *mv, undo);
                }
            })
        });
    }
}

fn bench_is_attacked(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_attacked");
    for (name, pos) in positions() {
        group.bench_function(name, |b| {
            b.iter(|| {
                for color in [Color::White, Color::Black] {
                    for sq in Square::iter() {
                        black_box(movegen::is_square_attacked(&pos, sq, color));
                    }
                }
            })
        });
    }
}

fn bench_has_legal_moves(c: &mut Criterion) {
    let mut group = c.benchmark_group("has_legal_moves");
    for (name, pos) in positions() {
        group.bench_function(name, |b| b.iter(|| black_box(movegen::has_legal_moves(&pos))));
    }
}

fn bench_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval");
    for (name, pos) in positions() {
        group.bench_function(name, |b| b.iter(|| black_box(TableEval.evaluate(&pos))));
    }
}

criterion_group!(
    skua,
    bench_gen_semilegal,
    bench_gen_legal,
    bench_make_unmake,
    bench_is_attacked,
    bench_has_legal_moves,
    bench_eval,
);

criterion_main!(skua);
