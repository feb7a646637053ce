use blitz_core::*;
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SIZES: [Coord; 3] = [7, 16, 32];

fn bench_find_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_matches");
    for size in SIZES {
        let mut source = RandomPieceSource::new(size.into());
        let board = generate_board(size, &mut source, SpawnMode::NormalOnly).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &board, |b, board| {
            b.iter(|| find_matches(black_box(board)))
        });
    }
    group.finish();
}

/// First swap on the board that matches something.
fn matching_swap(board: &Board) -> Option<(Coord2, Coord2)> {
    let size = board.size();
    board.iter_coords().find_map(|(row, col)| {
        [(row, col + 1), (row + 1, col)]
            .into_iter()
            .filter(|&(r, c)| r < size && c < size)
            .find(|&to| {
                let mut swapped = board.clone();
                swapped.swap((row, col), to).is_ok() && !find_matches(&swapped).is_empty()
            })
            .map(|to| ((row, col), to))
    })
}

fn bench_resolve_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_swap");
    for size in SIZES {
        let mut source = RandomPieceSource::new(u64::from(size) + 1);
        let board = generate_board(size, &mut source, SpawnMode::NormalOnly).unwrap();
        let Some((from, to)) = matching_swap(&board) else {
            continue;
        };
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter_batched(
                || RandomPieceSource::new(7),
                |mut source| {
                    resolve_swap(
                        black_box(&board),
                        from,
                        to,
                        &mut source,
                        SpawnMode::NormalOnly,
                    )
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_session_playthrough(c: &mut Criterion) {
    let level = Level::new(1, "Bench Brunch", "Score points", Score::MAX, 50, &[]);
    c.bench_function("session_50_moves", |b| {
        b.iter_batched(
            || GameSession::with_seed(level.clone(), 11).unwrap(),
            |mut session| {
                while session.status().is_playing() {
                    let Some((from, to)) = matching_swap(session.board()) else {
                        break;
                    };
                    session.make_move(from, to).unwrap();
                }
                session.score()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_find_matches, bench_resolve_swap, bench_session_playthrough);
criterion_main!(benches);
