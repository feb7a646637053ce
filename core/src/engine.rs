use crate::*;

/// Points for every non-empty cell a match removes.
pub const MATCH_POINTS: Score = 50;

/// Upper bound on remove/refill passes for one move. Natural play exhausts
/// long before this; reaching it means the source keeps refilling runs.
pub const MAX_CASCADE_PASSES: u32 = 1024;

/// Result of a swap that matched, with every cascade already settled.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub board: Board,
    pub score_delta: Score,
    /// Remove/gravity/refill passes, at least 1.
    pub passes: u32,
    pub cleared: CellCount,
    /// Matches produced directly by the swap, before any cascade.
    pub initial_matches: MatchSet,
}

/// Swaps `from` and `to` on a copy of `board` and resolves the cascade.
///
/// Returns `Ok(None)` when the swap matches nothing; `board` itself is never
/// touched. Adjacency is not checked here. Vacated cells are refilled in
/// `refill` mode.
pub fn resolve_swap(
    board: &Board,
    from: Coord2,
    to: Coord2,
    source: &mut dyn PieceSource,
    refill: SpawnMode,
) -> Result<Option<Resolution>> {
    let mut swapped = board.clone();
    swapped.swap(from, to)?;

    let matches = find_matches(&swapped);
    if matches.is_empty() {
        log::trace!("Swap {from:?} <-> {to:?} matched nothing");
        return Ok(None);
    }

    Ok(Some(cascade(swapped, matches, source, refill)))
}

/// Removes `matches`, applies gravity and refill, and repeats while the
/// refilled board keeps matching.
pub fn cascade(
    mut board: Board,
    matches: MatchSet,
    source: &mut dyn PieceSource,
    refill: SpawnMode,
) -> Resolution {
    let initial_matches = matches.clone();
    let mut matches = matches;
    let mut score_delta: Score = 0;
    let mut cleared: CellCount = 0;
    let mut passes = 0;

    while !matches.is_empty() {
        if passes >= MAX_CASCADE_PASSES {
            log::warn!("Cascade stopped after {passes} passes with matches still on the board");
            break;
        }
        passes += 1;

        let removed = remove_matches(&mut board, &matches);
        cleared = cleared.saturating_add(removed);
        score_delta = score_delta.saturating_add(Score::from(removed) * MATCH_POINTS);
        board.apply_gravity(source, refill);
        log::trace!("Cascade pass {passes}: removed {removed} cells");

        matches = find_matches(&board);
    }

    Resolution {
        board,
        score_delta,
        passes,
        cleared,
        initial_matches,
    }
}

/// Empties every matched cell, returning how many held a piece.
pub fn remove_matches(board: &mut Board, matches: &MatchSet) -> CellCount {
    matches
        .iter()
        .filter(|&coords| board.clear(coords))
        .count()
        .try_into()
        .unwrap_or(CellCount::MAX)
}
