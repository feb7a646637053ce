use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Shortest line of equal kinds that counts as a match.
pub const MIN_RUN_LEN: Coord = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// A maximal line of at least [`MIN_RUN_LEN`] equal, non-empty kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub kind: PieceKind,
    pub axis: Axis,
    pub start: Coord2,
    pub len: Coord,
}

impl Run {
    pub fn cells(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (row, col) = self.start;
        let axis = self.axis;
        (0..self.len).map(move |offset| match axis {
            Axis::Horizontal => (row, col + offset),
            Axis::Vertical => (row + offset, col),
        })
    }
}

/// Result of one scan. Cells shared by a horizontal and a vertical run are
/// stored once, so `len()` is the number of distinct matched cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchSet {
    cells: BTreeSet<Coord2>,
    runs: Vec<Run>,
}

impl MatchSet {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells.contains(&coords)
    }

    /// Matched cells in `(row, col)` order.
    pub fn iter(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.cells.iter().copied()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    fn push(&mut self, run: Run) {
        self.cells.extend(run.cells());
        self.runs.push(run);
    }
}

/// Scans every row left to right, then every column top to bottom, for runs.
pub fn find_matches(board: &Board) -> MatchSet {
    let size = board.size();
    let mut matches = MatchSet::default();
    for row in 0..size {
        scan_line(board, Axis::Horizontal, row, &mut matches);
    }
    for col in 0..size {
        scan_line(board, Axis::Vertical, col, &mut matches);
    }
    matches
}

fn scan_line(board: &Board, axis: Axis, line: Coord, matches: &mut MatchSet) {
    let size = board.size();
    let at = |i: Coord| match axis {
        Axis::Horizontal => (line, i),
        Axis::Vertical => (i, line),
    };

    let mut run_start: Coord = 0;
    let mut run_kind = board.kind_at(at(0));
    for i in 1..=size {
        let next = (i < size).then(|| board.kind_at(at(i)));
        if next == Some(run_kind) && !run_kind.is_empty() {
            continue;
        }

        let len = i - run_start;
        if len >= MIN_RUN_LEN && !run_kind.is_empty() {
            matches.push(Run {
                kind: run_kind,
                axis,
                start: at(run_start),
                len,
            });
        }

        if let Some(kind) = next {
            run_start = i;
            run_kind = kind;
        }
    }
}
