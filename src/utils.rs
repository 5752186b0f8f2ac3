// Square sets, bit iteration and precomputed step tables for move generation

use serde::{Deserialize, Serialize};

use crate::board::Position;

// Rank masks (row 0 is White's back rank)
pub const ROW_0: u64 = 0x00000000000000FF;
pub const ROW_1: u64 = 0x000000000000FF00;
pub const ROW_6: u64 = 0x00FF000000000000;
pub const ROW_7: u64 = 0xFF00000000000000;

// Direction deltas as (row, col) pairs for sliding pieces
pub const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

// Bit operations
#[inline]
pub fn pop_lsb(bb: &mut u64) -> Option<usize> {
    if *bb == 0 {
        return None;
    }
    let lsb = bb.trailing_zeros() as usize;
    *bb &= *bb - 1;
    Some(lsb)
}

pub struct BitIter {
    bb: u64,
}
impl Iterator for BitIter {
    type Item = Position;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        pop_lsb(&mut self.bb).map(Position::from_index)
    }
}
#[inline]
pub fn iter_bits(bb: u64) -> BitIter {
    BitIter { bb }
}

/// A set of board positions, one bit per square.
///
/// Iteration order is ascending square index (row-major from "00").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareSet(u64);

impl SquareSet {
    pub const EMPTY: SquareSet = SquareSet(0);

    pub const fn from_bits(bits: u64) -> Self {
        SquareSet(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn insert(&mut self, pos: Position) {
        self.0 |= 1u64 << pos.index();
    }

    #[inline]
    pub fn remove(&mut self, pos: Position) {
        self.0 &= !(1u64 << pos.index());
    }

    #[inline]
    pub fn contains(self, pos: Position) -> bool {
        self.0 & (1u64 << pos.index()) != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 | other.0)
    }

    pub fn difference(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 & !other.0)
    }

    pub fn iter(self) -> BitIter {
        iter_bits(self.0)
    }
}

impl IntoIterator for SquareSet {
    type Item = Position;
    type IntoIter = BitIter;
    fn into_iter(self) -> BitIter {
        self.iter()
    }
}

impl FromIterator<Position> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut set = SquareSet::EMPTY;
        for pos in iter {
            set.insert(pos);
        }
        set
    }
}

impl std::ops::BitOr for SquareSet {
    type Output = SquareSet;
    fn bitor(self, rhs: SquareSet) -> SquareSet {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: SquareSet) {
        self.0 |= rhs.0;
    }
}

// Precomputed step tables using OnceLock for thread safety
use std::sync::OnceLock;

static KNIGHT_STEPS: OnceLock<[u64; 64]> = OnceLock::new();
static KING_STEPS: OnceLock<[u64; 64]> = OnceLock::new();

fn step_table(offsets: &[(i8, i8); 8]) -> [u64; 64] {
    let mut table = [0u64; 64];
    for (sq, mask) in table.iter_mut().enumerate() {
        let from = Position::from_index(sq);
        for &(dr, dc) in offsets {
            if let Some(to) = from.offset(dr, dc) {
                *mask |= 1u64 << to.index();
            }
        }
    }
    table
}

fn init_knight_steps() -> [u64; 64] {
    const KNIGHT_OFFSETS: [(i8, i8); 8] = [
        (2, 1),
        (2, -1),
        (-2, 1),
        (-2, -1),
        (1, 2),
        (1, -2),
        (-1, 2),
        (-1, -2),
    ];
    step_table(&KNIGHT_OFFSETS)
}

fn init_king_steps() -> [u64; 64] {
    const KING_OFFSETS: [(i8, i8); 8] = [
        (1, 1),
        (1, 0),
        (1, -1),
        (0, 1),
        (0, -1),
        (-1, 1),
        (-1, 0),
        (-1, -1),
    ];
    step_table(&KING_OFFSETS)
}

#[inline(always)]
pub fn init_step_tables() {
    KNIGHT_STEPS.get_or_init(init_knight_steps);
    KING_STEPS.get_or_init(init_king_steps);
}

#[inline]
pub fn knight_steps(from: Position) -> SquareSet {
    SquareSet(KNIGHT_STEPS.get_or_init(init_knight_steps)[from.index()])
}

#[inline]
pub fn king_steps(from: Position) -> SquareSet {
    SquareSet(KING_STEPS.get_or_init(init_king_steps)[from.index()])
}
