pub mod block_grid;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub columns: usize,
    pub rows: usize,
}

impl Dimensions {
    #[inline]
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    #[inline]
    pub fn index_of(&self, x: usize, y: usize) -> usize {
        (self.columns * y) + x
    }

    #[inline]
    pub fn coords_of(&self, index: usize) -> (usize, usize) {
        (index % self.columns, index / self.columns)
    }
}

/// Neighbor directions, in the order neighbor lists are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    Empty { columns: usize, rows: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::Empty { columns, rows } => write!(
                f,
                "grid needs at least one block, got {} x {}",
                columns, rows
            ),
        }
    }
}

impl std::error::Error for GridError {}
