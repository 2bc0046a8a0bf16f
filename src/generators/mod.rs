pub mod backtracker;

use crate::grids::block_grid::{BlockGrid, BlockId};

/// What a single generation step changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// walk entered the grid here
    Entered(BlockId),
    /// carved forward into an unoccupied block
    Visited { from: BlockId, to: BlockId },
    /// dead end, rewound to an earlier block on the path
    Backtracked { from: BlockId, to: BlockId },
    /// nowhere left to go
    Finished { last: Option<BlockId> },
    /// already finished, nothing happened
    Idle,
}

impl Step {
    /// Blocks whose drawing is stale after this step, old position first.
    pub fn redraws(&self) -> Vec<BlockId> {
        match *self {
            Step::Entered(to) => vec![to],
            Step::Visited { from, to } | Step::Backtracked { from, to } => vec![from, to],
            Step::Finished { last } => last.into_iter().collect(),
            Step::Idle => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Finished,
}

pub trait Generator {
    fn step_generation(&mut self) -> Step;
    /// Runs up to `steps` steps, stopping early once done. Returns the blocks to redraw.
    fn next_step(&mut self, steps: usize) -> Vec<BlockId>;
    /// Runs until done, returns how many steps it took.
    fn generate_maze(&mut self) -> usize;
    /// Forces the entry block of a run that has not started yet.
    fn start_at(&mut self, id: BlockId) -> Step;
    fn is_done(&self) -> bool;
    fn state(&self) -> RunState;
    fn current(&self) -> Option<BlockId>;
    #[cfg(test)]
    fn history(&self) -> &[BlockId];
    fn grid(&self) -> &BlockGrid;
}
