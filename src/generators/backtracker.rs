use crate::generators::{Generator, RunState, Step};
use crate::grids::block_grid::{BlockGrid, BlockId};
use log::{debug, info, trace};
use rand::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Choice {
    Entry(BlockId),
    Forward(BlockId),
    Back(BlockId),
}

impl Choice {
    fn block(self) -> BlockId {
        match self {
            Choice::Entry(id) | Choice::Forward(id) | Choice::Back(id) => id,
        }
    }
}

/// Randomized depth first carving with an explicit history stack.
///
/// Each call to [`Generator::step_generation`] moves the walk by exactly one block, so a
/// driver can interleave steps with drawing. On a dead end the history is popped twice:
/// the dead end itself, then its predecessor, which becomes the new current block and is
/// pushed back on. An exhausted stack ends the run.
pub struct Backtracker<R> {
    grid: BlockGrid,
    rng: R,
    current: Option<BlockId>,
    history: Vec<BlockId>,
    steps: usize,
    pub done: bool,
}

impl<R: Rng> Backtracker<R> {
    pub fn new(grid: BlockGrid, rng: R) -> Self {
        Self {
            grid,
            rng,
            current: None,
            history: Vec::new(),
            steps: 0,
            done: false,
        }
    }

    fn choose_block(&mut self) -> Option<Choice> {
        let current = match self.current {
            Some(current) => current,
            None => {
                let x = self.rng.gen_range(0..self.grid.dims.columns);
                let y = self.rng.gen_range(0..self.grid.dims.rows);
                return Some(Choice::Entry(self.grid.dims.index_of(x, y)));
            }
        };

        let available = self.grid.available_neighbors(current);
        if let Some(next) = available.choose(&mut self.rng) {
            return Some(Choice::Forward(*next));
        }

        // drop the dead end, then resume from whatever was under it
        self.pop_history();
        self.pop_history().map(Choice::Back)
    }

    fn pop_history(&mut self) -> Option<BlockId> {
        let id = self.history.pop()?;
        self.grid.block_mut(id).in_history = false;
        Some(id)
    }

    fn advance(&mut self, old: Option<BlockId>, next: BlockId) {
        self.current = Some(next);

        let block = self.grid.block_mut(next);
        block.occupied = true;
        if !block.in_history {
            block.in_history = true;
            self.history.push(next);
        }

        if let Some(old) = old {
            // a block is parented once, and never by a block it is already linked to
            if !self.grid.connected(old, next) && self.grid.block(next).parent().is_none() {
                self.grid.connect(old, next);
            }
        }
    }
}

impl<R: Rng> Generator for Backtracker<R> {
    fn step_generation(&mut self) -> Step {
        if self.done {
            return Step::Idle;
        }

        let old = self.current;
        let choice = match self.choose_block() {
            Some(choice) => choice,
            None => {
                self.steps += 1;
                self.current = None;
                self.done = true;
                info!(
                    "maze of {} blocks finished after {} steps",
                    self.grid.len(),
                    self.steps
                );
                return Step::Finished { last: old };
            }
        };

        self.advance(old, choice.block());
        self.steps += 1;

        let step = match (old, choice) {
            (Some(from), Choice::Forward(to)) => Step::Visited { from, to },
            (Some(from), Choice::Back(to)) => Step::Backtracked { from, to },
            (_, choice) => {
                let (x, y) = self.grid.dims.coords_of(choice.block());
                debug!("walk entered at ({}, {})", x, y);
                Step::Entered(choice.block())
            }
        };
        trace!("{:?}, history depth {}", step, self.history.len());

        step
    }

    fn next_step(&mut self, steps: usize) -> Vec<BlockId> {
        let mut dirty = Vec::new();
        for _ in 0..steps {
            if self.done {
                break;
            }
            dirty.extend(self.step_generation().redraws());
        }

        dirty
    }

    fn generate_maze(&mut self) -> usize {
        let mut count = 0;
        while !self.done {
            self.step_generation();
            count += 1;
        }

        count
    }

    fn start_at(&mut self, id: BlockId) -> Step {
        if self.state() != RunState::NotStarted {
            debug!("ignoring forced entry at block {}, run already started", id);
            return Step::Idle;
        }

        let (x, y) = self.grid.dims.coords_of(id);
        debug!("walk forced to enter at ({}, {})", x, y);
        self.advance(None, id);
        self.steps += 1;

        Step::Entered(id)
    }

    fn is_done(&self) -> bool {
        self.done
    }

    fn state(&self) -> RunState {
        if self.done {
            RunState::Finished
        } else if self.current.is_none() {
            RunState::NotStarted
        } else {
            RunState::Running
        }
    }

    fn current(&self) -> Option<BlockId> {
        self.current
    }

    #[cfg(test)]
    fn history(&self) -> &[BlockId] {
        &self.history
    }

    fn grid(&self) -> &BlockGrid {
        &self.grid
    }
}

#[cfg(test)]
mod test_backtracker {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(columns: usize, rows: usize, seed: u64) -> Backtracker<StdRng> {
        let grid = BlockGrid::with_dims(columns, rows).unwrap();
        Backtracker::new(grid, StdRng::seed_from_u64(seed))
    }

    fn entered(step: Step) -> BlockId {
        match step {
            Step::Entered(id) => id,
            other => panic!("expected the walk to enter, got {:?}", other),
        }
    }

    fn assert_spanning_tree(grid: &BlockGrid, entry: BlockId) {
        for (id, block) in grid.blocks().iter().enumerate() {
            assert!(block.occupied, "block {} never visited", id);
            assert!(!block.in_history);

            match block.parent() {
                None => assert_eq!(id, entry, "only the entry may be parentless"),
                Some(parent) => {
                    assert!(grid.neighbors(id).contains(&parent));
                    assert!(grid.block(parent).has_child(id));
                }
            }
            for child in block.children() {
                assert_eq!(grid.block(*child).parent(), Some(id));
            }
        }

        let mut seen = vec![false; grid.len()];
        let mut stack = vec![entry];
        let mut count = 0;
        while let Some(id) = stack.pop() {
            assert!(!seen[id], "block {} reached twice", id);
            seen[id] = true;
            count += 1;
            stack.extend_from_slice(grid.block(id).children());
        }
        assert_eq!(count, grid.len());
    }

    #[test]
    fn carves_a_spanning_tree() {
        for &(columns, rows) in &[(1, 1), (1, 6), (6, 1), (7, 3), (12, 12)] {
            for seed in 0..8 {
                let mut gen = seeded(columns, rows, seed);
                let entry = entered(gen.step_generation());
                gen.generate_maze();

                assert_eq!(gen.state(), RunState::Finished);
                assert_eq!(gen.current(), None);
                assert!(gen.history().is_empty());
                assert_spanning_tree(gen.grid(), entry);
            }
        }
    }

    #[test]
    fn terminates_in_two_steps_per_block() {
        for seed in 0..8 {
            let mut gen = seeded(9, 5, seed);
            assert_eq!(gen.generate_maze(), 2 * 9 * 5);
            assert!(gen.is_done());
        }
    }

    #[test]
    fn available_neighbors_are_never_occupied() {
        let mut gen = seeded(6, 6, 42);

        while !gen.is_done() {
            gen.step_generation();
            let grid = gen.grid();
            for id in 0..grid.len() {
                assert!(grid
                    .available_neighbors(id)
                    .iter()
                    .all(|n| !grid.block(*n).occupied));
            }
        }
    }

    #[test]
    fn history_flags_track_the_stack() {
        let mut gen = seeded(5, 4, 3);

        while !gen.is_done() {
            gen.step_generation();
            let grid = gen.grid();
            let history = gen.history();

            let flagged: Vec<BlockId> = (0..grid.len())
                .filter(|id| grid.block(*id).in_history)
                .collect();
            let mut sorted = history.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), history.len(), "duplicate history entry");
            assert_eq!(sorted, flagged);

            if !gen.is_done() {
                assert_eq!(gen.current(), history.last().copied());
            }
        }
    }

    #[test]
    fn single_block_enters_then_finishes() {
        let mut gen = seeded(1, 1, 0);

        assert_eq!(gen.state(), RunState::NotStarted);
        assert_eq!(gen.step_generation(), Step::Entered(0));
        assert_eq!(gen.state(), RunState::Running);
        assert_eq!(gen.step_generation(), Step::Finished { last: Some(0) });
        assert_eq!(gen.state(), RunState::Finished);
        assert_eq!(gen.step_generation(), Step::Idle);
        assert_eq!(gen.grid().block(0).parent(), None);
    }

    #[test]
    fn dead_end_pops_twice() {
        let mut gen = seeded(3, 1, 11);
        let middle = gen.grid().index_of(1, 0).unwrap();

        assert_eq!(gen.start_at(middle), Step::Entered(middle));
        assert_eq!(gen.history(), &[middle]);

        let first = match gen.step_generation() {
            Step::Visited { from, to } => {
                assert_eq!(from, middle);
                to
            }
            other => panic!("expected a visit, got {:?}", other),
        };
        let second = if first == 0 { 2 } else { 0 };
        assert_eq!(gen.history(), &[middle, first]);

        // both entries popped, the middle comes back as current and is pushed again
        assert_eq!(
            gen.step_generation(),
            Step::Backtracked {
                from: first,
                to: middle
            }
        );
        assert_eq!(gen.history(), &[middle]);
        assert!(!gen.grid().block(first).in_history);

        assert_eq!(
            gen.step_generation(),
            Step::Visited {
                from: middle,
                to: second
            }
        );
        assert_eq!(
            gen.step_generation(),
            Step::Backtracked {
                from: second,
                to: middle
            }
        );

        // the middle is exhausted and nothing lies under it
        assert_eq!(
            gen.step_generation(),
            Step::Finished { last: Some(middle) }
        );
        assert!(gen.is_done());
        assert!(gen.history().is_empty());
        assert_eq!(gen.current(), None);

        let grid = gen.grid();
        assert_eq!(grid.block(middle).parent(), None);
        assert_eq!(grid.block(first).parent(), Some(middle));
        assert_eq!(grid.block(second).parent(), Some(middle));
        assert!(!grid.block(middle).in_history);
    }

    #[test]
    fn backtracking_never_links_blocks() {
        let mut gen = seeded(8, 8, 5);

        while !gen.is_done() {
            let edges_before: usize = gen
                .grid()
                .blocks()
                .iter()
                .map(|b| b.children().len())
                .sum();
            let step = gen.step_generation();
            let edges_after: usize = gen
                .grid()
                .blocks()
                .iter()
                .map(|b| b.children().len())
                .sum();

            match step {
                Step::Visited { from, to } => {
                    assert_eq!(edges_after, edges_before + 1);
                    assert_eq!(gen.grid().block(to).parent(), Some(from));
                }
                _ => assert_eq!(edges_after, edges_before),
            }
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let parents = |seed| {
            let mut gen = seeded(10, 7, seed);
            gen.generate_maze();
            gen.grid()
                .blocks()
                .iter()
                .map(|b| b.parent())
                .collect::<Vec<_>>()
        };

        assert_eq!(parents(99), parents(99));
    }

    #[test]
    fn next_step_batches_and_stops_when_done() {
        let mut gen = seeded(4, 4, 8);

        let dirty = gen.next_step(3);
        assert_eq!(dirty.len(), 5);
        assert_eq!(Some(dirty[4]), gen.current());

        let rest = gen.next_step(1000);
        assert!(gen.is_done());
        assert!(!rest.is_empty());
        assert!(gen.next_step(10).is_empty());
    }

    #[test]
    fn forced_entry_only_before_start() {
        let mut gen = seeded(3, 3, 1);
        let corner = gen.grid().index_of(2, 2).unwrap();

        assert_eq!(gen.start_at(corner), Step::Entered(corner));
        assert_eq!(gen.current(), Some(corner));
        assert_eq!(gen.start_at(0), Step::Idle);
        assert_eq!(gen.current(), Some(corner));

        gen.generate_maze();
        assert_spanning_tree(gen.grid(), corner);
    }

    #[test]
    fn redraws_put_old_position_first() {
        assert_eq!(Step::Entered(3).redraws(), vec![3]);
        assert_eq!(Step::Visited { from: 1, to: 2 }.redraws(), vec![1, 2]);
        assert_eq!(Step::Backtracked { from: 2, to: 1 }.redraws(), vec![2, 1]);
        assert_eq!(Step::Finished { last: Some(4) }.redraws(), vec![4]);
        assert!(Step::Finished { last: None }.redraws().is_empty());
        assert!(Step::Idle.redraws().is_empty());
    }
}
