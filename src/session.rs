use std::time::Instant;

use log::{debug, info};
use rand::prelude::*;

use crate::canvas::{Canvas, Layout};
use crate::config::Config;
use crate::generators::backtracker::Backtracker;
use crate::generators::Generator;
use crate::grids::block_grid::BlockGrid;
use crate::grids::GridError;
use crate::renderer::Vertex;

/// One animated maze run, plus the clock that paces it.
pub struct Session {
    config: Config,
    pub maze_generator: Box<dyn Generator>,
    canvas: Canvas,
    next_tick: Instant,
    paused: bool,
    runs: u64,
    seed: u64,
}

impl Session {
    pub fn new(config: Config, now: Instant) -> Result<Self, GridError> {
        let (maze_generator, canvas, seed) = new_run(&config, 0)?;

        Ok(Self {
            config,
            maze_generator,
            canvas,
            next_tick: now,
            paused: false,
            runs: 0,
            seed,
        })
    }

    /// Throws the current maze away and starts carving a new one right away.
    pub fn restart(&mut self, now: Instant) -> Result<(), GridError> {
        self.runs += 1;
        let (maze_generator, canvas, seed) = new_run(&self.config, self.runs)?;
        debug!("restarting, run {}", self.runs);

        self.maze_generator = maze_generator;
        self.canvas = canvas;
        self.seed = seed;
        self.next_tick = now;
        Ok(())
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        debug!("paused: {}", self.paused);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Seed the current run's rng was built from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }

    /// Runs one tick if it is due. Returns true when some block was repainted.
    ///
    /// The clock keeps ticking after the maze is finished, those ticks just carve nothing.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.paused || now < self.next_tick {
            return false;
        }
        self.next_tick = now + self.config.interval;

        let dirty = self
            .maze_generator
            .next_step(self.config.steps_per_tick);
        for id in dirty.iter() {
            self.canvas.repaint(self.maze_generator.as_ref(), *id);
        }

        !dirty.is_empty()
    }

    /// Carves the rest of the maze at once and repaints every block.
    pub fn complete(&mut self) -> bool {
        if self.maze_generator.is_done() {
            return false;
        }

        let steps = self.maze_generator.generate_maze();
        debug!("completed the maze with {} more steps", steps);
        for id in 0..self.maze_generator.grid().len() {
            self.canvas.repaint(self.maze_generator.as_ref(), id);
        }

        true
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        self.canvas.vertices()
    }
}

fn new_run(
    config: &Config,
    run: u64,
) -> Result<(Box<dyn Generator>, Canvas, u64), GridError> {
    let grid = BlockGrid::with_dims(config.columns, config.rows)?;
    // unseeded runs still get a logged seed so a maze can be reproduced
    let seed = match config.seed {
        Some(seed) => seed.wrapping_add(run),
        None => thread_rng().gen(),
    };
    let rng = StdRng::seed_from_u64(seed);
    info!(
        "carving {}x{} blocks on a {}x{} surface, seed {}",
        config.columns, config.rows, config.surface_width, config.surface_height, seed
    );

    let layout = Layout::new(
        config.surface_width,
        config.surface_height,
        config.columns,
        config.rows,
    );
    let mut canvas = Canvas::new(layout, grid.len());
    let start = config.start.and_then(|(x, y)| grid.index_of(x, y));

    let mut maze_generator: Box<dyn Generator> = Box::new(Backtracker::new(grid, rng));
    if let Some(start) = start {
        for id in maze_generator.start_at(start).redraws() {
            canvas.repaint(maze_generator.as_ref(), id);
        }
    }

    Ok((maze_generator, canvas, seed))
}
