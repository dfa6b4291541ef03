#![deny(clippy::all)]
#![forbid(unsafe_code)]

use rand::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    ZeroDimension { width: u32, height: u32 },
}

/// One grid cell: life state plus the number of consecutive generations
/// it has been alive. `age` is 0 exactly when the cell is dead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub alive: bool,
    pub age: u32,
}

impl Cell {
    pub fn born() -> Self {
        Self {
            alive: true,
            age: 1,
        }
    }

    pub fn dead() -> Self {
        Self::default()
    }
}

/// Fixed-size toroidal grid of cells. Coordinates wrap with `rem_euclid`,
/// so every `i64` input addresses some cell; there is no out-of-bounds.
#[derive(Clone, Debug)]
pub struct Grid {
    cells: Vec<Cell>,
    width: u32,
    height: u32,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroDimension { width, height });
        }
        Ok(Self {
            cells: vec![Cell::default(); width as usize * height as usize],
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, x: i64, y: i64) -> Cell {
        self.cells[self.index(x, y)]
    }

    pub fn set(&mut self, x: i64, y: i64, cell: Cell) {
        let index = self.index(x, y);
        self.cells[index] = cell;
    }

    /// Live cells among the 8 at Chebyshev distance 1, all wrapped.
    /// The center cell itself is excluded.
    pub fn count_live_neighbors(&self, x: i64, y: i64) -> u8 {
        // wrap the center first so the +-1 deltas cannot overflow at
        // the i64 extremes
        let cx = Self::modulo(x, self.width) as i64;
        let cy = Self::modulo(y, self.height) as i64;
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if self.get(cx + dx, cy + dy).alive {
                    count += 1;
                }
            }
        }
        count
    }

    /// Row-major traversal (y outer, x inner), restartable on each call.
    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = (u32, u32, &Cell)> + Clone {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % width) as u32, (i / width) as u32, cell))
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn index(&self, x: i64, y: i64) -> usize {
        let col = Self::modulo(x, self.width);
        let row = Self::modulo(y, self.height);
        row as usize * self.width as usize + col as usize
    }

    fn modulo(val: i64, max: u32) -> u32 {
        val.rem_euclid(max as i64) as u32
    }
}

#[derive(Debug)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn next_bool(&mut self, p: f64) -> bool {
        self.rng.random_bool(p)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
