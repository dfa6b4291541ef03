#![deny(clippy::all)]
#![forbid(unsafe_code)]

use std::mem;

use life_grid::{Cell, Grid, GridError, Random};
use log::{debug, trace};
use thiserror::Error;

/// Live probability used by drivers that call `randomize` without a
/// user-chosen density.
pub const DEFAULT_DENSITY: f64 = 0.5;

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum LifeError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("density must be within [0, 1], got {density}")]
    DensityOutOfRange { density: f64 },
}

/// One Game-of-Life simulation: a double-buffered toroidal grid plus the
/// generation counter and the driver-owned pause flag.
///
/// `step` computes the next generation entirely from the previous one and
/// then swaps buffers, so a reader only ever sees whole generations.
#[derive(Debug)]
pub struct World {
    cells: Grid,
    next_cells: Grid,
    generation: u64,
    running: bool,
    rand: Random,
}

impl World {
    /// Creates a world with every cell dead and `generation` 0.
    pub fn new(width: u32, height: u32) -> Result<Self, LifeError> {
        Ok(Self {
            cells: Grid::new(width, height)?,
            next_cells: Grid::new(width, height)?,
            generation: 0,
            running: true,
            rand: Random::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.num_cells()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Pause flag for the driving loop. The engine itself never reads it;
    /// `step` runs whenever called.
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn cell(&self, x: i64, y: i64) -> Cell {
        self.cells.get(x, y)
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = (u32, u32, &Cell)> + Clone {
        self.cells.cells_iter()
    }

    /// Applies one generation of the transition rule to every cell.
    ///
    /// Neighbor counts are taken from the pre-step grid only; results go
    /// into the scratch grid, which is swapped in once complete.
    pub fn step(&mut self) {
        let (width, height) = (self.width() as i64, self.height() as i64);
        for y in 0..height {
            for x in 0..width {
                let neighbors = self.cells.count_live_neighbors(x, y);
                let next = next_cell(self.cells.get(x, y), neighbors);
                self.next_cells.set(x, y, next);
            }
        }
        mem::swap(&mut self.next_cells, &mut self.cells);
        self.generation += 1;
        trace!("stepped to generation {}", self.generation);
    }

    /// Flips the cell at the wrapped coordinate. Leaves `generation` alone.
    pub fn toggle(&mut self, x: i64, y: i64) {
        let cell = if self.cells.get(x, y).alive {
            Cell::dead()
        } else {
            Cell::born()
        };
        self.cells.set(x, y, cell);
    }

    /// Sets each cell alive independently with probability `density`.
    /// A seed makes the resulting grid reproducible; without one the
    /// world's own entropy-seeded source is used.
    pub fn randomize(&mut self, density: f64, seed: Option<u64>) -> Result<(), LifeError> {
        if !(0.0..=1.0).contains(&density) {
            return Err(LifeError::DensityOutOfRange { density });
        }
        let (width, height) = (self.width() as i64, self.height() as i64);
        let mut seeded = seed.map(Random::from_seed);
        let rand = seeded.as_mut().unwrap_or(&mut self.rand);
        for y in 0..height {
            for x in 0..width {
                let cell = if rand.next_bool(density) {
                    Cell::born()
                } else {
                    Cell::dead()
                };
                self.cells.set(x, y, cell);
            }
        }
        debug!("randomized {width}x{height} grid, density {density}, seed {seed:?}");
        Ok(())
    }

    /// Kills every cell. `generation` and `running` are untouched.
    pub fn clear(&mut self) {
        self.cells.clear();
        debug!("cleared grid at generation {}", self.generation);
    }
}

/// The transition rule for a single cell, given its live-neighbor count
/// from the previous generation. Survivors age by one (saturating),
/// births start at age 1, deaths reset to age 0.
fn next_cell(cell: Cell, live_neighbors: u8) -> Cell {
    let alive = if cell.alive {
        live_neighbors == 2 || live_neighbors == 3
    } else {
        live_neighbors == 3
    };
    let age = if !alive {
        0
    } else if cell.alive {
        cell.age.saturating_add(1)
    } else {
        1
    };
    Cell { alive, age }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_cell_survives_with_two_or_three_neighbors() {
        let cell = Cell { alive: true, age: 4 };
        assert_eq!(next_cell(cell, 2), Cell { alive: true, age: 5 });
        assert_eq!(next_cell(cell, 3), Cell { alive: true, age: 5 });
    }

    #[test]
    fn live_cell_dies_of_under_and_overpopulation() {
        let cell = Cell { alive: true, age: 4 };
        for neighbors in [0, 1, 4, 5, 6, 7, 8] {
            assert_eq!(next_cell(cell, neighbors), Cell::dead());
        }
    }

    #[test]
    fn dead_cell_is_born_with_exactly_three_neighbors() {
        assert_eq!(next_cell(Cell::dead(), 3), Cell::born());
        for neighbors in [0, 1, 2, 4, 5, 6, 7, 8] {
            assert_eq!(next_cell(Cell::dead(), neighbors), Cell::dead());
        }
    }

    #[test]
    fn age_saturates_instead_of_overflowing() {
        let cell = Cell {
            alive: true,
            age: u32::MAX,
        };
        assert_eq!(next_cell(cell, 2).age, u32::MAX);
    }

    #[test]
    fn new_world_is_dead_at_generation_zero() {
        let world = World::new(6, 4).unwrap();
        assert_eq!(world.generation(), 0);
        assert_eq!(world.num_cells(), 24);
        assert!(world.cells_iter().all(|(_, _, cell)| *cell == Cell::dead()));
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(World::new(0, 4), Err(LifeError::Grid(_))));
        assert!(matches!(World::new(4, 0), Err(LifeError::Grid(_))));
    }

    #[test]
    fn toggle_flips_and_sets_age() {
        let mut world = World::new(4, 4).unwrap();
        world.toggle(1, 2);
        assert_eq!(world.cell(1, 2), Cell::born());
        world.toggle(1, 2);
        assert_eq!(world.cell(1, 2), Cell::dead());
        assert_eq!(world.generation(), 0);
    }

    #[test]
    fn toggle_wraps_coordinates() {
        let mut world = World::new(4, 4).unwrap();
        world.toggle(-1, -1);
        assert!(world.cell(3, 3).alive);
    }

    #[test]
    fn randomize_rejects_density_outside_unit_interval() {
        let mut world = World::new(4, 4).unwrap();
        assert_eq!(
            world.randomize(1.5, None),
            Err(LifeError::DensityOutOfRange { density: 1.5 })
        );
        assert_eq!(
            world.randomize(-0.1, None),
            Err(LifeError::DensityOutOfRange { density: -0.1 })
        );
    }

    #[test]
    fn randomize_density_extremes() {
        let mut world = World::new(5, 5).unwrap();
        world.randomize(1.0, None).unwrap();
        assert!(world.cells_iter().all(|(_, _, cell)| *cell == Cell::born()));
        world.randomize(0.0, None).unwrap();
        assert!(world.cells_iter().all(|(_, _, cell)| *cell == Cell::dead()));
    }

    #[test]
    fn randomize_with_seed_is_reproducible() {
        let mut a = World::new(8, 8).unwrap();
        let mut b = World::new(8, 8).unwrap();
        a.randomize(DEFAULT_DENSITY, Some(7)).unwrap();
        b.randomize(DEFAULT_DENSITY, Some(7)).unwrap();
        let alive_a: Vec<bool> = a.cells_iter().map(|(_, _, cell)| cell.alive).collect();
        let alive_b: Vec<bool> = b.cells_iter().map(|(_, _, cell)| cell.alive).collect();
        assert_eq!(alive_a, alive_b);
    }

    #[test]
    fn randomize_and_toggle_leave_generation_alone() {
        let mut world = World::new(4, 4).unwrap();
        world.step();
        world.randomize(0.3, Some(1)).unwrap();
        world.toggle(0, 0);
        world.clear();
        assert_eq!(world.generation(), 1);
    }

    #[test]
    fn clear_kills_everything_but_keeps_flags() {
        let mut world = World::new(4, 4).unwrap();
        world.randomize(1.0, Some(3)).unwrap();
        world.set_running(false);
        world.step();
        world.clear();
        assert!(world.cells_iter().all(|(_, _, cell)| *cell == Cell::dead()));
        assert_eq!(world.generation(), 1);
        assert!(!world.is_running());
    }

    #[test]
    fn running_flag_defaults_on_and_is_driver_controlled() {
        let mut world = World::new(4, 4).unwrap();
        assert!(world.is_running());
        world.step();
        assert!(world.is_running());
        world.set_running(false);
        world.step();
        assert!(!world.is_running());
    }
}
