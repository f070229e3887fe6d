use rand::Rng;
use tracing::debug;
use tracing::trace;

use crate::cell::Cell;
use crate::events::GridEvent;
use crate::events::Listeners;
use crate::pattern;
use crate::pattern::PatternItem;
use crate::rule_set::Rule;
use crate::settings::Settings;

/// How a new grid is populated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Fill {
    Blank,

    /// About a third of the cells start alive
    Random,
}

/// A finite, non-toroidal Life grid.
///
/// Cells are stored row-major, `(0, 0)` being the top-left corner. Cells past the borders are
/// always dead and are never created.
#[derive(Clone, Debug)]
pub struct Grid {
    pub(crate) width: usize,
    pub(crate) height: usize,

    /// `width * height` cells
    pub(crate) cells: Vec<Cell>,

    /// Generations computed so far. Saturates at `u64::MAX`.
    pub(crate) turns: u64,

    /// Number of live cells in `cells`
    pub(crate) population: u64,

    pub(crate) settings: Settings,

    pub(crate) listeners: Listeners,
}

/// Two grids are equal when their dimensions, counters and cells are. Settings and listeners are
/// not compared.
impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.turns == other.turns
            && self.population == other.population
            && self.cells == other.cells
    }
}

impl Eq for Grid {}

impl Grid {
    /// Create a grid using the default [`Settings`].
    pub fn new(width: usize, height: usize, fill: Fill) -> Self {
        Self::with_settings(width, height, fill, Settings::default())
    }

    pub fn with_settings(width: usize, height: usize, fill: Fill, settings: Settings) -> Self {
        let mut grid = Self {
            width,
            height,
            cells: vec![Cell::DEAD; width * height],
            turns: 0,
            population: 0,
            settings,
            listeners: Listeners::default(),
        };

        if fill == Fill::Random {
            grid.randomize_with(&mut rand::rng());
        }

        grid
    }

    /// Bring each cell to life with probability 1/3, drawn as `u32 % 3 == 1`.
    pub fn randomize_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut n = 0;

        for cell in &mut self.cells {
            let alive = rng.random::<u32>() % 3 == 1;

            *cell = if alive { Cell::NEWBORN } else { Cell::DEAD };
            n += alive as u64;
        }

        self.population = n;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn turns(&self) -> u64 {
        self.turns
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    /// Row-major cells
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn rule(&self) -> &Rule {
        &self.settings.rule
    }

    /// Use `rule` from the next [`Grid::step`] on.
    pub fn set_rule(&mut self, rule: Rule) {
        debug!(rule = %rule, "Switching rule");

        self.settings.rule = rule;
    }

    /// Call `f` after every change to this grid.
    pub fn subscribe<F>(&mut self, f: F)
    where
        F: FnMut(&GridEvent) + Send + 'static,
    {
        self.listeners.push(f);
    }

    const fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }

    pub fn cell_at(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width && y < self.height).then(|| self.cells[self.index(x, y)])
    }

    pub fn is_alive_at(&self, x: usize, y: usize) -> bool {
        self.cell_at(x, y).is_some_and(Cell::is_alive)
    }

    /// Revive or kill a single cell. Out-of-range coordinates are ignored.
    pub fn set_alive_at(&mut self, x: usize, y: usize, alive: bool) {
        let Some(cell) = self.cell_at(x, y) else {
            return;
        };

        let i = self.index(x, y);

        match (cell.is_alive(), alive) {
            (false, true) => {
                self.cells[i] = Cell::NEWBORN;
                self.population += 1;
            }
            (true, false) => {
                self.cells[i] = Cell::DEAD;
                self.population -= 1;
            }
            _ => {}
        }
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::DEAD);
        self.population = 0;
    }

    /// Iterate over all cells with their positions
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| (i % self.width, i / self.width, cell))
    }

    /// Number of live cells among the up to 8 neighbours of `(x, y)`.
    pub fn neighbor_count(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.count_neighbors(x, y))
    }

    /// Assumes `(x, y)` is in range
    fn count_neighbors(&self, x: usize, y: usize) -> u8 {
        let xs = x.saturating_sub(1)..=(x + 1).min(self.width - 1);
        let ys = y.saturating_sub(1)..=(y + 1).min(self.height - 1);

        let mut n = 0;

        for ny in ys {
            for nx in xs.clone() {
                if (nx, ny) != (x, y) && self.cells[self.index(nx, ny)].is_alive() {
                    n += 1;
                }
            }
        }

        n
    }

    /// Advance the grid by one generation.
    ///
    /// Once `turns` reaches `u64::MAX` this does nothing.
    pub fn step(&mut self) {
        if self.turns == u64::MAX {
            return;
        }

        self.turns += 1;

        let rule = self.settings.rule.rule_set();
        let mut next = vec![Cell::DEAD; self.cells.len()];
        let mut n = 0;

        for y in 0..self.height {
            for x in 0..self.width {
                let i = self.index(x, y);
                let old = self.cells[i];
                let count = self.count_neighbors(x, y);

                let new = if old.is_alive() {
                    if rule.survives(count) {
                        old.aged()
                    } else {
                        Cell::DEAD
                    }
                } else if rule.born(count) {
                    Cell::NEWBORN
                } else {
                    Cell::DEAD
                };

                n += new.is_alive() as u64;
                next[i] = new;
            }
        }

        self.cells = next;
        self.population = n;

        trace!(turns = self.turns, population = n, "Stepped");

        self.listeners.emit(GridEvent::Stepped {
            turns: self.turns,
            population: n,
        });
    }

    /// Change the dimensions, keeping the cells whose coordinates survive.
    pub fn resize(&mut self, width: usize, height: usize) {
        let mut cells = vec![Cell::DEAD; width * height];
        let w = width.min(self.width);

        for y in 0..height.min(self.height) {
            let src = self.index(0, y);
            let dst = y * width;

            cells[dst..dst + w].copy_from_slice(&self.cells[src..src + w]);
        }

        self.population = cells.iter().filter(|c| c.is_alive()).count() as u64;
        self.cells = cells;
        self.width = width;
        self.height = height;

        self.listeners.emit(GridEvent::Resized { width, height });
    }

    /// Stamp pattern rows onto the grid with their top-left corner at `(left, top)`.
    ///
    /// Every character other than [`pattern::DEAD`] revives its cell; no cell is ever killed.
    /// Cells falling outside the grid are skipped. Returns the number of cells brought to life.
    pub fn insert_pattern<S: AsRef<str>>(&mut self, rows: &[S], left: isize, top: isize) -> u64 {
        let mut born = 0;

        for (dy, row) in rows.iter().enumerate() {
            let Some(y) = top.checked_add_unsigned(dy).and_then(|y| usize::try_from(y).ok()) else {
                continue;
            };

            if y >= self.height {
                continue;
            }

            for (dx, c) in row.as_ref().chars().enumerate() {
                if c == pattern::DEAD {
                    continue;
                }

                let Some(x) = left.checked_add_unsigned(dx).and_then(|x| usize::try_from(x).ok())
                else {
                    continue;
                };

                if x >= self.width {
                    continue;
                }

                let i = self.index(x, y);

                if !self.cells[i].is_alive() {
                    self.cells[i] = Cell::NEWBORN;
                    born += 1;
                }
            }
        }

        self.population += born;

        self.listeners.emit(GridEvent::PatternInserted { born });

        born
    }

    /// Stamp a pattern item. See [`Grid::insert_pattern`].
    pub fn insert(&mut self, item: &PatternItem, left: isize, top: isize) -> u64 {
        self.insert_pattern(item.cells(), left, top)
    }

    /// Replace the grid contents with `item`, centered. The grid grows if the pattern does not
    /// fit. Empty patterns leave the grid untouched.
    pub fn load_pattern(&mut self, item: &PatternItem) {
        if item.height() == 0 {
            return;
        }

        let (width, left) = if item.width() < self.width {
            (self.width, (self.width - item.width()) / 2)
        } else {
            (item.width(), 0)
        };

        let (height, top) = if item.height() < self.height {
            (self.height, (self.height - item.height()) / 2)
        } else {
            (item.height(), 0)
        };

        debug!(title = %item.title, width, height, "Loading pattern");

        self.cells = vec![Cell::DEAD; width * height];
        self.width = width;
        self.height = height;
        self.population = 0;

        self.insert_pattern(item.cells(), left as isize, top as isize);

        self.listeners.emit(GridEvent::Loaded);
    }
}
