use std::fmt;

/// Something happened to a [`crate::grid::Grid`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GridEvent {
    /// The grid advanced one generation
    Stepped { turns: u64, population: u64 },

    Resized { width: usize, height: usize },

    /// Cells were replaced wholesale, by a save file or a pattern
    Loaded,

    /// A pattern was stamped onto the grid, bringing `born` cells to life
    PatternInserted { born: u64 },
}

type Listener = Box<dyn FnMut(&GridEvent) + Send>;

/// Callbacks subscribed to a grid.
///
/// Listeners belong to one grid instance: cloning yields an empty set.
#[derive(Default)]
pub struct Listeners {
    listeners: Vec<Listener>,
}

impl Listeners {
    pub fn push<F>(&mut self, f: F)
    where
        F: FnMut(&GridEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(f));
    }

    pub fn emit(&mut self, event: GridEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl Clone for Listeners {
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}
