/// A single grid position, packed into one byte.
///
/// # Representation
/// ```notrust
/// 0000_000 0
/// |--age--| |
///           alive
/// ```
///
/// The age is the number of generations the cell has been continuously alive. It saturates at
/// [`Cell::MAX_AGE`] and is `0` for every dead cell.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub struct Cell(u8);

const ALIVE_MASK: u8 = 0b0000_0001;

impl Cell {
    /// Largest age representable in the upper seven bits.
    pub const MAX_AGE: u8 = u8::MAX >> 1;

    pub const DEAD: Cell = Cell(0);

    /// A cell that has just come to life.
    pub const NEWBORN: Cell = Cell(ALIVE_MASK | (1 << 1));

    /// Wrap a raw byte, as found in a save file.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_alive(self) -> bool {
        self.0 & ALIVE_MASK == ALIVE_MASK
    }

    pub const fn age(self) -> u8 {
        self.0 >> 1
    }

    /// The same cell one generation older. Dead cells and cells at [`Cell::MAX_AGE`] are returned
    /// unchanged.
    pub const fn aged(self) -> Self {
        if !self.is_alive() || self.age() == Self::MAX_AGE {
            return self;
        }

        Self(ALIVE_MASK | ((self.age() + 1) << 1))
    }
}
