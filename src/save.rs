//! The `.gol` save format.
//!
//! ```notrust
//! offset  size  field
//! 0       4     magic "GOL1"
//! 4       8     reserved, written as 0 and ignored on read
//! 12      8     width
//! 20      8     height
//! 28      8     cell size hint, at most 10
//! 36      8     compression flag: 0 raw, 1 LZFSE
//! 44      N     width * height cell bytes, raw or LZFSE-compressed
//! ```
//!
//! All integers are big endian `u64`.

use thiserror::Error;
use tracing::debug;

use crate::cell::Cell;
use crate::events::GridEvent;
use crate::events::Listeners;
use crate::grid::Grid;
use crate::settings::Compression;
use crate::settings::MAX_CELL_SIZE;
use crate::settings::Settings;

pub const MAGIC: [u8; 4] = *b"GOL1";

pub const HEADER_LEN: usize = 44;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("Corrupt save file: {0}")]
    Corrupt(#[from] Corruption),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Corruption {
    #[error("only {len} bytes, the header alone is 44")]
    TooShort { len: usize },

    #[error("bad magic {got:?}")]
    BadMagic { got: [u8; 4] },

    #[error("cell size {got} is larger than 10")]
    CellSize { got: u64 },

    #[error("unknown compression flag {got}")]
    UnknownCompression { got: u64 },

    #[error("{width}x{height} cells cannot be addressed")]
    Dimensions { width: u64, height: u64 },

    #[error("expected {expected} cells, found {got}")]
    PayloadLength { expected: usize, got: usize },

    #[error("LZFSE payload does not decode")]
    Decompress,
}

/// Everything a save file holds.
struct SaveFile {
    width: usize,
    height: usize,
    cell_size: u64,
    cells: Vec<Cell>,
}

fn read_u64(header: &[u8], at: usize) -> u64 {
    let mut buf = [0; 8];
    buf.copy_from_slice(&header[at..at + 8]);

    u64::from_be_bytes(buf)
}

fn decode(bytes: &[u8]) -> Result<SaveFile, Corruption> {
    if bytes.len() < HEADER_LEN {
        return Err(Corruption::TooShort { len: bytes.len() });
    }

    let (header, payload) = bytes.split_at(HEADER_LEN);

    let mut magic = [0; 4];
    magic.copy_from_slice(&header[..4]);

    if magic != MAGIC {
        return Err(Corruption::BadMagic { got: magic });
    }

    let width = read_u64(header, 12);
    let height = read_u64(header, 20);
    let cell_size = read_u64(header, 28);
    let flag = read_u64(header, 36);

    if cell_size > MAX_CELL_SIZE {
        return Err(Corruption::CellSize { got: cell_size });
    }

    let Some(compression) = Compression::from_flag(flag) else {
        return Err(Corruption::UnknownCompression { got: flag });
    };

    let dimensions = || Corruption::Dimensions { width, height };
    let w = usize::try_from(width).map_err(|_| dimensions())?;
    let h = usize::try_from(height).map_err(|_| dimensions())?;
    let expected = w.checked_mul(h).ok_or_else(dimensions)?;

    let cells = match compression {
        Compression::Raw => payload.to_vec(),
        Compression::Lzfse => {
            // `expected` comes from the header and is not trusted for allocation
            let mut cells = Vec::new();

            lzfse_rust::decode_bytes(payload, &mut cells).map_err(|_| Corruption::Decompress)?;

            cells
        }
    };

    if cells.len() != expected {
        return Err(Corruption::PayloadLength {
            expected,
            got: cells.len(),
        });
    }

    Ok(SaveFile {
        width: w,
        height: h,
        cell_size,
        cells: cells.into_iter().map(Cell::from_bits).collect(),
    })
}

fn population(cells: &[Cell]) -> u64 {
    cells.iter().filter(|c| c.is_alive()).count() as u64
}

impl Grid {
    /// Encode the grid using the compression chosen in its settings.
    pub fn serialize(&self) -> Vec<u8> {
        self.serialize_with(self.settings.compression)
    }

    /// Encode the grid. LZFSE falls back to a raw payload when it would not shrink the cells.
    pub fn serialize_with(&self, compression: Compression) -> Vec<u8> {
        let cells: Vec<u8> = self.cells.iter().map(|c| c.bits()).collect();

        let mut data = Vec::with_capacity(HEADER_LEN + cells.len());

        data.extend_from_slice(&MAGIC);
        data.extend_from_slice(&0u64.to_be_bytes());
        data.extend_from_slice(&(self.width as u64).to_be_bytes());
        data.extend_from_slice(&(self.height as u64).to_be_bytes());
        data.extend_from_slice(&self.settings.cell_size.min(MAX_CELL_SIZE).to_be_bytes());

        if compression == Compression::Lzfse {
            if let Some(compressed) = compress(&cells) {
                data.extend_from_slice(&Compression::Lzfse.flag().to_be_bytes());
                data.extend_from_slice(&compressed);

                return data;
            }

            debug!(len = cells.len(), "LZFSE does not pay off, saving raw cells");
        }

        data.extend_from_slice(&Compression::Raw.flag().to_be_bytes());
        data.extend_from_slice(&cells);

        data
    }

    /// Decode a save file into a new grid with default settings, apart from the stored cell size.
    pub fn deserialize(bytes: &[u8]) -> Result<Grid, FormatError> {
        let file = decode(bytes)?;

        let settings = Settings {
            cell_size: file.cell_size,
            ..Settings::default()
        };

        Ok(Grid {
            width: file.width,
            height: file.height,
            population: population(&file.cells),
            cells: file.cells,
            turns: 0,
            settings,
            listeners: Listeners::default(),
        })
    }

    /// Replace the cells of this grid with those of a save file. The rule and the turn counter
    /// are kept. On error the grid is left untouched.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        let file = decode(bytes)?;

        debug!(width = file.width, height = file.height, "Loaded save file");

        self.population = population(&file.cells);
        self.cells = file.cells;
        self.width = file.width;
        self.height = file.height;
        self.settings.cell_size = file.cell_size;

        self.listeners.emit(GridEvent::Loaded);

        Ok(())
    }
}

/// `None` when LZFSE fails or its output is larger than the input.
fn compress(cells: &[u8]) -> Option<Vec<u8>> {
    if cells.is_empty() {
        return None;
    }

    let mut compressed = Vec::new();
    lzfse_rust::encode_bytes(cells, &mut compressed).ok()?;

    (compressed.len() <= cells.len()).then_some(compressed)
}
