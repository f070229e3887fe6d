use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::parse_cells;
use crate::parse_rle;
use crate::pattern::PatternItem;
use crate::pattern::PatternParseError;

/// Extensions of the Plaintext format.
pub const CELLS_EXTENSIONS: [&str; 2] = ["cells", "txt"];

pub const RLE_EXTENSION: &str = "rle";

#[derive(Debug, Error)]
pub enum PatternFileError {
    #[error("Failed to read pattern file: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported pattern file extension {ext:?}")]
    UnsupportedExtension { ext: String },

    #[error("Failed to parse pattern: {0}")]
    Parse(#[from] PatternParseError),
}

/// Read a pattern file, choosing the parser from the file extension.
pub fn read_pattern_file(path: impl AsRef<Path>) -> Result<PatternItem, PatternFileError> {
    let path = path.as_ref();

    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    let read = if CELLS_EXTENSIONS.contains(&ext.as_str()) {
        parse_cells::read_cells
    } else if ext == RLE_EXTENSION {
        parse_rle::read_rle
    } else {
        return Err(PatternFileError::UnsupportedExtension { ext });
    };

    let bytes = fs::read(path)?;

    Ok(read(&bytes)?)
}

/// Read every pattern file of a directory, sorted by title.
///
/// Files that can't be read or parsed are skipped.
pub fn read_directory(path: impl AsRef<Path>) -> io::Result<Vec<PatternItem>> {
    let mut items = Vec::new();

    for entry in fs::read_dir(path)? {
        let path = entry?.path();

        if !path.is_file() {
            continue;
        }

        match read_pattern_file(&path) {
            Ok(item) => items.push(item),
            Err(e) => debug!("Skipping {}: {e}", path.display()),
        }
    }

    items.sort_by(|a, b| a.title.cmp(&b.title));

    Ok(items)
}

/// A named collection of patterns.
#[derive(Clone, Debug)]
pub struct PatternGroup {
    pub title: String,
    pub items: Vec<PatternItem>,
}

type Preset = (&'static str, &'static [&'static str]);

const STILL_LIFES: &[Preset] = &[
    ("Block", &["oo", "oo"]),
    ("Beehive", &[" oo ", "o  o", " oo "]),
    ("Loaf", &[" oo ", "o  o", " o o", "  o "]),
    ("Boat", &["oo ", "o o", " o "]),
    ("Tub", &[" o ", "o o", " o "]),
];

const OSCILLATORS: &[Preset] = &[
    ("Blinker", &["ooo"]),
    ("Toad", &[" ooo", "ooo "]),
    ("Beacon", &["oo  ", "oo  ", "  oo", "  oo"]),
    (
        "Pulsar",
        &[
            "  ooo   ooo  ",
            "",
            "o    o o    o",
            "o    o o    o",
            "o    o o    o",
            "  ooo   ooo  ",
            "",
            "  ooo   ooo  ",
            "o    o o    o",
            "o    o o    o",
            "o    o o    o",
            "",
            "  ooo   ooo  ",
        ],
    ),
    (
        "Pentadecathlon",
        &["ooo", "o o", "ooo", "ooo", "ooo", "ooo", "o o", "ooo"],
    ),
];

const SPACESHIPS: &[Preset] = &[
    ("Glider", &[" o ", "  o", "ooo"]),
    ("LWSS", &[" oooo", "o   o", "    o", "o  o "]),
];

/// Patterns shipped with the crate.
pub fn builtin() -> Vec<PatternGroup> {
    [
        ("Still Lifes", STILL_LIFES),
        ("Oscillators", OSCILLATORS),
        ("Spaceships", SPACESHIPS),
    ]
    .into_iter()
    .map(|(title, presets)| PatternGroup {
        title: title.to_string(),
        items: presets
            .iter()
            .map(|(title, rows)| {
                PatternItem::new(*title, rows.iter().map(|row| row.to_string()).collect())
            })
            .collect(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::builtin;
    use crate::grid::Fill;
    use crate::grid::Grid;

    fn find(title: &str) -> crate::pattern::PatternItem {
        builtin()
            .into_iter()
            .flat_map(|group| group.items)
            .find(|item| item.title == title)
            .unwrap()
    }

    #[test]
    fn groups() {
        let titles: Vec<_> = builtin().into_iter().map(|g| g.title).collect();

        assert_eq!(titles, ["Still Lifes", "Oscillators", "Spaceships"]);
    }

    #[test]
    fn still_lifes_are_still() {
        let group = builtin().remove(0);

        for item in &group.items {
            let mut grid = Grid::new(item.width() + 2, item.height() + 2, Fill::Blank);
            grid.insert(item, 1, 1);

            let before = grid.clone();
            grid.step();

            assert_eq!(grid.cells().len(), before.cells().len());
            for (x, y, cell) in before.iter_cells() {
                assert_eq!(grid.is_alive_at(x, y), cell.is_alive(), "{}", item.title);
            }
        }
    }

    #[test]
    fn pulsar_has_period_3() {
        let pulsar = find("Pulsar");

        assert_eq!((pulsar.width(), pulsar.height()), (13, 13));

        let mut grid = Grid::new(17, 17, Fill::Blank);
        grid.insert(&pulsar, 2, 2);

        let alive = |grid: &Grid| -> Vec<bool> {
            grid.iter_cells().map(|(_, _, c)| c.is_alive()).collect()
        };

        let start = alive(&grid);

        grid.step();
        assert_ne!(alive(&grid), start);

        grid.step();
        grid.step();
        assert_eq!(alive(&grid), start);
    }

    #[test]
    fn lwss_moves_two_cells_in_four_steps() {
        let lwss = find("LWSS");

        let mut grid = Grid::new(15, 8, Fill::Blank);
        grid.insert(&lwss, 5, 2);

        let alive = |grid: &Grid| -> BTreeSet<(isize, isize)> {
            grid.iter_cells()
                .filter(|(_, _, c)| c.is_alive())
                .map(|(x, y, _)| (x as isize, y as isize))
                .collect()
        };

        let start = alive(&grid);
        for _ in 0..4 {
            grid.step();
        }
        let end = alive(&grid);

        let shifted = |dx: isize| -> BTreeSet<(isize, isize)> {
            start.iter().map(|&(x, y)| (x + dx, y)).collect()
        };

        assert_eq!(end.len(), 9);
        assert!(end == shifted(-2) || end == shifted(2));
    }
}
