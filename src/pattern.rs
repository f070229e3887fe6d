use std::sync::Arc;
use std::sync::OnceLock;
use std::thread;
use std::thread::JoinHandle;

use thiserror::Error;

use crate::parse_rle::RleEncodingError;

/// Character of a live cell in pattern rows. Any other character except [`DEAD`] also counts as
/// alive when stamped onto a grid.
pub const ALIVE: char = 'o';

/// Character of a dead cell in pattern rows.
pub const DEAD: char = ' ';

#[derive(Debug, Error)]
pub enum PatternParseError {
    #[error("Pattern has no title")]
    MissingTitle,

    #[error("Pattern has no rows")]
    NoRows,

    #[error("Encoding error: {0}")]
    Encoding(#[from] RleEncodingError),
}

/// A named pattern, as read from a pattern file or taken from the built-in presets.
///
/// Rows may be shorter than [`PatternItem::width`]; missing characters are dead cells.
#[derive(Clone, Debug)]
pub struct PatternItem {
    pub title: String,
    pub author: String,
    /// Rule label as found in the file. Not validated.
    pub rule: String,
    pub comment: String,

    cells: Vec<String>,
    width: usize,

    /// Rows turned by 90°, 180° and 270° clockwise.
    rotations: OnceLock<[Vec<String>; 3]>,
}

impl PatternItem {
    pub fn new(title: impl Into<String>, cells: Vec<String>) -> Self {
        let width = cells.iter().map(|row| row.chars().count()).max().unwrap_or(0);

        Self {
            title: title.into(),
            author: String::new(),
            rule: String::new(),
            comment: String::new(),
            cells,
            width,
            rotations: OnceLock::new(),
        }
    }

    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Length of the longest row
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Short description combining the comment and the author.
    pub fn tooltip(&self) -> String {
        match (self.comment.is_empty(), self.author.is_empty()) {
            (false, false) => format!("{}\n({})", self.comment, self.author),
            (true, false) => self.author.clone(),
            (false, true) => self.comment.clone(),
            (true, true) => String::new(),
        }
    }

    /// Compute the rotated rows, once. Later calls return immediately.
    pub fn prepare_rotations(&self) {
        self.rotations.get_or_init(|| {
            let r90 = rotate(&self.cells);
            let r180 = rotate(&r90);
            let r270 = rotate(&r180);

            [r90, r180, r270]
        });
    }

    /// Like [`PatternItem::prepare_rotations`], on a worker thread. `on_done` runs on that thread
    /// once the rotations are visible through [`PatternItem::rotated`].
    pub fn prepare_rotations_in_background<F>(item: Arc<PatternItem>, on_done: F) -> JoinHandle<()>
    where
        F: FnOnce(Arc<PatternItem>) + Send + 'static,
    {
        thread::spawn(move || {
            item.prepare_rotations();
            on_done(item);
        })
    }

    pub fn rotations_ready(&self) -> bool {
        self.rotations.get().is_some()
    }

    /// Rows turned clockwise by `quarter_turns` * 90°.
    ///
    /// Returns `None` for a non-zero turn until the rotations have been prepared.
    pub fn rotated(&self, quarter_turns: usize) -> Option<&[String]> {
        match quarter_turns % 4 {
            0 => Some(&self.cells),
            n => self.rotations.get().map(|r| r[n - 1].as_slice()),
        }
    }
}

/// Turn rows by 90° clockwise: pad to a rectangle, transpose, then reverse each row.
pub fn rotate(rows: &[String]) -> Vec<String> {
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);

    let matrix: Vec<Vec<char>> = rows
        .iter()
        .map(|row| {
            let mut chars: Vec<char> = row.chars().collect();
            chars.resize(width, DEAD);
            chars
        })
        .collect();

    (0..width)
        .map(|x| matrix.iter().rev().map(|row| row[x]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::mpsc;

    use super::PatternItem;
    use super::rotate;

    fn rows(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn size() {
        let item = PatternItem::new("Ragged", rows(&["o", "ooo", ""]));

        assert_eq!(item.width(), 3);
        assert_eq!(item.height(), 3);
    }

    #[test]
    fn rotate_glider() {
        let glider = rows(&[" o ", "  o", "ooo"]);

        assert_eq!(rotate(&glider), rows(&["o  ", "o o", "oo "]));
    }

    #[test]
    fn rotate_pads_short_rows() {
        let ragged = rows(&["oo", "o"]);

        assert_eq!(rotate(&ragged), rows(&["oo", " o"]));
    }

    #[test]
    fn rotate_non_square() {
        assert_eq!(rotate(&rows(&["ooo"])), rows(&["o", "o", "o"]));
        assert_eq!(rotate(&[]), Vec::<String>::new());
    }

    #[test]
    fn four_turns_is_identity() {
        let glider = rows(&[" o ", "  o", "ooo"]);
        let item = PatternItem::new("Glider", glider.clone());

        assert!(item.rotated(1).is_none());

        item.prepare_rotations();

        assert_eq!(item.rotated(0).unwrap(), glider.as_slice());
        assert_eq!(rotate(item.rotated(3).unwrap()), glider);
        assert_eq!(item.rotated(4).unwrap(), glider.as_slice());
        assert_eq!(item.rotated(2).unwrap(), rows(&["ooo", "o  ", " o "]).as_slice());
    }

    #[test]
    fn prepare_is_idempotent() {
        let item = PatternItem::new("Blinker", rows(&["ooo"]));

        item.prepare_rotations();
        let first = item.rotated(1).unwrap().as_ptr();

        item.prepare_rotations();
        let second = item.rotated(1).unwrap().as_ptr();

        assert_eq!(first, second);
    }

    #[test]
    fn background_rotations_signal_completion() {
        let item = Arc::new(PatternItem::new("Toad", rows(&[" ooo", "ooo "])));
        let (tx, rx) = mpsc::channel();

        let handle = PatternItem::prepare_rotations_in_background(item.clone(), move |item| {
            tx.send(item.rotations_ready()).unwrap();
        });

        assert!(rx.recv().unwrap());
        handle.join().unwrap();
        assert!(item.rotations_ready());
    }

    #[test]
    fn tooltip() {
        let mut item = PatternItem::new("Glider", rows(&["o"]));
        assert_eq!(item.tooltip(), "");

        item.author = "Richard K. Guy".to_string();
        assert_eq!(item.tooltip(), "Richard K. Guy");

        item.comment = "The smallest spaceship".to_string();
        assert_eq!(item.tooltip(), "The smallest spaceship\n(Richard K. Guy)");
    }
}
