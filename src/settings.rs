use crate::rule_set::Rule;

/// Largest cell size hint a save file may carry.
pub const MAX_CELL_SIZE: u64 = 10;

/// How the cell payload of a save file is stored.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Compression {
    Raw,
    #[default]
    Lzfse,
}

impl Compression {
    pub const fn flag(self) -> u64 {
        match self {
            Compression::Raw => 0,
            Compression::Lzfse => 1,
        }
    }

    pub const fn from_flag(flag: u64) -> Option<Self> {
        match flag {
            0 => Some(Compression::Raw),
            1 => Some(Compression::Lzfse),
            _ => None,
        }
    }
}

/// Per-grid configuration.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Settings {
    /// Rule used by [`crate::grid::Grid::step`].
    pub rule: Rule,

    /// Display size of one cell, in points. Only stored, never interpreted by the engine.
    pub cell_size: u64,

    /// Compression used when serializing.
    pub compression: Compression,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rule: Rule::default(),
            cell_size: MAX_CELL_SIZE,
            compression: Compression::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Compression;
    use super::Settings;

    #[test]
    fn flags() {
        for c in [Compression::Raw, Compression::Lzfse] {
            assert_eq!(Compression::from_flag(c.flag()), Some(c));
        }

        assert_eq!(Compression::from_flag(2), None);
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();

        assert_eq!(settings.rule.name(), "B3/S23");
        assert_eq!(settings.cell_size, 10);
        assert_eq!(settings.compression, Compression::Lzfse);
    }
}
