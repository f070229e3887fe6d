pub mod cell;
pub mod events;
pub mod grid;
pub mod library;
pub mod parse_cells;
pub mod parse_rle;
pub mod pattern;
pub mod rle;
pub mod rule_set;
pub mod save;
pub mod settings;

mod parse_util;
