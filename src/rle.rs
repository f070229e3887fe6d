use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::grid::Grid;

/// Maximum length of an encoding line.
pub const LINE_WIDTH: usize = 70;

/// Encode the grid in the RLE file format, with a `#O` line naming this crate and the current
/// time.
///
/// Cell ages are not kept.
pub fn write_rle(grid: &Grid, name: &str, comments: &[String]) -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let creator = format!(
        "{} {}, {secs}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );

    write_rle_with_creator(grid, name, comments, &creator)
}

pub fn write_rle_with_creator(grid: &Grid, name: &str, comments: &[String], creator: &str) -> String {
    let mut out = format!("#N {name}\n");

    for c in comments {
        out.push_str(&format!("#C {c}\n"));
    }

    out.push_str(&format!("#O {creator}\n"));
    out.push_str(&format!(
        "x = {}, y = {}, rule = {}\n",
        grid.width(),
        grid.height(),
        grid.rule().name()
    ));

    let mut lines = Wrap::default();

    if grid.height() == 0 {
        lines.push("!");
    }

    let width = grid.width();

    for y in 0..grid.height() {
        let row = &grid.cells()[y * width..(y + 1) * width];

        // Runs never cross a row boundary
        for run in row.chunk_by(|a, b| a.is_alive() == b.is_alive()) {
            lines.push(&token(run[0].is_alive(), run.len()));
        }

        lines.push(if y + 1 == grid.height() { "!" } else { "$" });
    }

    for line in lines.finish() {
        out.push_str(&line);
        out.push('\n');
    }

    out
}

fn token(alive: bool, n: usize) -> String {
    let tag = if alive { 'o' } else { 'b' };

    match n {
        1 => tag.to_string(),
        n => format!("{n}{tag}"),
    }
}

/// Lines of at most [`LINE_WIDTH`] bytes, built token by token.
#[derive(Default)]
struct Wrap {
    lines: Vec<String>,
    line: String,
}

impl Wrap {
    fn push(&mut self, token: &str) {
        if !self.line.is_empty() && self.line.len() + token.len() > LINE_WIDTH {
            self.lines.push(std::mem::take(&mut self.line));
        }

        self.line.push_str(token);
    }

    fn finish(mut self) -> Vec<String> {
        if !self.line.is_empty() {
            self.lines.push(self.line);
        }

        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::LINE_WIDTH;
    use super::write_rle;
    use super::write_rle_with_creator;
    use crate::grid::Fill;
    use crate::grid::Grid;
    use crate::rule_set::Rule;

    fn body(rle: &str) -> Vec<&str> {
        rle.lines().skip_while(|line| !line.starts_with('x')).skip(1).collect()
    }

    #[test]
    fn glider() {
        let mut grid = Grid::new(3, 3, Fill::Blank);
        grid.insert_pattern(&[" o ", "  o", "ooo"], 0, 0);

        let rle = write_rle_with_creator(&grid, "Glider", &["A spaceship".to_string()], "test");

        insta::assert_snapshot!(rle.trim_end(), @r"
        #N Glider
        #C A spaceship
        #O test
        x = 3, y = 3, rule = B3/S23
        bob$2bo$3o!
        ");
    }

    #[test]
    fn writes_grid_rule() {
        let mut grid = Grid::new(2, 1, Fill::Blank);
        grid.set_rule(Rule::lookup("B36/S23").unwrap());

        let rle = write_rle_with_creator(&grid, "Nothing", &[], "test");

        insta::assert_snapshot!(rle.trim_end(), @r"
        #N Nothing
        #O test
        x = 2, y = 1, rule = B36/S23
        2b!
        ");
    }

    #[test]
    fn runs_stop_at_row_end() {
        let mut grid = Grid::new(2, 2, Fill::Blank);
        grid.insert_pattern(&["oo", "oo"], 0, 0);

        let rle = write_rle_with_creator(&grid, "Block", &[], "test");

        assert_eq!(body(&rle), ["2o$2o!"]);
    }

    #[test]
    fn wraps_between_tokens() {
        let mut grid = Grid::new(168, 1, Fill::Blank);
        for x in 0..168 {
            grid.set_alive_at(x, 0, x >= 68 || x % 2 == 0);
        }

        let rle = write_rle_with_creator(&grid, "Wide", &[], "test");
        let lines = body(&rle);

        assert_eq!(lines, ["ob".repeat(34).as_str(), "100o!"]);
    }

    #[test]
    fn long_lines_are_filled() {
        let mut grid = Grid::new(80, 1, Fill::Blank);
        for x in (0..80).step_by(2) {
            grid.set_alive_at(x, 0, true);
        }

        let rle = write_rle_with_creator(&grid, "Stripes", &[], "test");
        let lines = body(&rle);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), LINE_WIDTH);
        assert_eq!(lines[1], "obobobobob!");
    }

    #[test]
    fn zero_width_grid() {
        let grid = Grid::new(0, 3, Fill::Blank);

        let rle = write_rle_with_creator(&grid, "Thin", &[], "test");

        assert_eq!(body(&rle), ["$$!"]);
    }

    #[test]
    fn empty_grid() {
        let grid = Grid::new(4, 0, Fill::Blank);

        let rle = write_rle_with_creator(&grid, "Empty", &[], "test");

        assert_eq!(body(&rle), ["!"]);
    }

    #[test]
    fn creator_names_crate() {
        let grid = Grid::new(1, 1, Fill::Blank);

        let rle = write_rle(&grid, "Dot", &[]);

        assert!(rle.contains(&format!("#O lifegrid {},", env!("CARGO_PKG_VERSION"))));
    }
}
