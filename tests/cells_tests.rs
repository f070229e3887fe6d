use lifegrid::grid::Fill;
use lifegrid::grid::Grid;
use lifegrid::library;
use lifegrid::library::PatternFileError;
use lifegrid::pattern::PatternParseError;

#[test]
fn test_directory() -> anyhow::Result<()> {
    let items = library::read_directory("tests/cells_pats")?;
    let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();

    // untitled.cells has no name and is skipped
    assert_eq!(titles, ["Beacon", "Glider", "Pentadecathlon"]);

    Ok(())
}

#[test]
fn test_missing_name() {
    let err = library::read_pattern_file("tests/cells_pats/untitled.cells").unwrap_err();

    assert!(matches!(
        err,
        PatternFileError::Parse(PatternParseError::MissingTitle)
    ));
}

#[test]
fn test_unsupported_extension() {
    let err = library::read_pattern_file("Cargo.toml").unwrap_err();

    assert!(matches!(err, PatternFileError::UnsupportedExtension { .. }));
}

#[test]
fn test_missing_file() {
    let err = library::read_pattern_file("tests/cells_pats/nothing.cells").unwrap_err();

    assert!(matches!(err, PatternFileError::Io(_)));
}

#[test]
fn test_pentadecathlon_period() -> anyhow::Result<()> {
    let item = library::read_pattern_file("tests/cells_pats/pentadecathlon.txt")?;

    assert_eq!(item.author, "John Conway");
    assert_eq!((item.width(), item.height()), (10, 3));

    let mut grid = Grid::new(18, 11, Fill::Blank);
    grid.insert(&item, 4, 4);

    let start = grid.clone();

    for _ in 0..15 {
        grid.step();
    }

    for (x, y, cell) in start.iter_cells() {
        assert_eq!(grid.is_alive_at(x, y), cell.is_alive());
    }
    assert_eq!(grid.turns(), 15);

    Ok(())
}

#[test]
fn test_load_pattern_grows_grid() -> anyhow::Result<()> {
    let item = library::read_pattern_file("tests/cells_pats/glider.cells")?;

    let mut grid = Grid::new(2, 10, Fill::Blank);
    grid.load_pattern(&item);

    assert_eq!((grid.width(), grid.height()), (3, 10));
    assert_eq!(grid.population(), 5);

    Ok(())
}
