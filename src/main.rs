use std::fs;
use std::path::Path;

use anyhow::Context;
use anyhow::bail;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use lifegrid::grid::Fill;
use lifegrid::grid::Grid;
use lifegrid::library;
use lifegrid::pattern::PatternItem;
use lifegrid::rle;
use lifegrid::rule_set::Rule;
use lifegrid::settings::Compression;

use args::Action;

mod args;

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match Action::parse() {
        Action::New {
            width,
            height,
            output,
            random,
        } => {
            let fill = if random { Fill::Random } else { Fill::Blank };
            let grid = Grid::new(width, height, fill);

            save(&grid, &output)
        }

        Action::Run {
            input,
            generations,
            output,
            rule,
            raw,
        } => {
            let mut grid = open(&input)?;

            if let Some(rule) = rule {
                let rule = Rule::lookup(&rule).context("Invalid --rule")?;
                grid.set_rule(rule);
            }

            if raw {
                let mut settings = grid.settings().clone();
                settings.compression = Compression::Raw;
                grid.set_settings(settings);
            }

            for _ in 0..generations {
                grid.step();
            }

            info!(
                turns = grid.turns(),
                population = grid.population(),
                "Done stepping"
            );

            match output {
                Some(output) => save(&grid, &output),
                None => {
                    describe(&grid);
                    Ok(())
                }
            }
        }

        Action::Info { file } => {
            let grid = open(&file)?;
            describe(&grid);

            Ok(())
        }

        Action::Library { dir } => {
            match dir {
                Some(dir) => {
                    let items = library::read_directory(&dir)
                        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

                    for item in &items {
                        list(item);
                    }
                }
                None => {
                    for group in library::builtin() {
                        println!("{}", group.title);

                        for item in &group.items {
                            list(item);
                        }
                    }
                }
            }

            Ok(())
        }

        Action::Rules => {
            for rule in Rule::available() {
                println!("{}", rule.display_title());
            }

            Ok(())
        }
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Read a save file, or a pattern centered on an empty grid.
fn open(path: &Path) -> anyhow::Result<Grid> {
    if extension(path) == "gol" {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

        return Grid::deserialize(&bytes)
            .with_context(|| format!("Failed to load {}", path.display()));
    }

    let item = library::read_pattern_file(path)
        .with_context(|| format!("Failed to read pattern {}", path.display()))?;

    let mut grid = Grid::new(0, 0, Fill::Blank);
    grid.load_pattern(&item);

    if !item.rule.is_empty() {
        match Rule::lookup(&item.rule) {
            Ok(rule) => grid.set_rule(rule),
            Err(e) => warn!("Ignoring the rule of {}: {e}", path.display()),
        }
    }

    Ok(grid)
}

fn save(grid: &Grid, path: &Path) -> anyhow::Result<()> {
    let data = match extension(path).as_str() {
        "gol" => grid.serialize(),
        "rle" => {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();

            rle::write_rle(grid, &name, &[]).into_bytes()
        }
        ext => bail!("Cannot save as {ext:?}, use .gol or .rle"),
    };

    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Saved {}", path.display());

    Ok(())
}

fn describe(grid: &Grid) {
    println!("size:       {}x{}", grid.width(), grid.height());
    println!("population: {}", grid.population());
    println!("turns:      {}", grid.turns());
    println!("rule:       {}", grid.rule().display_title());
}

fn list(item: &PatternItem) {
    let mut line = format!("  {} ({}x{})", item.title, item.width(), item.height());

    if !item.author.is_empty() {
        line.push_str(&format!(" by {}", item.author));
    }

    println!("{line}");
}
