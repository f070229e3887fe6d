//! Parsing command-line arguments.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap::value_parser;

/// What the user asked for.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Write a new save file
    New {
        width: usize,
        height: usize,
        output: PathBuf,
        random: bool,
    },

    /// Load a grid or pattern, step it and optionally write the result
    Run {
        input: PathBuf,
        generations: u64,
        output: Option<PathBuf>,
        rule: Option<String>,
        raw: bool,
    },

    Info { file: PathBuf },

    /// Patterns of a directory, or the built-in ones
    Library { dir: Option<PathBuf> },

    Rules,
}

pub(crate) fn command() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Run Life-like cellular automata on a bounded grid")
        .long_about(
            "Run Life-like cellular automata on a bounded grid.\n\
             \n\
             Grids are saved in the binary .gol format. Patterns are read from \n\
             Plaintext (.cells, .txt) and RLE (.rle) files, and grids can be \n\
             exported as RLE.\n\
             \n\
             Set RUST_LOG (e.g. RUST_LOG=debug) for more output.",
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("new")
                .about("Create a grid and save it")
                .arg(
                    Arg::new("WIDTH")
                        .help("Width of the grid")
                        .required(true)
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("HEIGHT")
                        .help("Height of the grid")
                        .required(true)
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("OUTPUT")
                        .help("Where to write the grid, .gol or .rle")
                        .short('o')
                        .long("output")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("RANDOM")
                        .help("Bring about a third of the cells to life")
                        .short('r')
                        .long("random")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Advance a grid or a pattern by some generations")
                .arg(
                    Arg::new("INPUT")
                        .help("A .gol save file or a .rle, .cells or .txt pattern")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("GENERATIONS")
                        .help("Number of generations to compute")
                        .short('g')
                        .long("generations")
                        .default_value("1")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("OUTPUT")
                        .help("Where to write the result, .gol or .rle")
                        .short('o')
                        .long("output")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("RULE")
                        .help("Rule to run, a registry name or B<digits>/S<digits>")
                        .long("rule"),
                )
                .arg(
                    Arg::new("RAW")
                        .help("Do not compress .gol output")
                        .long("raw")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("info")
                .about("Describe a save file or a pattern")
                .arg(
                    Arg::new("FILE")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("library")
                .about("List the patterns of a directory, or the built-in ones")
                .arg(
                    Arg::new("DIR")
                        .help("Directory to scan. Omit to list the built-in patterns")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("rules").about("List the well-known rules"))
}

impl Action {
    /// Parse the process arguments, exiting on error.
    pub(crate) fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    #[cfg(test)]
    pub(crate) fn try_parse_from<I, T>(args: I) -> clap::error::Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::from_matches(&command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        let path = |m: &ArgMatches, id: &str| m.get_one::<PathBuf>(id).cloned().unwrap_or_default();

        match matches.subcommand() {
            Some(("new", m)) => Action::New {
                width: m.get_one::<usize>("WIDTH").copied().unwrap_or_default(),
                height: m.get_one::<usize>("HEIGHT").copied().unwrap_or_default(),
                output: path(m, "OUTPUT"),
                random: m.get_flag("RANDOM"),
            },
            Some(("run", m)) => Action::Run {
                input: path(m, "INPUT"),
                generations: m.get_one::<u64>("GENERATIONS").copied().unwrap_or(1),
                output: m.get_one::<PathBuf>("OUTPUT").cloned(),
                rule: m.get_one::<String>("RULE").cloned(),
                raw: m.get_flag("RAW"),
            },
            Some(("info", m)) => Action::Info {
                file: path(m, "FILE"),
            },
            Some(("library", m)) => Action::Library {
                dir: m.get_one::<PathBuf>("DIR").cloned(),
            },
            _ => Action::Rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::Action;
    use super::command;

    #[test]
    fn command_is_consistent() {
        command().debug_assert();
    }

    #[test]
    fn new() {
        let action = Action::try_parse_from(["lifegrid", "new", "40", "30", "-o", "a.gol", "-r"]);

        assert_eq!(
            action.unwrap(),
            Action::New {
                width: 40,
                height: 30,
                output: PathBuf::from("a.gol"),
                random: true,
            }
        );
    }

    #[test]
    fn run_defaults() {
        let action = Action::try_parse_from(["lifegrid", "run", "glider.rle"]);

        assert_eq!(
            action.unwrap(),
            Action::Run {
                input: PathBuf::from("glider.rle"),
                generations: 1,
                output: None,
                rule: None,
                raw: false,
            }
        );
    }

    #[test]
    fn run_with_options() {
        let action = Action::try_parse_from([
            "lifegrid",
            "run",
            "a.gol",
            "--generations",
            "100",
            "--rule",
            "B36/S23",
            "--raw",
            "-o",
            "b.gol",
        ]);

        assert_eq!(
            action.unwrap(),
            Action::Run {
                input: PathBuf::from("a.gol"),
                generations: 100,
                output: Some(PathBuf::from("b.gol")),
                rule: Some("B36/S23".to_string()),
                raw: true,
            }
        );
    }

    #[test]
    fn library_without_dir() {
        let action = Action::try_parse_from(["lifegrid", "library"]).unwrap();

        assert_eq!(action, Action::Library { dir: None });
    }

    #[test]
    fn rejects_bad_size() {
        assert!(Action::try_parse_from(["lifegrid", "new", "-3", "2", "-o", "a.gol"]).is_err());
        assert!(Action::try_parse_from(["lifegrid", "new", "3", "2"]).is_err());
    }

    #[test]
    fn requires_subcommand() {
        assert!(Action::try_parse_from(["lifegrid"]).is_err());
    }
}
