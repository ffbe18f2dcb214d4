use clap::{Arg, Command};

pub mod prompt;

pub fn command() -> Command<'static> {
    Command::new("eraser")
        .version(clap::crate_version!())
        .about("Multi-pass secure erasure of files and directories.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("erase")
                .short_flag('e')
                .about("Overwrite a file or directory and remove it")
                .arg(
                    Arg::new("input")
                        .value_name("input")
                        .takes_value(true)
                        .required(true)
                        .help("The file or directory to erase"),
                )
                .arg(
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .value_name("mode")
                        .takes_value(true)
                        .require_equals(true)
                        .help("The overwrite mode to use (default is SIMPLE, see `eraser modes`)"),
                )
                .arg(
                    Arg::new("recursive")
                        .short('r')
                        .long("recursive")
                        .takes_value(false)
                        .help("Also erase every sub-directory of a directory"),
                )
                .arg(
                    Arg::new("force")
                        .short('f')
                        .long("force")
                        .takes_value(false)
                        .help("Don't ask before erasing a directory"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_name("seed")
                        .takes_value(true)
                        .require_equals(true)
                        .help("Seed the random passes (reproducible, for testing only)"),
                )
                .arg(
                    Arg::new("verbose")
                        .short('v')
                        .long("verbose")
                        .takes_value(false)
                        .help("Show every pass as it is written"),
                ),
        )
        .subcommand(Command::new("modes").about("List the available overwrite modes"))
}

// returns the ArgMatches so that main can send everything to the correct place
pub fn get_matches() -> clap::ArgMatches {
    command().get_matches()
}
