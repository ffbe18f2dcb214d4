#![forbid(unsafe_code)]
#![warn(clippy::all)]

use anyhow::Result;

mod cli;
mod global;
mod subcommands;

// subcommand dispatch, everything else lives in `subcommands.rs`
fn main() -> Result<()> {
    let matches = cli::get_matches();

    match matches.subcommand() {
        Some(("erase", sub_matches)) => {
            subcommands::erase(sub_matches)?;
        }
        Some(("modes", _)) => {
            subcommands::modes();
        }
        _ => (),
    }
    Ok(())
}
