// this file handles getting parameters from clap's ArgMatches
// it returns information (e.g. the overwrite mode) in structs
// anything invalid is either reported, or replaced with a default and a warning

use anyhow::{Context, Result};
use clap::ArgMatches;
use domain::mode::OverwriteMode;
use paris::warn;

use super::states::{DirectoryMode, ForceMode, PrintMode};

pub struct EraseParams {
    pub mode: OverwriteMode,
    pub directory_mode: DirectoryMode,
    pub force: ForceMode,
    pub seed: Option<u64>,
    pub print_mode: PrintMode,
}

pub fn get_param(name: &str, sub_matches: &ArgMatches) -> Result<String> {
    let value = sub_matches
        .value_of(name)
        .with_context(|| format!("No {} provided", name))?
        .to_string();
    Ok(value)
}

pub fn forcemode(sub_matches: &ArgMatches) -> ForceMode {
    if sub_matches.is_present("force") {
        ForceMode::Force
    } else {
        ForceMode::Prompt
    }
}

pub fn erase_params(sub_matches: &ArgMatches) -> Result<EraseParams> {
    let mode = match sub_matches.value_of("mode") {
        Some(name) => name
            .parse::<OverwriteMode>()
            .map_err(domain::ConfigurationError::from)
            .context("Run `eraser modes` to see the available modes")?,
        None => OverwriteMode::default(),
    };

    let directory_mode = if sub_matches.is_present("recursive") {
        DirectoryMode::Recursive
    } else {
        DirectoryMode::Singular
    };

    let seed = match sub_matches.value_of("seed") {
        Some(value) => {
            if let Ok(seed) = value.parse::<u64>() {
                Some(seed)
            } else {
                warn!("Unable to read the seed provided - using a random one.");
                None
            }
        }
        None => None,
    };

    let print_mode = if sub_matches.is_present("verbose") {
        PrintMode::Verbose
    } else {
        PrintMode::Quiet
    };

    Ok(EraseParams {
        mode,
        directory_mode,
        force: forcemode(sub_matches),
        seed,
        print_mode,
    })
}
