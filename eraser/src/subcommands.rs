use anyhow::Result;
use clap::ArgMatches;

// this is called from main.rs
// it gets params and sends them to the appropriate functions

use crate::global::{
    parameters::{erase_params, get_param},
    states::PrintMode,
};

pub mod erase;
pub mod modes;

pub fn erase(sub_matches: &ArgMatches) -> Result<()> {
    let params = erase_params(sub_matches)?;
    init_logger(params.print_mode);

    erase::secure_erase(&get_param("input", sub_matches)?, &params)
}

pub fn modes() {
    modes::list();
}

// the eraser's own log records go to stderr, `RUST_LOG` overrides the level
fn init_logger(print_mode: PrintMode) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(print_mode.log_level()),
    )
    .format_timestamp(None)
    .init();
}
