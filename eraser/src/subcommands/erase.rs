use anyhow::{Context, Result};
use domain::{AbortHandle, FsEraser};
use paris::Logger;
use std::fs;

use crate::cli::prompt::get_answer;
use crate::global::parameters::EraseParams;
use crate::global::states::ForceMode;

#[derive(Debug, PartialEq, Eq)]
enum Target {
    File,
    Dir,
}

// decides what the input is, asking before a whole directory gets erased
// returns None if the user backed out
fn confirm_target(input: &str, force: ForceMode) -> Result<Option<Target>> {
    // a missing input is reported by the eraser itself
    let is_dir = fs::symlink_metadata(input)
        .map(|meta| meta.is_dir())
        .unwrap_or(false);

    if !is_dir {
        return Ok(Some(Target::File));
    }

    let confirmed = get_answer(
        &format!("{input} is a directory, would you like to erase all files within it?"),
        false,
        force,
    )?;
    Ok(confirmed.then_some(Target::Dir))
}

// this function securely erases a file, or every file within a directory
// read the docs for some caveats with file-erasure on flash storage
#[allow(clippy::module_name_repetitions)]
pub fn secure_erase(input: &str, params: &EraseParams) -> Result<()> {
    let target = match confirm_target(input, params.force)? {
        Some(target) => target,
        None => return Ok(()),
    };

    let mut logger = Logger::new();

    let mut eraser = FsEraser::default();
    if let Some(seed) = params.seed {
        eraser = eraser.with_seed(seed);
    }
    // ctrl-c at the prompt must still kill the process
    watch_interrupts(eraser.abort_handle())?;

    match target {
        Target::Dir => {
            logger.loading(format!(
                "Erasing files in {} with {} (this may take a while)",
                input, params.mode
            ));

            let res = eraser.erase_directory_with_mode(
                input,
                params.mode,
                params.directory_mode.is_recursive(),
            );
            logger.done();
            let res = res.with_context(|| format!("Unable to erase directory: {}", input))?;

            logger.success(format!(
                "Erased {} files in {} successfully [took {:.2}s]",
                res.files_erased,
                input,
                res.elapsed.as_secs_f32()
            ));
        }
        Target::File => {
            logger.loading(format!(
                "Erasing {} with {} (this may take a while)",
                input, params.mode
            ));

            let res = eraser.erase_file_with_mode(input, params.mode);
            logger.done();
            let res = res.with_context(|| format!("Unable to erase file: {}", input))?;

            logger.success(format!(
                "Erased {} successfully with {} passes [took {:.2}s]",
                input,
                res.passes,
                res.elapsed.as_secs_f32()
            ));
        }
    }

    Ok(())
}

// ctrl-c stops the eraser before the next file, never in the middle of a pass
#[cfg(unix)]
fn watch_interrupts(abort: AbortHandle) -> Result<()> {
    use signal_hook::{consts::SIGINT, iterator::Signals};

    let mut signals = Signals::new([SIGINT]).context("Unable to listen for interrupts")?;

    std::thread::spawn(move || {
        for _ in signals.forever() {
            paris::warn!("Interrupted - stopping once the current file is done");
            abort.abort();
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn watch_interrupts(_abort: AbortHandle) -> Result<()> {
    Ok(())
}
