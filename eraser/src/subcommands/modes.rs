use domain::mode::OverwriteMode;
use paris::Logger;

pub fn list() {
    let mut logger = Logger::new();

    for mode in OverwriteMode::ALL {
        logger.info(describe(mode));
    }
}

fn describe(mode: OverwriteMode) -> String {
    let passes = mode
        .passes()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "<bold>{}</> ({} {}): {}",
        mode.name(),
        mode.pass_count(),
        if mode.pass_count() == 1 { "pass" } else { "passes" },
        passes
    )
}
