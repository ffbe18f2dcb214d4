// this file contains enums found all around the codebase
// they act as toggles for certain features, so they can be
// enabled if selected by the user

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum DirectoryMode {
    Singular,
    Recursive,
}

impl DirectoryMode {
    pub fn is_recursive(self) -> bool {
        self == DirectoryMode::Recursive
    }
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ForceMode {
    Force,
    Prompt,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum PrintMode {
    Verbose,
    Quiet,
}

impl PrintMode {
    // `RUST_LOG` still wins over this
    pub fn log_level(self) -> &'static str {
        match self {
            PrintMode::Verbose => "debug",
            PrintMode::Quiet => "warn",
        }
    }
}
