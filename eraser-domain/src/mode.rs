//! Overwrite standards and the pass sequences they write.
//!
//! Every mode maps to a non-empty, ordered list of [`PassSpec`]s. The erase
//! procedure writes them one after another over the whole file, syncing to the
//! medium after each pass.

use std::fmt;
use std::str::FromStr;

/// A single overwrite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassSpec {
    /// The same byte repeated across the file.
    Fixed(u8),
    /// A byte pattern repeated across the file, aligned to offset 0.
    Pattern(&'static [u8]),
    /// Uniformly distributed bytes from a seedable generator.
    Random,
}

impl PassSpec {
    pub fn is_random(&self) -> bool {
        matches!(self, PassSpec::Random)
    }
}

impl fmt::Display for PassSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassSpec::Fixed(byte) => write!(f, "0x{byte:02X}"),
            PassSpec::Pattern(pattern) => {
                if pattern.iter().all(u8::is_ascii_alphabetic) {
                    write!(f, "\"{}\"", String::from_utf8_lossy(pattern))
                } else {
                    f.write_str("0x")?;
                    pattern.iter().try_for_each(|b| write!(f, "{b:02X}"))
                }
            }
            PassSpec::Random => f.write_str("random"),
        }
    }
}

const SIMPLE: &[PassSpec] = &[PassSpec::Fixed(0x00)];

const OPENBSD: &[PassSpec] = &[
    PassSpec::Fixed(0xFF),
    PassSpec::Fixed(0x00),
    PassSpec::Random,
];

// DoD 5220.22-M (ECE)
const DOD: &[PassSpec] = &[
    PassSpec::Fixed(0xF6),
    PassSpec::Fixed(0x00),
    PassSpec::Fixed(0xFF),
    PassSpec::Random,
    PassSpec::Fixed(0x00),
    PassSpec::Fixed(0xFF),
    PassSpec::Random,
];

const DOE: &[PassSpec] = &[
    PassSpec::Random,
    PassSpec::Random,
    PassSpec::Pattern(b"DoE"),
];

const RCMP: &[PassSpec] = &[
    PassSpec::Fixed(0x00),
    PassSpec::Fixed(0xFF),
    PassSpec::Pattern(b"RCMP"),
];

const GUTMANN: &[PassSpec] = &[
    PassSpec::Random,
    PassSpec::Random,
    PassSpec::Random,
    PassSpec::Random,
    PassSpec::Fixed(0x55),
    PassSpec::Fixed(0xAA),
    PassSpec::Pattern(&[0x92, 0x49, 0x24]),
    PassSpec::Pattern(&[0x49, 0x24, 0x92]),
    PassSpec::Pattern(&[0x24, 0x92, 0x49]),
    PassSpec::Fixed(0x00),
    PassSpec::Fixed(0x11),
    PassSpec::Fixed(0x22),
    PassSpec::Fixed(0x33),
    PassSpec::Fixed(0x44),
    PassSpec::Fixed(0x55),
    PassSpec::Fixed(0x66),
    PassSpec::Fixed(0x77),
    PassSpec::Fixed(0x88),
    PassSpec::Fixed(0x99),
    PassSpec::Fixed(0xAA),
    PassSpec::Fixed(0xBB),
    PassSpec::Fixed(0xCC),
    PassSpec::Fixed(0xDD),
    PassSpec::Fixed(0xEE),
    PassSpec::Fixed(0xFF),
    PassSpec::Pattern(&[0x92, 0x49, 0x24]),
    PassSpec::Pattern(&[0x49, 0x24, 0x92]),
    PassSpec::Pattern(&[0x24, 0x92, 0x49]),
    PassSpec::Pattern(&[0x6D, 0xB6, 0xDB]),
    PassSpec::Pattern(&[0xB6, 0xDB, 0x6D]),
    PassSpec::Pattern(&[0xDB, 0x6D, 0xB6]),
    PassSpec::Random,
    PassSpec::Random,
    PassSpec::Random,
    PassSpec::Random,
];

/// A named overwrite standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverwriteMode {
    /// One pass of zeros.
    Simple,
    /// US Department of Energy M205.2-1.
    Doe,
    /// OpenBSD `rm -P` style.
    OpenBsd,
    /// Royal Canadian Mounted Police TSSIT OPS-II.
    Rcmp,
    /// US Department of Defense 5220.22-M (ECE).
    Dod,
    /// Peter Gutmann's 35 pass method.
    Gutmann,
}

impl OverwriteMode {
    pub const ALL: [OverwriteMode; 6] = [
        OverwriteMode::Simple,
        OverwriteMode::Doe,
        OverwriteMode::OpenBsd,
        OverwriteMode::Rcmp,
        OverwriteMode::Dod,
        OverwriteMode::Gutmann,
    ];

    pub fn passes(&self) -> &'static [PassSpec] {
        match self {
            OverwriteMode::Simple => SIMPLE,
            OverwriteMode::Doe => DOE,
            OverwriteMode::OpenBsd => OPENBSD,
            OverwriteMode::Rcmp => RCMP,
            OverwriteMode::Dod => DOD,
            OverwriteMode::Gutmann => GUTMANN,
        }
    }

    pub fn pass_count(&self) -> usize {
        self.passes().len()
    }

    /// The stable wire name of the mode.
    pub fn name(&self) -> &'static str {
        match self {
            OverwriteMode::Simple => "SIMPLE",
            OverwriteMode::Doe => "DOE",
            OverwriteMode::OpenBsd => "OPENBSD",
            OverwriteMode::Rcmp => "RCMP",
            OverwriteMode::Dod => "DOD",
            OverwriteMode::Gutmann => "GUTMANN",
        }
    }
}

impl Default for OverwriteMode {
    fn default() -> Self {
        OverwriteMode::Simple
    }
}

impl fmt::Display for OverwriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError(pub String);

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown overwrite mode: {}", self.0)
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for OverwriteMode {
    type Err = ParseModeError;

    // accepts both the short names and the `_MODE` suffixed ones
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let name = upper.strip_suffix("_MODE").unwrap_or(&upper);

        match name {
            "SIMPLE" => Ok(OverwriteMode::Simple),
            "DOE" => Ok(OverwriteMode::Doe),
            "OPENBSD" => Ok(OverwriteMode::OpenBsd),
            "RCMP" => Ok(OverwriteMode::Rcmp),
            "DOD" => Ok(OverwriteMode::Dod),
            "GUTMANN" | "GUTMAN" => Ok(OverwriteMode::Gutmann),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
