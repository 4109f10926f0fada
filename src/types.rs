use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of aggregate entry point class produced after per-class generation.
///
/// - `Standard`: the plain `Assertions` class.
/// - `Bdd`: `BddAssertions` (`then(...)` style).
/// - `Soft`: `SoftAssertions`.
/// - `JunitSoft`: `JUnitSoftAssertions`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntryPointType {
    Standard,
    Bdd,
    Soft,
    JunitSoft,
}

impl EntryPointType {
    pub const ALL: [EntryPointType; 4] = [
        EntryPointType::Standard,
        EntryPointType::Bdd,
        EntryPointType::Soft,
        EntryPointType::JunitSoft,
    ];

    /// Identifier used in config and in the generator environment.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryPointType::Standard => "standard",
            EntryPointType::Bdd => "bdd",
            EntryPointType::Soft => "soft",
            EntryPointType::JunitSoft => "junit_soft",
        }
    }

    /// Name of the generated entry point class.
    pub fn class_name(self) -> &'static str {
        match self {
            EntryPointType::Standard => "Assertions",
            EntryPointType::Bdd => "BddAssertions",
            EntryPointType::Soft => "SoftAssertions",
            EntryPointType::JunitSoft => "JUnitSoftAssertions",
        }
    }
}

impl fmt::Display for EntryPointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryPointType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "standard" => Ok(EntryPointType::Standard),
            "bdd" => Ok(EntryPointType::Bdd),
            "soft" => Ok(EntryPointType::Soft),
            "junit_soft" | "junitsoft" => Ok(EntryPointType::JunitSoft),
            other => Err(format!(
                "invalid entry point type: {other} (expected one of \"standard\", \"bdd\", \"soft\", \"junit_soft\")"
            )),
        }
    }
}

/// How per-class assertions are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// One independent assertion class per input class.
    Flat,
    /// Abstract + concrete assertion classes that reference their siblings.
    Hierarchical,
}

impl GenerationMode {
    pub fn from_hierarchical(hierarchical: bool) -> Self {
        if hierarchical {
            GenerationMode::Hierarchical
        } else {
            GenerationMode::Flat
        }
    }
}
