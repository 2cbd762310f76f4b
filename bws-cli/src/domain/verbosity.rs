use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output detail tier. Ordered: every tier shows everything the lower ones do.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    #[value(alias = "q")]
    Quiet,
    #[value(alias = "m")]
    Minimal,
    #[default]
    #[value(alias = "n")]
    Normal,
    #[value(alias = "d")]
    Detailed,
    #[value(alias = "diag")]
    Diagnostic,
}

impl Verbosity {
    pub fn shows(self, tier: Self) -> bool {
        self >= tier
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet | Self::Minimal | Self::Normal => "warn",
            Self::Detailed => "info",
            Self::Diagnostic => "debug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(Verbosity::Quiet < Verbosity::Minimal);
        assert!(Verbosity::Minimal < Verbosity::Normal);
        assert!(Verbosity::Normal < Verbosity::Detailed);
        assert!(Verbosity::Detailed < Verbosity::Diagnostic);
    }

    #[test]
    fn test_shows() {
        assert!(Verbosity::Detailed.shows(Verbosity::Normal));
        assert!(!Verbosity::Minimal.shows(Verbosity::Normal));
        assert!(Verbosity::Quiet.shows(Verbosity::Quiet));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Verbosity::from_str("diag", true), Ok(Verbosity::Diagnostic));
        assert_eq!(Verbosity::from_str("q", true), Ok(Verbosity::Quiet));
        assert_eq!(Verbosity::from_str("detailed", true), Ok(Verbosity::Detailed));
    }
}
