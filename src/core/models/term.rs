//! Term model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two exchange terms a plan can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Autumn term ("Høst")
    Autumn,
    /// Spring term ("Vår")
    Spring,
}

impl Term {
    /// Catalog-key token for this term
    #[must_use]
    pub const fn key_token(self) -> &'static str {
        match self {
            Self::Autumn => "host",
            Self::Spring => "var",
        }
    }

    /// Norwegian display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Autumn => "Høst",
            Self::Spring => "Vår",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "høst" | "host" | "autumn" | "fall" => Ok(Self::Autumn),
            "vår" | "var" | "spring" => Ok(Self::Spring),
            other => Err(format!("Unknown term: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_term() {
        assert_eq!("Høst".parse::<Term>().unwrap(), Term::Autumn);
        assert_eq!("host".parse::<Term>().unwrap(), Term::Autumn);
        assert_eq!("autumn".parse::<Term>().unwrap(), Term::Autumn);
        assert_eq!("Vår".parse::<Term>().unwrap(), Term::Spring);
        assert_eq!("spring".parse::<Term>().unwrap(), Term::Spring);
        assert!("midsummer".parse::<Term>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Term::Autumn.label(), "Høst");
        assert_eq!(Term::Spring.label(), "Vår");
        assert_eq!(Term::Autumn.key_token(), "host");
        assert_eq!(Term::Spring.key_token(), "var");
    }
}
