//! Phase module - the closed vocabulary of reported alloy phases

use std::fmt;
use std::str::FromStr;

/// Phase reported for an alloy
///
/// The vocabulary is closed: body-centred cubic, face-centred cubic,
/// intermetallic, and their combinations. Combinations are rendered with
/// `" + "` in a fixed component order (FCC, BCC, Im).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Body-centred cubic
    Bcc,

    /// Face-centred cubic
    Fcc,

    /// Intermetallic
    Im,

    /// FCC and BCC
    FccBcc,

    /// BCC and intermetallic
    BccIm,

    /// FCC and intermetallic
    FccIm,

    /// FCC, BCC and intermetallic
    FccBccIm,
}

/// Error returned when a string is not part of the phase vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseParseError(pub String);

impl fmt::Display for PhaseParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown phase '{}'", self.0)
    }
}

impl std::error::Error for PhaseParseError {}

impl Phase {
    /// Every label in the vocabulary
    pub const ALL: [Phase; 7] = [
        Phase::Bcc,
        Phase::Fcc,
        Phase::Im,
        Phase::FccBcc,
        Phase::BccIm,
        Phase::FccIm,
        Phase::FccBccIm,
    ];

    /// Canonical label
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Bcc => "BCC",
            Phase::Fcc => "FCC",
            Phase::Im => "Im",
            Phase::FccBcc => "FCC + BCC",
            Phase::BccIm => "BCC + Im",
            Phase::FccIm => "FCC + Im",
            Phase::FccBccIm => "FCC + BCC + Im",
        }
    }

    /// Parse a phase label
    ///
    /// Components are matched case-insensitively and in any order, with or
    /// without spaces around `+`. Repeated components collapse.
    ///
    /// # Examples
    ///
    /// ```
    /// use phasemine_domain::Phase;
    ///
    /// assert_eq!(Phase::parse("bcc+fcc"), Some(Phase::FccBcc));
    /// assert_eq!(Phase::parse("Im + BCC"), Some(Phase::BccIm));
    /// assert_eq!(Phase::parse("HCP"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        let (mut fcc, mut bcc, mut im) = (false, false, false);
        for component in s.split('+') {
            match component.trim().to_ascii_lowercase().as_str() {
                "fcc" => fcc = true,
                "bcc" => bcc = true,
                "im" => im = true,
                _ => return None,
            }
        }

        match (fcc, bcc, im) {
            (false, true, false) => Some(Phase::Bcc),
            (true, false, false) => Some(Phase::Fcc),
            (false, false, true) => Some(Phase::Im),
            (true, true, false) => Some(Phase::FccBcc),
            (false, true, true) => Some(Phase::BccIm),
            (true, false, true) => Some(Phase::FccIm),
            (true, true, true) => Some(Phase::FccBccIm),
            (false, false, false) => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = PhaseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::parse(s).ok_or_else(|| PhaseParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_labels_parse_to_themselves() {
        for phase in Phase::ALL {
            assert_eq!(Phase::parse(phase.as_str()), Some(phase));
        }
    }

    #[test]
    fn test_parse_is_order_and_case_insensitive() {
        assert_eq!(Phase::parse("BCC + FCC"), Some(Phase::FccBcc));
        assert_eq!(Phase::parse("im+fcc+bcc"), Some(Phase::FccBccIm));
        assert_eq!(Phase::parse(" IM "), Some(Phase::Im));
    }

    #[test]
    fn test_repeated_components_collapse() {
        assert_eq!(Phase::parse("BCC + FCC + FCC"), Some(Phase::FccBcc));
    }

    #[test]
    fn test_unknown_components_rejected() {
        assert_eq!(Phase::parse("FCC + B2"), None);
        assert_eq!(Phase::parse(""), None);
        assert_eq!(Phase::parse("+"), None);
        assert!("Laves".parse::<Phase>().is_err());
    }
}
