//! Employability rating scale.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical employability level, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmployabilityRating {
    #[serde(rename = "Muy bajo")]
    MuyBajo,
    #[serde(rename = "Bajo")]
    Bajo,
    #[serde(rename = "Medio")]
    Medio,
    #[serde(rename = "Bueno")]
    Bueno,
    #[serde(rename = "Muy bueno")]
    MuyBueno,
}

impl EmployabilityRating {
    pub const ALL: [EmployabilityRating; 5] = [
        EmployabilityRating::MuyBajo,
        EmployabilityRating::Bajo,
        EmployabilityRating::Medio,
        EmployabilityRating::Bueno,
        EmployabilityRating::MuyBueno,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EmployabilityRating::MuyBajo => "Muy bajo",
            EmployabilityRating::Bajo => "Bajo",
            EmployabilityRating::Medio => "Medio",
            EmployabilityRating::Bueno => "Bueno",
            EmployabilityRating::MuyBueno => "Muy bueno",
        }
    }

    /// Parses a rating phrase in any casing, tolerating extra inner whitespace.
    pub fn parse(phrase: &str) -> Option<Self> {
        let normalized = phrase
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        match normalized.as_str() {
            "muy bajo" => Some(EmployabilityRating::MuyBajo),
            "bajo" => Some(EmployabilityRating::Bajo),
            "medio" => Some(EmployabilityRating::Medio),
            "bueno" => Some(EmployabilityRating::Bueno),
            "muy bueno" => Some(EmployabilityRating::MuyBueno),
            _ => None,
        }
    }
}

impl fmt::Display for EmployabilityRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_any_casing_and_spacing() {
        assert_eq!(EmployabilityRating::parse("MUY   bueno"), Some(EmployabilityRating::MuyBueno));
        assert_eq!(EmployabilityRating::parse("medio"), Some(EmployabilityRating::Medio));
        assert_eq!(EmployabilityRating::parse(" Bajo "), Some(EmployabilityRating::Bajo));
        assert_eq!(EmployabilityRating::parse("excelente"), None);
    }

    #[test]
    fn display_capitalizes_first_letter_only() {
        assert_eq!(EmployabilityRating::MuyBajo.to_string(), "Muy bajo");
        assert_eq!(EmployabilityRating::MuyBueno.to_string(), "Muy bueno");
    }

    #[test]
    fn ratings_are_ordered() {
        assert!(EmployabilityRating::MuyBajo < EmployabilityRating::Bajo);
        assert!(EmployabilityRating::Bueno < EmployabilityRating::MuyBueno);
        assert_eq!(EmployabilityRating::ALL.len(), 5);
    }
}
