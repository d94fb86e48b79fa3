//! Incident and inventory record types

use serde::{Deserialize, Serialize};

/// Severity vocabulary used by the triage flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical,
    Moderate,
    Minor,
}

impl Severity {
    /// The full vocabulary, in schema order.
    pub fn labels() -> [&'static str; 3] {
        [
            Severity::Critical.as_str(),
            Severity::Moderate.as_str(),
            Severity::Minor.as_str(),
        ]
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "moderate" => Some(Severity::Moderate),
            "minor" => Some(Severity::Minor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Moderate => "Moderate",
            Severity::Minor => "Minor",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reported incident. Created only by the `log_incident` tool; rows are
/// never updated or deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: i64,
    /// Always one of [`Severity::labels`]; normalized on insert.
    pub severity: String,
    pub location: String,
    pub needs: String,
    pub status: String,
    pub created_at: String,
}

/// A relief supply row. Seeded at startup and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item: String,
    pub quantity: i64,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_str() {
        assert_eq!(Severity::from_str("critical"), Some(Severity::Critical));
        assert_eq!(Severity::from_str("Moderate"), Some(Severity::Moderate));
        assert_eq!(Severity::from_str("MINOR"), Some(Severity::Minor));
        assert_eq!(Severity::from_str("urgent"), None);
    }
}
