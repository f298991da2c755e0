//! Built-in suspicion categories and their patterns.
//!
//! Each category maps to exactly one keyword pattern. The table order is the
//! order in which matches are reported.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// How urgently a matched category should be looked at by an administrator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Worth a glance.
    Low,
    /// Needs follow-up.
    #[default]
    Medium,
    /// Likely attendance fraud.
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// One of the fixed suspicion categories checked against every comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuspicionCategory {
    /// A negation next to a presence word ("not here", "not present").
    ContradictoryPresence,
    /// Mentions of someone standing in for the student.
    ProxyAttendance,
    /// Admissions of faking or lying.
    Dishonesty,
    /// Mentions of being somewhere else.
    LocationInconsistency,
    /// Mentions of illness.
    HealthClaim,
}

impl SuspicionCategory {
    /// All categories, in reporting order.
    pub const ALL: [Self; 5] = [
        Self::ContradictoryPresence,
        Self::ProxyAttendance,
        Self::Dishonesty,
        Self::LocationInconsistency,
        Self::HealthClaim,
    ];

    /// Human-readable label shown to users and administrators.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ContradictoryPresence => "Contradictory presence statement",
            Self::ProxyAttendance => "Possible proxy attendance",
            Self::Dishonesty => "Dishonesty indicators",
            Self::LocationInconsistency => "Location inconsistency",
            Self::HealthClaim => "Health-related absence claim",
        }
    }

    /// The keyword pattern for this category.
    ///
    /// Patterns carry no word boundaries, so "still" matches the health
    /// pattern through "ill".
    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::ContradictoryPresence => r"not (here|present|attending)",
            Self::ProxyAttendance => r"someone else|friend|buddy",
            Self::Dishonesty => r"fake|pretend|lying",
            Self::LocationInconsistency => r"outside|home|away",
            Self::HealthClaim => r"sick|ill|doctor",
        }
    }

    /// Severity reported alongside the label.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::ContradictoryPresence | Self::Dishonesty => Severity::High,
            Self::ProxyAttendance => Severity::Medium,
            Self::LocationInconsistency | Self::HealthClaim => Severity::Low,
        }
    }

    /// Look up a built-in category by its label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for SuspicionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Compile a pattern the way every suspicion pattern is compiled.
///
/// # Errors
///
/// Returns the regex error if the pattern is invalid.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// A compiled suspicion pattern.
#[derive(Debug, Clone)]
pub struct SuspicionPattern {
    /// Label reported when the pattern matches.
    pub label: String,

    /// Severity attached to the label.
    pub severity: Severity,

    regex: Regex,
}

impl SuspicionPattern {
    /// Compile a new pattern. Matching is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns the regex error if the pattern is invalid.
    pub fn new(
        label: impl Into<String>,
        severity: Severity,
        pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            label: label.into(),
            severity,
            regex: compile_pattern(pattern)?,
        })
    }

    /// Build the pattern for a built-in category.
    ///
    /// # Panics
    ///
    /// Panics if the built-in regex is invalid.
    #[must_use]
    pub fn builtin(category: SuspicionCategory) -> Self {
        Self::new(category.label(), category.severity(), category.pattern())
            .expect("Invalid built-in regex pattern")
    }

    /// Check if the text matches this pattern.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// The source of the compiled regex.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Get the compiled patterns for every built-in category, in reporting order.
#[must_use]
pub fn builtin_patterns() -> Vec<SuspicionPattern> {
    SuspicionCategory::ALL
        .into_iter()
        .map(SuspicionPattern::builtin)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_for(category: SuspicionCategory) -> SuspicionPattern {
        SuspicionPattern::builtin(category)
    }

    #[test]
    fn test_all_in_reporting_order() {
        let labels: Vec<_> = SuspicionCategory::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec![
                "Contradictory presence statement",
                "Possible proxy attendance",
                "Dishonesty indicators",
                "Location inconsistency",
                "Health-related absence claim",
            ]
        );
    }

    #[test]
    fn test_builtin_patterns_follow_table() {
        let patterns = builtin_patterns();
        assert_eq!(patterns.len(), SuspicionCategory::ALL.len());
        for (pattern, category) in patterns.iter().zip(SuspicionCategory::ALL) {
            assert_eq!(pattern.label, category.label());
            assert_eq!(pattern.severity, category.severity());
            assert_eq!(pattern.as_str(), category.pattern());
        }
    }

    #[test]
    fn test_contradictory_presence_pattern() {
        let p = pattern_for(SuspicionCategory::ContradictoryPresence);
        assert!(p.matches("I am not here today"));
        assert!(p.matches("NOT PRESENT"));
        assert!(p.matches("not attending the lab"));
        assert!(!p.matches("I am here"));
        assert!(!p.matches("not really"));
    }

    #[test]
    fn test_proxy_pattern() {
        let p = pattern_for(SuspicionCategory::ProxyAttendance);
        assert!(p.matches("my friend covered for me"));
        assert!(p.matches("Someone Else signed"));
        assert!(p.matches("buddy"));
        assert!(!p.matches("on my own"));
    }

    #[test]
    fn test_dishonesty_pattern() {
        let p = pattern_for(SuspicionCategory::Dishonesty);
        assert!(p.matches("FAKE"));
        assert!(p.matches("pretending"));
        assert!(p.matches("stop lying"));
        assert!(!p.matches("honest"));
    }

    #[test]
    fn test_location_pattern() {
        let p = pattern_for(SuspicionCategory::LocationInconsistency);
        assert!(p.matches("went outside"));
        assert!(p.matches("at HOME"));
        assert!(p.matches("away"));
        assert!(!p.matches("in room 101"));
    }

    #[test]
    fn test_health_pattern_has_no_word_boundaries() {
        let p = pattern_for(SuspicionCategory::HealthClaim);
        assert!(p.matches("sick"));
        assert!(p.matches("saw the doctor"));
        // "still" contains "ill"
        assert!(p.matches("still on time"));
        assert!(!p.matches("fine"));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert_eq!(Severity::default(), Severity::Medium);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::High.to_string(), "High");
        assert_eq!(Severity::Low.to_string(), "Low");
    }

    #[test]
    fn test_from_label() {
        assert_eq!(
            SuspicionCategory::from_label("Possible proxy attendance"),
            Some(SuspicionCategory::ProxyAttendance)
        );
        assert_eq!(SuspicionCategory::from_label("nope"), None);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(SuspicionPattern::new("bad", Severity::Low, "[unclosed").is_err());
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&SuspicionCategory::HealthClaim).unwrap();
        assert_eq!(json, "\"health_claim\"");
    }
}
