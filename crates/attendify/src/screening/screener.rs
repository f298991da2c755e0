//! The comment screener.
//!
//! Runs every configured suspicion pattern against a comment and reports the
//! labels that matched, in pattern order.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::categories::{builtin_patterns, Severity, SuspicionPattern};

/// A user-supplied pattern checked after the built-in categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPattern {
    /// Label reported when the pattern matches.
    pub label: String,

    /// Regex source, matched case-insensitively.
    pub pattern: String,

    /// Severity attached to matches.
    #[serde(default)]
    pub severity: Severity,
}

/// Configuration for the comment screener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    /// Whether screening is enabled.
    pub enabled: bool,

    /// Whether to check the built-in categories.
    pub use_builtin_patterns: bool,

    /// Extra patterns, appended after the built-in ones.
    pub custom_patterns: Vec<CustomPattern>,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            use_builtin_patterns: true,
            custom_patterns: Vec::new(),
        }
    }
}

/// A single matched category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The category label.
    pub label: String,

    /// The category severity.
    pub severity: Severity,
}

/// The outcome of screening one comment.
///
/// Findings are in pattern order and never repeat a pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningResult {
    findings: Vec<Finding>,
}

impl ScreeningResult {
    /// The matched findings, in pattern order.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// The matched labels, in pattern order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.label.as_str()).collect()
    }

    /// True if nothing matched.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Number of matched patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Same as [`ScreeningResult::is_clean`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_clean()
    }

    /// Check whether a label was matched.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.findings.iter().any(|f| f.label == label)
    }

    /// The most severe finding, if any.
    #[must_use]
    pub fn highest_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }

    /// Alert text shown to the student when something matched.
    #[must_use]
    pub fn alert_message(&self) -> Option<String> {
        if self.is_clean() {
            return None;
        }
        Some(format!(
            "Anomaly Detected: {}. Admin has been notified.",
            self.labels().join(", ")
        ))
    }
}

/// Screens attendance comments against suspicion patterns.
#[derive(Debug, Clone)]
pub struct CommentScreener {
    enabled: bool,
    patterns: Vec<SuspicionPattern>,
}

impl CommentScreener {
    /// Create a screener with the built-in categories only.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&ScreeningConfig::default())
    }

    /// Create a screener from configuration.
    ///
    /// Custom patterns that fail to compile, or that reuse a label already
    /// in the table, are logged and skipped.
    #[must_use]
    pub fn with_config(config: &ScreeningConfig) -> Self {
        let mut patterns = if config.use_builtin_patterns {
            builtin_patterns()
        } else {
            Vec::new()
        };

        for custom in &config.custom_patterns {
            if patterns.iter().any(|p| p.label == custom.label) {
                tracing::warn!(label = %custom.label, "Duplicate suspicion label; pattern skipped");
                continue;
            }

            match SuspicionPattern::new(custom.label.as_str(), custom.severity, &custom.pattern) {
                Ok(p) => patterns.push(p),
                Err(e) => {
                    tracing::warn!(
                        label = %custom.label,
                        pattern = %custom.pattern,
                        error = %e,
                        "Invalid custom suspicion pattern"
                    );
                }
            }
        }

        Self {
            enabled: config.enabled,
            patterns,
        }
    }

    /// Check if screening is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The active patterns, in reporting order.
    #[must_use]
    pub fn patterns(&self) -> &[SuspicionPattern] {
        &self.patterns
    }

    /// Screen a comment.
    ///
    /// Every pattern is checked once, independently of the others.
    #[must_use]
    pub fn screen(&self, comment: &str) -> ScreeningResult {
        if !self.enabled {
            return ScreeningResult::default();
        }

        let findings: Vec<Finding> = self
            .patterns
            .iter()
            .filter(|p| p.matches(comment))
            .map(|p| {
                trace!(label = %p.label, "Comment matched pattern");
                Finding {
                    label: p.label.clone(),
                    severity: p.severity,
                }
            })
            .collect();

        if !findings.is_empty() {
            debug!(matches = findings.len(), "Comment flagged");
        }

        ScreeningResult { findings }
    }
}

impl Default for CommentScreener {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::SuspicionCategory;

    const CONTRADICTORY: &str = "Contradictory presence statement";
    const PROXY: &str = "Possible proxy attendance";
    const DISHONESTY: &str = "Dishonesty indicators";
    const LOCATION: &str = "Location inconsistency";
    const HEALTH: &str = "Health-related absence claim";

    #[test]
    fn test_screening_config_default() {
        let config = ScreeningConfig::default();
        assert!(config.enabled);
        assert!(config.use_builtin_patterns);
        assert!(config.custom_patterns.is_empty());
    }

    #[test]
    fn test_screener_new() {
        let screener = CommentScreener::new();
        assert!(screener.is_enabled());
        assert_eq!(screener.patterns().len(), SuspicionCategory::ALL.len());
    }

    #[test]
    fn test_clean_comments() {
        let screener = CommentScreener::new();
        for comment in [
            "Arrived on time, sat in the front row.",
            "Present and ready for the quiz",
            "...!?;:-",
            "   \t\n",
            "12345 67890",
            "Llegué temprano a la clase",
            "今日は教室にいます",
            "Привет, я на уроке",
        ] {
            let result = screener.screen(comment);
            assert!(result.is_clean(), "unexpected match for {comment:?}");
            assert!(result.labels().is_empty());
            assert_eq!(result.alert_message(), None);
            assert_eq!(result.highest_severity(), None);
        }
    }

    #[test]
    fn test_empty_comment() {
        let result = CommentScreener::new().screen("");
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }

    #[test]
    fn test_not_here() {
        let result = CommentScreener::new().screen("I am not here today");
        assert!(result.contains(CONTRADICTORY));
    }

    #[test]
    fn test_friend_covered() {
        let result = CommentScreener::new().screen("my friend covered for me");
        assert!(result.contains(PROXY));
    }

    #[test]
    fn test_dishonesty_case_insensitive() {
        let screener = CommentScreener::new();
        assert!(screener
            .screen("I was pretending to fake it")
            .contains(DISHONESTY));
        assert!(screener.screen("FAKE").contains(DISHONESTY));
    }

    #[test]
    fn test_multiple_independent_matches() {
        let result =
            CommentScreener::new().screen("I am sick and saw the doctor, then went outside");
        assert!(result.contains(HEALTH));
        assert!(result.contains(LOCATION));
        assert_eq!(result.labels(), vec![LOCATION, HEALTH]);
    }

    #[test]
    fn test_all_categories_in_table_order() {
        let result = CommentScreener::new().screen(
            "Doctor said I'm sick so I'm at home, not present; my buddy will fake my name",
        );
        assert_eq!(
            result.labels(),
            vec![CONTRADICTORY, PROXY, DISHONESTY, LOCATION, HEALTH]
        );
        assert_eq!(result.highest_severity(), Some(Severity::High));
    }

    #[test]
    fn test_negation_is_not_scoped() {
        // "not present" matches wherever it appears
        let result = CommentScreener::new().screen("whether or not present matters");
        assert!(result.contains(CONTRADICTORY));
    }

    #[test]
    fn test_idempotent() {
        let screener = CommentScreener::new();
        let comment = "my friend is sick at home";
        assert_eq!(screener.screen(comment), screener.screen(comment));
    }

    #[test]
    fn test_alert_message() {
        let result = CommentScreener::new().screen("my friend is away");
        assert_eq!(
            result.alert_message().as_deref(),
            Some(
                "Anomaly Detected: Possible proxy attendance, Location inconsistency. \
                 Admin has been notified."
            )
        );
    }

    #[test]
    fn test_disabled_screener() {
        let config = ScreeningConfig {
            enabled: false,
            ..Default::default()
        };
        let screener = CommentScreener::with_config(&config);
        assert!(!screener.is_enabled());
        assert!(screener.screen("not here, sick at home").is_clean());
    }

    #[test]
    fn test_without_builtin_patterns() {
        let config = ScreeningConfig {
            use_builtin_patterns: false,
            ..Default::default()
        };
        let screener = CommentScreener::with_config(&config);
        assert!(screener.patterns().is_empty());
        assert!(screener.screen("FAKE").is_clean());
    }

    #[test]
    fn test_custom_patterns_append() {
        let config = ScreeningConfig {
            custom_patterns: vec![CustomPattern {
                label: "Late excuse".to_string(),
                pattern: r"\b(bus|traffic)\b".to_string(),
                severity: Severity::Low,
            }],
            ..Default::default()
        };
        let screener = CommentScreener::with_config(&config);
        let result = screener.screen("Stuck in TRAFFIC near home");
        assert_eq!(result.labels(), vec![LOCATION, "Late excuse"]);
        assert_eq!(result.findings()[1].severity, Severity::Low);
    }

    #[test]
    fn test_custom_patterns_invalid_regex() {
        let config = ScreeningConfig {
            custom_patterns: vec![
                CustomPattern {
                    label: "valid".to_string(),
                    pattern: r"\bvalid\b".to_string(),
                    severity: Severity::Medium,
                },
                CustomPattern {
                    label: "broken".to_string(),
                    pattern: r"[invalid".to_string(),
                    severity: Severity::Medium,
                },
            ],
            ..Default::default()
        };
        let screener = CommentScreener::with_config(&config);
        assert_eq!(
            screener.patterns().len(),
            SuspicionCategory::ALL.len() + 1
        );
    }

    #[test]
    fn test_custom_pattern_reusing_builtin_label_skipped() {
        let config = ScreeningConfig {
            custom_patterns: vec![CustomPattern {
                label: DISHONESTY.to_string(),
                pattern: "cheat".to_string(),
                severity: Severity::High,
            }],
            ..Default::default()
        };
        let screener = CommentScreener::with_config(&config);
        assert_eq!(screener.patterns().len(), SuspicionCategory::ALL.len());

        let result = screener.screen("fake cheat");
        assert_eq!(result.labels(), vec![DISHONESTY]);
    }

    #[test]
    fn test_custom_pattern_severity_defaults() {
        let json = r#"{"label": "x", "pattern": "y"}"#;
        let custom: CustomPattern = serde_json::from_str(json).unwrap();
        assert_eq!(custom.severity, Severity::Medium);
    }

    #[test]
    fn test_result_serialize() {
        let result = CommentScreener::new().screen("sick");
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("Health-related absence claim"));
        assert!(json.contains("\"low\""));
    }
}
