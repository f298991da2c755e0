//! Attendance marking.
//!
//! A student confirms attendance for a session, optionally with a comment.
//! The comment is screened, the record is flagged when anything matched, and
//! flagged records are handed to an [`AnomalyNotifier`].

use std::fmt;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AttendanceConfig;
use crate::error::Result;
use crate::screening::{CommentScreener, ScreeningResult, Severity};

/// Attendance state recorded for a student in a session.
///
/// Marking always records `Present`; a suspicious comment flags the record
/// instead of changing its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// The student confirmed attendance.
    Present,
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
        }
    }
}

/// A request to mark a student present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkRequest {
    /// Student identifier (name or email).
    pub student: String,
    /// Session identifier.
    pub session: String,
    /// Optional free-text comment.
    pub comment: Option<String>,
}

impl MarkRequest {
    /// Create a request without a comment.
    #[must_use]
    pub fn new(student: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            student: student.into(),
            session: session.into(),
            comment: None,
        }
    }

    /// Attach a comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// The result of marking attendance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Student identifier.
    pub student: String,

    /// Session identifier.
    pub session: String,

    /// Recorded status.
    pub status: AttendanceStatus,

    /// The comment, unless blank or dropped by configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// What the screener found in the comment.
    pub screening: ScreeningResult,

    /// Set when the screening result is not clean.
    pub flagged: bool,

    /// When attendance was marked.
    pub marked_at: DateTime<Utc>,
}

impl AttendanceRecord {
    /// One anomaly report per finding, in screening order.
    #[must_use]
    pub fn anomaly_reports(&self) -> Vec<AnomalyReport> {
        self.screening
            .findings()
            .iter()
            .map(|finding| AnomalyReport {
                student: self.student.clone(),
                session: self.session.clone(),
                issue: finding.label.clone(),
                severity: finding.severity,
                detected_at: self.marked_at,
            })
            .collect()
    }

    /// Serialize the record as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A single anomaly raised for an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyReport {
    /// Student who submitted the comment.
    pub student: String,
    /// Session the comment was submitted for.
    pub session: String,
    /// Matched category label.
    pub issue: String,
    /// Severity of the match.
    pub severity: Severity,
    /// When the anomaly was detected.
    pub detected_at: DateTime<Utc>,
}

/// Delivers anomaly reports to administrators.
///
/// Implementors provide the actual channel (log, email, queue).
pub trait AnomalyNotifier: Send + Sync {
    /// The name of this channel (for logging).
    fn name(&self) -> &'static str;

    /// Deliver the reports for one flagged submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the reports could not be delivered.
    fn notify(&self, reports: &[AnomalyReport]) -> Result<()>;
}

/// Writes each anomaly report to the log at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl AnomalyNotifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    fn notify(&self, reports: &[AnomalyReport]) -> Result<()> {
        for report in reports {
            warn!(
                student = %report.student,
                session = %report.session,
                issue = %report.issue,
                severity = %report.severity,
                "Attendance anomaly detected"
            );
        }
        Ok(())
    }
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    reports: Mutex<Vec<AnomalyReport>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports received so far.
    #[must_use]
    pub fn reports(&self) -> Vec<AnomalyReport> {
        self.reports
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl AnomalyNotifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn notify(&self, reports: &[AnomalyReport]) -> Result<()> {
        let mut stored = self
            .reports
            .lock()
            .map_err(|_| crate::error::Error::notification(self.name(), "lock poisoned"))?;
        stored.extend_from_slice(reports);
        Ok(())
    }
}

/// Marks attendance and screens comments.
#[derive(Debug)]
pub struct AttendanceDesk<N = LogNotifier> {
    screener: CommentScreener,
    notifier: N,
    config: AttendanceConfig,
}

impl AttendanceDesk<LogNotifier> {
    /// Create a desk that logs anomalies.
    #[must_use]
    pub fn new(screener: CommentScreener, config: AttendanceConfig) -> Self {
        Self::with_notifier(screener, config, LogNotifier)
    }
}

impl<N: AnomalyNotifier> AttendanceDesk<N> {
    /// Create a desk with a specific notifier.
    #[must_use]
    pub fn with_notifier(screener: CommentScreener, config: AttendanceConfig, notifier: N) -> Self {
        Self {
            screener,
            notifier,
            config,
        }
    }

    /// The notifier anomalies are sent to.
    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The screener used for comments.
    #[must_use]
    pub fn screener(&self) -> &CommentScreener {
        &self.screener
    }

    /// Mark a student present.
    ///
    /// The student is always marked present; a suspicious comment only flags
    /// the record. A failed notification is logged and does not undo the
    /// mark.
    #[must_use]
    pub fn mark(&self, request: MarkRequest) -> AttendanceRecord {
        let text = request.comment.as_deref().unwrap_or("");
        let screening = self.screener.screen(text);
        let flagged = !screening.is_clean();

        let comment = if self.config.keep_comment {
            request.comment.filter(|c| !c.trim().is_empty())
        } else {
            None
        };

        let record = AttendanceRecord {
            student: request.student,
            session: request.session,
            status: AttendanceStatus::Present,
            comment,
            screening,
            flagged,
            marked_at: Utc::now(),
        };

        info!(
            student = %record.student,
            session = %record.session,
            flagged = record.flagged,
            "Attendance marked"
        );

        if record.flagged {
            if self.config.notify_admin {
                if let Err(e) = self.notifier.notify(&record.anomaly_reports()) {
                    tracing::error!(
                        notifier = self.notifier.name(),
                        error = %e,
                        "Failed to notify administrators"
                    );
                }
            } else {
                debug!("Admin notification disabled; anomaly not forwarded");
            }
        }

        record
    }
}
