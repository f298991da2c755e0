//! `attendify` - Attendance comment screening
//!
//! This library screens free-text attendance comments against a fixed table
//! of suspicion categories and records flagged attendance submissions.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod attendance;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod screening;

pub use attendance::{
    AnomalyNotifier, AnomalyReport, AttendanceDesk, AttendanceRecord, AttendanceStatus,
    LogNotifier, MarkRequest, RecordingNotifier,
};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use screening::{CommentScreener, ScreeningResult, SuspicionCategory};
