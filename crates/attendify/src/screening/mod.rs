//! Comment screening for attendance submissions.
//!
//! Every comment attached to an attendance submission is checked against a
//! fixed, ordered table of suspicion categories:
//!
//! - **Built-in categories**: contradictory presence statements, proxy
//!   attendance, dishonesty, location inconsistency and health claims.
//!
//! - **Custom patterns**: extra labelled regexes from configuration, checked
//!   after the built-ins.
//!
//! Screening never fails. Any string, including the empty one, produces a
//! (possibly empty) [`ScreeningResult`].
//!
//! # Example
//!
//! ```
//! use attendify::screening::CommentScreener;
//!
//! let screener = CommentScreener::new();
//! let result = screener.screen("I am sick and saw the doctor, then went outside");
//!
//! assert_eq!(
//!     result.labels(),
//!     vec!["Location inconsistency", "Health-related absence claim"]
//! );
//!
//! if let Some(alert) = result.alert_message() {
//!     println!("{alert}");
//! }
//! ```

mod categories;
mod screener;

pub use categories::{
    builtin_patterns, compile_pattern, Severity, SuspicionCategory, SuspicionPattern,
};
pub use screener::{CommentScreener, CustomPattern, Finding, ScreeningConfig, ScreeningResult};
