//! Error Types for the Posture Pipeline
//!
//! Errors here stay small and `Copy`: they are returned in the per-frame hot
//! path and never carry heap data. A frame that cannot be measured is not an
//! exceptional condition - it routes to guidance output - so the variants
//! below cover only the cases a caller must branch on:
//!
//! - `SubjectNotVisible`: mandatory joints missing; the frame is degraded and
//!   must not enter scoring history.
//! - `InvalidCurve`: a calibration curve failed validation at load time.

use thiserror_no_std::Error;

/// Result type for pipeline operations
pub type PostureResult<T> = Result<T, PostureError>;

/// Pipeline errors - kept small for the per-frame hot path
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureError {
    /// Mandatory joints missing from the frame (degraded result)
    #[error("subject not visible: missing {missing}")]
    SubjectNotVisible {
        /// Joint group that failed the mandatory check
        missing: &'static str,
    },

    /// Calibration curve rejected at load time
    #[error("invalid score curve: {reason}")]
    InvalidCurve {
        /// What the curve validation found
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_small() {
        assert!(core::mem::size_of::<PostureError>() <= 24);
    }
}
