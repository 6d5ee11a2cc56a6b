//! Errors raised by the shaping layer.
//!
//! Bad *data* never produces an error here: malformed rows are skipped or read
//! as zero. Only a bad *configuration* at the call site does.

/// Errors that can occur while configuring a chart.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// A configuration value could not be understood (unknown time window,
    /// chart kind, or value mode).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ShapeError {
    pub(crate) fn unknown(what: &str, got: &str, expected: &str) -> Self {
        ShapeError::InvalidConfiguration(format!("unknown {what} `{got}`, expected one of {expected}"))
    }
}
