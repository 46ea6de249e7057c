//! Registry action types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Route the action surface directs callers back to after every operation.
pub const OVERVIEW_ROUTE: &str = "admin/structure/domain";

/// Operations the action surface dispatches against a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DomainOperation {
    /// Promote the record to default
    Default,
    /// Enable the record
    Enable,
    /// Disable the record
    Disable,
}

impl FromStr for DomainOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "enable" => Ok(Self::Enable),
            "disable" => Ok(Self::Disable),
            other => Err(format!("Unknown domain operation: '{other}'")),
        }
    }
}

impl fmt::Display for DomainOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Self::Default => "default",
            Self::Enable => "enable",
            Self::Disable => "disable",
        };
        write!(f, "{token}")
    }
}

/// Result of one dispatched action, reported to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    /// Whether the target record reads the expected state afterwards
    pub success: bool,
    /// Human-readable confirmation or generic failure notice
    pub message: String,
    /// Overview route the caller is redirected back to
    pub return_to: String,
}

impl ActionOutcome {
    /// Successful outcome with a confirmation message.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            return_to: OVERVIEW_ROUTE.to_string(),
        }
    }

    /// Failed outcome with a generic notice.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            return_to: OVERVIEW_ROUTE.to_string(),
        }
    }
}
