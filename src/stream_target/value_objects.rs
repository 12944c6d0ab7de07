use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::StreamTargetError;

// ============================================================================
// Stream Target Value Objects
// ============================================================================

/// A stream qualified by its scope, written as `scope/stream`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedStream {
    pub scope: String,
    pub stream: String,
}

impl ScopedStream {
    pub fn new(scope: impl Into<String>, stream: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            stream: stream.into(),
        }
    }

    pub fn parse(value: &str) -> Result<Self, StreamTargetError> {
        let components: Vec<&str> = value.split('/').collect();
        match components.as_slice() {
            [scope, stream] if !scope.is_empty() && !stream.is_empty() => {
                Ok(Self::new(*scope, *stream))
            }
            _ => Err(StreamTargetError::MalformedScopedStream(value.to_string())),
        }
    }
}

impl FromStr for ScopedStream {
    type Err = StreamTargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ScopedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.stream)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum RetentionType {
    /// No retention; data is kept forever
    #[default]
    None,
    /// Data older than the configured number of days is deleted
    Days,
    /// The oldest data is deleted once the stream exceeds the configured size
    Bytes,
    /// Either limit triggers deletion
    #[value(name = "daysAndBytes")]
    #[serde(rename = "daysAndBytes")]
    DaysAndBytes,
}

impl RetentionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetentionType::None => "none",
            RetentionType::Days => "days",
            RetentionType::Bytes => "bytes",
            RetentionType::DaysAndBytes => "daysAndBytes",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RetentionPolicy {
    #[default]
    None,
    Days { days: f64 },
    Bytes { bytes: u64 },
    DaysAndBytes { days: f64, bytes: u64 },
}

impl RetentionPolicy {
    pub fn new(
        retention_type: RetentionType,
        days: Option<f64>,
        bytes: Option<u64>,
    ) -> Result<Self, StreamTargetError> {
        let require_days = || -> Result<f64, StreamTargetError> {
            let days = days.ok_or(StreamTargetError::MissingRetentionSetting("retention-days"))?;
            if !days.is_finite() || days <= 0.0 {
                return Err(StreamTargetError::InvalidRetentionDays(days));
            }
            Ok(days)
        };
        let require_bytes =
            || bytes.ok_or(StreamTargetError::MissingRetentionSetting("retention-bytes"));

        match retention_type {
            RetentionType::None => Ok(Self::None),
            RetentionType::Days => Ok(Self::Days { days: require_days()? }),
            RetentionType::Bytes => Ok(Self::Bytes { bytes: require_bytes()? }),
            RetentionType::DaysAndBytes => Ok(Self::DaysAndBytes {
                days: require_days()?,
                bytes: require_bytes()?,
            }),
        }
    }

    pub fn retention_type(&self) -> RetentionType {
        match self {
            RetentionPolicy::None => RetentionType::None,
            RetentionPolicy::Days { .. } => RetentionType::Days,
            RetentionPolicy::Bytes { .. } => RetentionType::Bytes,
            RetentionPolicy::DaysAndBytes { .. } => RetentionType::DaysAndBytes,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
