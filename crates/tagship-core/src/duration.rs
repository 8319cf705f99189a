use std::str::FromStr;
use std::time::Duration;

/// A human-written duration (`1h`, `20s`, `1m 30s`) that is handed on to
/// the promotion workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitDuration(Duration);

impl WaitDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self(d)
    }

    /// Single-unit rendering (`3600s`, `1500ms`) that Go-style duration
    /// parsers accept.
    pub fn to_arg(&self) -> String {
        if self.0.subsec_millis() == 0 {
            format!("{}s", self.0.as_secs())
        } else {
            format!("{}ms", self.0.as_millis())
        }
    }
}

impl FromStr for WaitDuration {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        humantime::parse_duration(s.trim())
            .map(Self)
            .map_err(|e| crate::Error::InvalidDuration {
                value: s.to_owned(),
                source: e,
            })
    }
}

impl std::fmt::Display for WaitDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", humantime::format_duration(self.0))
    }
}
