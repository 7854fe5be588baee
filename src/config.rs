//! Configuration loading and management

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Environment variable selecting where the event tap is installed
pub const TAP_LOCATION_VAR: &str = "KEYSTROKE_TAP_LOCATION";

/// Where in the event stream the tap sits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TapLocation {
    /// Where HID system events enter the window server
    Hid,
    /// Where HID system and remote control events enter a login session
    #[default]
    Session,
    /// Where session events have been annotated to flow to an application
    AnnotatedSession,
}

impl FromStr for TapLocation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hid" => Ok(Self::Hid),
            "session" => Ok(Self::Session),
            "annotated-session" => Ok(Self::AnnotatedSession),
            other => anyhow::bail!(
                "unknown tap location {other:?} (expected hid, session or annotated-session)"
            ),
        }
    }
}

impl fmt::Display for TapLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapLocation::Hid => write!(f, "hid"),
            TapLocation::Session => write!(f, "session"),
            TapLocation::AnnotatedSession => write!(f, "annotated-session"),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Tap placement in the event stream
    pub tap_location: TapLocation,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        Self::from_env_value(std::env::var(TAP_LOCATION_VAR).ok())
    }

    fn from_env_value(tap_location: Option<String>) -> Result<Self> {
        let tap_location = match tap_location {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid {TAP_LOCATION_VAR}"))?,
            None => TapLocation::default(),
        };

        Ok(Self { tap_location })
    }
}
