//! Shared value types used across the Parley crates.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to the speech-recognition service that produced results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceRef(pub String);

impl ServiceRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ServiceRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Error code reported by the speech source.
///
/// Codes 1 through 9 follow the platform recogniser convention; anything
/// else is carried through untouched and described as unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecognitionErrorCode(pub i32);

impl RecognitionErrorCode {
    pub const NETWORK_TIMEOUT: Self = Self(1);
    pub const NETWORK: Self = Self(2);
    pub const AUDIO: Self = Self(3);
    pub const SERVER: Self = Self(4);
    pub const CLIENT: Self = Self(5);
    pub const SPEECH_TIMEOUT: Self = Self(6);
    pub const NO_MATCH: Self = Self(7);
    pub const RECOGNIZER_BUSY: Self = Self(8);
    pub const INSUFFICIENT_PERMISSIONS: Self = Self(9);

    pub fn code(&self) -> i32 {
        self.0
    }

    /// Human-readable description, used in logs.
    pub fn describe(&self) -> &'static str {
        match self.0 {
            1 => "network timeout",
            2 => "network error",
            3 => "audio recording error",
            4 => "server error",
            5 => "client error",
            6 => "no speech input",
            7 => "no recognition match",
            8 => "recognizer busy",
            9 => "insufficient permissions",
            _ => "unknown error",
        }
    }
}

impl fmt::Display for RecognitionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for RecognitionErrorCode {
    fn from(code: i32) -> Self {
        Self(code)
    }
}
