//! Camera command kinds and the broadcast wire payload.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// A camera directive aimed at one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CommandKind {
    Start,
    Stop,
}

impl CommandKind {
    /// The database / wire representation (`"START"` / `"STOP"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Start => "START",
            CommandKind::Stop => "STOP",
        }
    }
}

impl std::str::FromStr for CommandKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "START" => Ok(CommandKind::Start),
            "STOP" => Ok(CommandKind::Stop),
            other => Err(CoreError::Validation(format!(
                "Command must be 'START' or 'STOP', got '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload pushed over the broadcast channel when a command is delivered.
///
/// `timestamp` is the caller-supplied issuance time, not the delivery time,
/// so clients can order commands the way the issuer saw them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPayload {
    pub id: DbId,
    pub command: CommandKind,
    pub timestamp: Timestamp,
}

/// Broadcast group identity for an account: the normalized (lower-case)
/// external directory id. Group membership is whichever sessions the
/// account currently holds on the broadcast channel.
pub fn group_id(external_id: &str) -> String {
    external_id.trim().to_ascii_lowercase()
}
