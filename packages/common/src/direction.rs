//! Pipeline direction and dispatch opcodes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opcode selecting the outbound (protect) path
pub const TT_WRITE: u8 = 0;
/// Opcode selecting the inbound (verify and recover) path
pub const TT_READ: u8 = 1;

/// Which way data is crossing the trust boundary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Outbound: compress, encrypt, then authenticate
    #[serde(rename = "commit")]
    Commit,
    /// Inbound: verify, decrypt, then decompress
    #[serde(rename = "retrieve")]
    Retrieve,
}

impl Direction {
    /// Map a dispatch opcode onto a direction, `None` for unknown opcodes
    #[must_use]
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        match opcode {
            TT_WRITE => Some(Self::Commit),
            TT_READ => Some(Self::Retrieve),
            _ => None,
        }
    }

    /// The opcode that selects this direction
    #[must_use]
    pub fn opcode(self) -> u8 {
        match self {
            Self::Commit => TT_WRITE,
            Self::Retrieve => TT_READ,
        }
    }

    /// The opposite direction
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            Self::Commit => Self::Retrieve,
            Self::Retrieve => Self::Commit,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit => f.write_str("commit"),
            Self::Retrieve => f.write_str("retrieve"),
        }
    }
}
