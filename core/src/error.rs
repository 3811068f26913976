//! Error types for game operations
//!
//! Enum based errors so they can be serialized to hosts and SCALE-encoded
//! alongside snapshots.

use core::fmt;

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Errors raised while building or driving a game
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameError {
    /// Cards were supplied but no card size was configured
    UnspecifiedCardSize,
    /// Card width or height is not a positive number of pixels
    InvalidCardSize { width: u32, height: u32 },
    /// Minimum margin exceeds the maximum margin
    InvalidMargins { min: u32, max: u32 },
    /// Explicit order does not describe exactly two instances per pair
    InvalidOrder,
    /// A pre-disclosed pair index is not part of the card list
    DisclosedPairOutOfRange { pair: u32, total: u32 },
    /// The card data feed could not be parsed
    MalformedSource,
    /// Snapshot bytes could not be decoded
    MalformedSnapshot,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnspecifiedCardSize => write!(
                f,
                "unspecified card size: a numeric card width and height are required when cards are supplied"
            ),
            GameError::InvalidCardSize { width, height } => {
                write!(f, "invalid card size {}x{}", width, height)
            }
            GameError::InvalidMargins { min, max } => {
                write!(f, "minimum card margin {} exceeds maximum {}", min, max)
            }
            GameError::InvalidOrder => write!(f, "explicit order does not match the card list"),
            GameError::DisclosedPairOutOfRange { pair, total } => {
                write!(f, "disclosed pair {} out of range (total {})", pair, total)
            }
            GameError::MalformedSource => write!(f, "malformed card data"),
            GameError::MalformedSnapshot => write!(f, "malformed snapshot"),
        }
    }
}

impl std::error::Error for GameError {}

/// Result type alias for game operations
pub type GameResult<T> = Result<T, GameError>;
