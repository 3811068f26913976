//! Saved board layout
//!
//! A snapshot records where each pair sits and which pairs are disclosed, so
//! a host can store it (SCALE keeps it small) and restart the same board.

use parity_scale_codec::{Decode, DecodeAll, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

use crate::config::GameOptions;
use crate::error::{GameError, GameResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Encode, Decode, TypeInfo, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Pair index at each physical position
    pub order: Vec<u32>,
    pub disclosed: Vec<u32>,
}

impl GameSnapshot {
    pub fn to_scale(&self) -> Vec<u8> {
        self.encode()
    }

    pub fn from_scale(bytes: &[u8]) -> GameResult<Self> {
        Self::decode_all(&mut &bytes[..]).map_err(|_| GameError::MalformedSnapshot)
    }

    /// Options that rebuild this board when passed to `MemoryGame::start`
    pub fn apply_to(self, mut options: GameOptions) -> GameOptions {
        options.initial_order = Some(self.order);
        options.already_disclosed_pairs = self.disclosed;
        options
    }
}
