//! View types for UI serialization
//!
//! Renderers only ever see card ids and derived geometry; game state stays
//! inside the engine.

use serde::{Deserialize, Serialize};

use crate::game::MemoryGame;
use crate::layout::{Layout, Surface};
use crate::types::*;

/// One card box as the renderer should draw it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub id: CardId,
    /// Physical position on the board
    pub position: u32,
    pub pair_index: u32,
    pub slot: InstanceSlot,
    pub status: CardStatus,
    pub flip_direction: FlipDirection,
    pub face: Face,
    /// Horizontal scale of the current flip frame, 1.0 at rest
    pub scale_x: f64,
    pub rotation: f64,
    pub image_url: String,
    /// Only present once the card's link is enabled
    pub link_url: Option<String>,
    pub link_title: Option<String>,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// The complete board view sent to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    /// Cards in physical order
    pub cards: Vec<CardView>,
    pub layout: Layout,
    pub moves: u32,
    pub disclosed_pairs: u32,
    pub total_pairs: u32,
    pub finished: bool,
    /// Hidden cards cannot be flipped right now
    pub locked: bool,
    pub now: u64,
}

impl BoardView {
    pub fn from_game<S: Surface>(game: &MemoryGame<S>) -> Self {
        let layout = *game.layout();
        let cards = game
            .order()
            .iter()
            .enumerate()
            .filter_map(|(position, &id)| {
                let card = game.card(id)?;
                let definition = game.definitions().get(card.pair_index as usize)?;
                let (left, top) = layout.position(position);
                let (link_url, link_title) = if card.link_enabled {
                    (definition.link_url.clone(), definition.link_title.clone())
                } else {
                    (None, None)
                };
                Some(CardView {
                    id,
                    position: position as u32,
                    pair_index: card.pair_index,
                    slot: card.slot,
                    status: card.status,
                    flip_direction: card.flip_direction,
                    face: card.face,
                    scale_x: game.scale_of(id),
                    rotation: card.rotation,
                    image_url: game.options().image_url(definition),
                    link_url,
                    link_title,
                    left,
                    top,
                    width: layout.outer_width,
                    height: layout.outer_height,
                })
            })
            .collect();

        Self {
            cards,
            layout,
            moves: game.moves(),
            disclosed_pairs: game.disclosed_pairs() as u32,
            total_pairs: game.total_pairs() as u32,
            finished: game.is_finished(),
            locked: game.is_locked(),
            now: game.now(),
        }
    }
}
