use std::collections::BTreeMap;

use parity_scale_codec::{Decode, Encode};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};

/// Stable identifier of a physical card instance.
///
/// Ids index the engine's card arena: `pair_index * 2 + slot`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, TypeInfo, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    pub fn new(pair_index: u32, slot: InstanceSlot) -> Self {
        Self(pair_index * 2 + slot.index())
    }

    pub fn pair_index(self) -> u32 {
        self.0 / 2
    }

    pub fn slot(self) -> InstanceSlot {
        if self.0 % 2 == 0 {
            InstanceSlot::First
        } else {
            InstanceSlot::Second
        }
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which of the two physical copies of a definition an instance is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstanceSlot {
    First,
    Second,
}

impl InstanceSlot {
    pub const BOTH: [InstanceSlot; 2] = [InstanceSlot::First, InstanceSlot::Second];

    pub fn index(self) -> u32 {
        match self {
            InstanceSlot::First => 0,
            InstanceSlot::Second => 1,
        }
    }
}

/// Card payload supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDefinition {
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_title: Option<String>,
    /// Free-form host data carried along with the card
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl CardDefinition {
    pub fn new(image_url: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            ..Self::default()
        }
    }

    pub fn with_link(mut self, link_url: impl Into<String>) -> Self {
        self.link_url = Some(link_url.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.link_title = Some(title.into());
        self
    }

    /// A link is navigable only if it is present and non-empty
    pub fn has_link(&self) -> bool {
        self.link_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Disclosure status of a card instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardStatus {
    Hidden,
    Flipping,
    Revealed,
}

/// Direction of an in-flight flip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FlipDirection {
    None,
    ToFront,
    ToBack,
}

/// Which face of the card is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Face {
    Front,
    Back,
}

/// One physical card on the board
#[derive(Debug, Clone, PartialEq)]
pub struct CardInstance {
    pub id: CardId,
    pub pair_index: u32,
    pub slot: InstanceSlot,
    pub status: CardStatus,
    pub flip_direction: FlipDirection,
    pub face: Face,
    /// Decorative tilt in degrees
    pub rotation: f64,
    pub link_enabled: bool,
}

impl CardInstance {
    pub fn new(pair_index: u32, slot: InstanceSlot) -> Self {
        Self {
            id: CardId::new(pair_index, slot),
            pair_index,
            slot,
            status: CardStatus::Hidden,
            flip_direction: FlipDirection::None,
            face: Face::Back,
            rotation: 0.0,
            link_enabled: false,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.flip_direction != FlipDirection::None
    }

    /// Show the front for good, as for a disclosed pair
    pub fn reveal(&mut self) {
        self.status = CardStatus::Revealed;
        self.face = Face::Front;
        self.link_enabled = true;
    }

    /// Back to the face-down resting state
    pub fn hide(&mut self) {
        self.status = CardStatus::Hidden;
        self.flip_direction = FlipDirection::None;
        self.face = Face::Back;
        self.link_enabled = false;
    }
}

/// Outcome of a click on a card, as seen by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClickOutcome {
    /// Click consumed or suppressed; the host must not follow the link
    Ignored,
    /// A hidden card started flipping
    Flipped,
    /// Revealed card with a link; the host may navigate
    Navigate,
}

impl ClickOutcome {
    pub fn is_navigable(self) -> bool {
        self == ClickOutcome::Navigate
    }
}

/// Emitted once per newly matched pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairDisclosed {
    pub card: CardId,
    pub pair_index: u32,
    pub definition: CardDefinition,
    pub disclosed_pairs: u32,
    pub total_pairs: u32,
    pub moves: u32,
    pub finished: bool,
}
