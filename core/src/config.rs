//! Game options
//!
//! Every field has a default, so hosts only send what they want to change.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::flip::Easing;
use crate::types::{CardDefinition, PairDisclosed};

/// Default total flip duration in milliseconds
pub const DEFAULT_CARD_FLIP_DURATION: u64 = 300;
/// Default delay before a mismatched pair is turned back over
pub const DEFAULT_FLIP_BACK_TIMEOUT: u64 = 1000;
/// Default minimum margin around a card, in pixels
pub const DEFAULT_MIN_CARD_MARGIN: u32 = 10;
/// Default maximum margin around a card, in pixels
pub const DEFAULT_MAX_CARD_MARGIN: u32 = 50;
/// Default maximum decorative tilt, in degrees
pub const DEFAULT_MAX_ROTATION: f64 = 10.0;

/// Callback invoked for every newly disclosed pair
pub type PairDisclosedHandler = Box<dyn FnMut(&PairDisclosed)>;

/// Card content size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSize {
    pub width: u32,
    pub height: u32,
}

impl CardSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True if a board of `pair_count` pairs laid out in a single row or
    /// column stays within `u32` pixels at the widest margin
    pub fn fits_board(&self, max_margin: u32, pair_count: usize) -> bool {
        let cards = u32::try_from(pair_count)
            .ok()
            .and_then(|pairs| pairs.checked_mul(2))
            .filter(|&cards| cards > 0);
        let Some(cards) = cards else {
            return pair_count == 0;
        };
        [self.width, self.height].iter().all(|&side| {
            max_margin
                .checked_mul(2)
                .and_then(|margins| side.checked_add(margins))
                .and_then(|outer| outer.checked_mul(cards))
                .is_some()
        })
    }
}

/// Bounds for the space left around each card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub min: u32,
    pub max: u32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_CARD_MARGIN,
            max: DEFAULT_MAX_CARD_MARGIN,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameOptions {
    /// Required whenever cards are supplied
    pub card_size: Option<CardSize>,
    pub margins: Margins,
    /// Columns per row the layout aims for; zero or negative disables it
    pub preferred_aspect_ratio: f64,
    pub card_flip_duration: u64,
    pub flip_back_timeout: u64,
    pub easing: Easing,
    pub max_rotation: f64,
    /// Pair indices in physical order, two entries per pair
    pub initial_order: Option<Vec<u32>>,
    pub already_disclosed_pairs: Vec<u32>,
    pub seed: Option<u64>,
    /// Prefix joined to every card's image url
    pub images_path: String,
    /// Let the host surface re-layout on window resize by itself
    pub auto_resize: bool,
    #[serde(skip)]
    pub on_pair_disclosed: Option<PairDisclosedHandler>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            card_size: None,
            margins: Margins::default(),
            preferred_aspect_ratio: 1.0,
            card_flip_duration: DEFAULT_CARD_FLIP_DURATION,
            flip_back_timeout: DEFAULT_FLIP_BACK_TIMEOUT,
            easing: Easing::Linear,
            max_rotation: DEFAULT_MAX_ROTATION,
            initial_order: None,
            already_disclosed_pairs: Vec::new(),
            seed: None,
            images_path: String::new(),
            auto_resize: true,
            on_pair_disclosed: None,
        }
    }
}

impl fmt::Debug for GameOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameOptions")
            .field("card_size", &self.card_size)
            .field("margins", &self.margins)
            .field("preferred_aspect_ratio", &self.preferred_aspect_ratio)
            .field("card_flip_duration", &self.card_flip_duration)
            .field("flip_back_timeout", &self.flip_back_timeout)
            .field("easing", &self.easing)
            .field("max_rotation", &self.max_rotation)
            .field("initial_order", &self.initial_order)
            .field("already_disclosed_pairs", &self.already_disclosed_pairs)
            .field("seed", &self.seed)
            .field("images_path", &self.images_path)
            .field("auto_resize", &self.auto_resize)
            .field("on_pair_disclosed", &self.on_pair_disclosed.is_some())
            .finish()
    }
}

impl GameOptions {
    pub fn with_card_size(mut self, width: u32, height: u32) -> Self {
        self.card_size = Some(CardSize::new(width, height));
        self
    }

    pub fn with_margins(mut self, min: u32, max: u32) -> Self {
        self.margins = Margins { min, max };
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_images_path(mut self, path: impl Into<String>) -> Self {
        self.images_path = path.into();
        self
    }

    /// Full image url of a card, with the images path in front
    pub fn image_url(&self, definition: &CardDefinition) -> String {
        format!("{}{}", self.images_path, definition.image_url)
    }

    pub fn on_pair_disclosed(mut self, handler: impl FnMut(&PairDisclosed) + 'static) -> Self {
        self.on_pair_disclosed = Some(Box::new(handler));
        self
    }

    /// Check the options against a card list of `pair_count` definitions
    pub fn validate(&self, pair_count: usize) -> GameResult<()> {
        match self.card_size {
            None if pair_count > 0 => return Err(GameError::UnspecifiedCardSize),
            Some(size) if size.width == 0 || size.height == 0 => {
                return Err(GameError::InvalidCardSize {
                    width: size.width,
                    height: size.height,
                })
            }
            Some(size) if !size.fits_board(self.margins.max, pair_count) => {
                return Err(GameError::InvalidCardSize {
                    width: size.width,
                    height: size.height,
                })
            }
            _ => {}
        }

        if self.margins.min > self.margins.max {
            return Err(GameError::InvalidMargins {
                min: self.margins.min,
                max: self.margins.max,
            });
        }

        for &pair in &self.already_disclosed_pairs {
            if pair as usize >= pair_count {
                return Err(GameError::DisclosedPairOutOfRange {
                    pair,
                    total: pair_count as u32,
                });
            }
        }

        if let Some(order) = self.usable_order(pair_count) {
            let mut seen = vec![0u8; pair_count];
            for &pair in order {
                match seen.get_mut(pair as usize) {
                    Some(count) if *count < 2 => *count += 1,
                    _ => return Err(GameError::InvalidOrder),
                }
            }
        }

        Ok(())
    }

    /// The explicit order, if it has the right length for `pair_count` pairs.
    ///
    /// An order of any other length is ignored and a random order is used.
    pub fn usable_order(&self, pair_count: usize) -> Option<&[u32]> {
        self.initial_order
            .as_deref()
            .filter(|order| order.len() == pair_count * 2)
    }
}
