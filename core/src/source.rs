//! Card data from the recent-gophers feed
//!
//! The feed is fetched by the host; this module only turns its JSON into
//! card definitions.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::rng::ShuffleRng;
use crate::types::CardDefinition;

/// Path of the recent-gophers proxy
pub const RECENT_GOPHERS_PATH: &str = "/gophers.json";
/// How many gophers to request from the feed
pub const DEFAULT_FETCH_LIMIT: u32 = 200;
/// How many pairs a game uses
pub const DEFAULT_PAIR_COUNT: usize = 10;
/// Each card links to its gopher's page
pub const GOPHER_LINK_BASE: &str = "https://gopherize.me/gopher/";
pub const SHARE_URL: &str = "https://pairs.gopherize.me/";

/// One gopher as listed by the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GopherEntry {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

#[derive(Deserialize)]
struct RecentGophers {
    #[serde(default)]
    gophers: Vec<GopherEntry>,
}

/// Request path for the `limit` most recent gophers
pub fn recent_url(limit: u32) -> String {
    format!("{}?limit={}", RECENT_GOPHERS_PATH, limit)
}

pub fn parse_recent(json: &str) -> GameResult<Vec<GopherEntry>> {
    serde_json::from_str::<RecentGophers>(json)
        .map(|feed| feed.gophers)
        .map_err(|_| GameError::MalformedSource)
}

impl From<GopherEntry> for CardDefinition {
    fn from(entry: GopherEntry) -> Self {
        CardDefinition::new(entry.url).with_link(format!("{}{}", GOPHER_LINK_BASE, entry.id))
    }
}

/// Shuffle the feed and keep `count` gophers as cards
pub fn select_cards<R: ShuffleRng>(
    entries: Vec<GopherEntry>,
    count: usize,
    rng: &mut R,
) -> Vec<CardDefinition> {
    rng.shuffle_into(entries)
        .into_iter()
        .take(count)
        .map(CardDefinition::from)
        .collect()
}

pub fn cards_from_recent_json<R: ShuffleRng>(
    json: &str,
    count: usize,
    rng: &mut R,
) -> GameResult<Vec<CardDefinition>> {
    Ok(select_cards(parse_recent(json)?, count, rng))
}

const NUMBER_WORDS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

/// Message offered for sharing once the board is cleared.
///
/// Pair counts up to twenty are spelled out.
pub fn share_text(pairs: usize, elapsed_ms: u64) -> String {
    let count = NUMBER_WORDS
        .get(pairs)
        .map_or_else(|| pairs.to_string(), |word| word.to_string());
    format!(
        "I just matched {} Gophers in {}ms! Can you beat that? {} #gopherizeme #golang via @ashleymcnamara and @matryer",
        count, elapsed_ms, SHARE_URL
    )
}
