//! Recent-gophers feed helpers for the browser
//!
//! The host fetches the feed itself and hands the JSON text over.

use pairs_core::log;
use pairs_core::rng::XorShiftRng;
use pairs_core::source;
use wasm_bindgen::prelude::*;

/// Request path for the recent gophers, with the default limit
#[wasm_bindgen]
pub fn recent_gophers_url() -> String {
    source::recent_url(source::DEFAULT_FETCH_LIMIT)
}

/// Turn the feed JSON into a shuffled card list of `count` pairs.
///
/// Pass 0 for the default pair count.
#[wasm_bindgen]
pub fn cards_from_recent_json(json: &str, count: usize) -> Result<JsValue, String> {
    let count = if count == 0 {
        source::DEFAULT_PAIR_COUNT
    } else {
        count
    };
    let mut rng = XorShiftRng::seed_from_u64(crate::random_seed());
    let cards = source::cards_from_recent_json(json, count, &mut rng).map_err(|e| e.to_string())?;
    log::action("cards_from_recent_json", &format!("cards={}", cards.len()));
    serde_wasm_bindgen::to_value(&cards).map_err(|e| format!("Failed to serialize cards: {:?}", e))
}

#[wasm_bindgen]
pub fn share_text(pairs: usize, elapsed_ms: f64) -> String {
    source::share_text(pairs, elapsed_ms.max(0.0) as u64)
}
