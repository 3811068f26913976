pub mod engine;
pub mod feed;
pub mod surface;

use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    #[cfg(feature = "browser_log")]
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// Seed from the browser's entropy source, falling back to the fixed default
pub(crate) fn random_seed() -> u64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => u64::from_le_bytes(bytes),
        Err(e) => {
            pairs_core::log::warn(&format!("no entropy available ({}), using default seed", e));
            pairs_core::game::DEFAULT_SEED
        }
    }
}
