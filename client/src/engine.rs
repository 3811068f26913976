//! Game engine for browser WASM builds
//!
//! Wraps the core session around a DOM surface and exposes it to JavaScript
//! as `MemoryGame`. The host drives it with clicks and `tick` timestamps.

use std::cell::RefCell;
use std::rc::Rc;

use pairs_core::config::GameOptions;
use pairs_core::game::MemoryGame;
use pairs_core::log;
use pairs_core::snapshot::GameSnapshot;
use pairs_core::types::{CardDefinition, CardId, ClickOutcome, PairDisclosed};
use serde::Serialize;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::surface::DomSurface;

type SharedGame = Rc<RefCell<MemoryGame<DomSurface>>>;

fn to_js<T: Serialize>(label: &str, value: &T) -> JsValue {
    match serde_wasm_bindgen::to_value(value) {
        Ok(val) => val,
        Err(e) => {
            log::error(&format!("{} serialization failed: {:?}", label, e));
            JsValue::NULL
        }
    }
}

/// Host timestamps seen through `tick`, and when play started
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HostClock {
    last_tick: Option<f64>,
    started_at: Option<f64>,
    /// A flip happened before the first tick; start at the next one
    start_pending: bool,
}

impl HostClock {
    /// Record host time `now_ms`, returning whole milliseconds elapsed
    pub fn tick(&mut self, now_ms: f64) -> u64 {
        if self.start_pending {
            self.started_at = Some(now_ms);
            self.start_pending = false;
        }
        let elapsed = match self.last_tick {
            Some(last) if now_ms > last => (now_ms - last) as u64,
            _ => 0,
        };
        // Keep the fractional part so frames never drift.
        self.last_tick = Some(self.last_tick.map_or(now_ms, |last| last + elapsed as f64));
        elapsed
    }

    /// Start timing play at the first flip
    pub fn flipped(&mut self) {
        if self.started_at.is_some() || self.start_pending {
            return;
        }
        match self.last_tick {
            Some(now) => self.started_at = Some(now),
            None => self.start_pending = true,
        }
    }

    pub fn restart(&mut self) {
        self.started_at = None;
        self.start_pending = false;
    }

    /// Milliseconds played so far
    pub fn elapsed(&self) -> u64 {
        match (self.started_at, self.last_tick) {
            (Some(start), Some(now)) => (now - start).max(0.0) as u64,
            _ => 0,
        }
    }
}

/// Window `resize` subscription that re-lays out the board
struct ResizeListener {
    window: web_sys::Window,
    callback: Closure<dyn FnMut()>,
}

impl ResizeListener {
    fn attach(game: &SharedGame) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let game = Rc::clone(game);
        let callback = Closure::<dyn FnMut()>::new(move || match game.try_borrow_mut() {
            Ok(mut game) => game.resize(),
            Err(_) => log::warn("resize skipped: game busy"),
        });
        window.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())?;
        Ok(Self { window, callback })
    }

    fn detach(&self) {
        let removed = self
            .window
            .remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref());
        if let Err(e) = removed {
            log::error(&format!("failed to remove resize listener: {:?}", e));
        }
    }
}

/// The memory game exposed to WASM
#[wasm_bindgen(js_name = MemoryGame)]
pub struct GameEngine {
    game: SharedGame,
    clock: HostClock,
    resize_listener: Option<ResizeListener>,
}

#[wasm_bindgen(js_class = MemoryGame)]
impl GameEngine {
    /// Build the board inside `container` from a card list and options (JSON)
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, cards: JsValue, options: JsValue) -> Result<GameEngine, String> {
        log::info("=== PAIRS ENGINE INITIALIZED ===");
        let cards: Vec<CardDefinition> = serde_wasm_bindgen::from_value(cards)
            .map_err(|e| format!("Failed to parse cards: {:?}", e))?;
        let mut options: GameOptions = if options.is_undefined() || options.is_null() {
            GameOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| format!("Failed to parse options: {:?}", e))?
        };
        if options.seed.is_none() {
            options.seed = Some(crate::random_seed());
        }
        let auto_resize = options.auto_resize;

        let surface =
            DomSurface::attach(container).map_err(|e| format!("Failed to attach board: {:?}", e))?;
        let game = MemoryGame::start(cards, options, surface).map_err(|e| e.to_string())?;
        let game = Rc::new(RefCell::new(game));

        let resize_listener = if auto_resize {
            let listener = ResizeListener::attach(&game)
                .map_err(|e| format!("Failed to listen for resize: {:?}", e))?;
            Some(listener)
        } else {
            None
        };

        Ok(Self {
            game,
            clock: HostClock::default(),
            resize_listener,
        })
    }

    /// Click a card. Returns "ignored", "flipped" or "navigate".
    #[wasm_bindgen]
    pub fn click(&mut self, id: u32) -> JsValue {
        let outcome = self.game.borrow_mut().click(CardId(id));
        if outcome == ClickOutcome::Flipped {
            self.clock.flipped();
        }
        to_js("click", &outcome)
    }

    /// Advance to host time `now_ms`, returning the pair events that fired
    #[wasm_bindgen]
    pub fn tick(&mut self, now_ms: f64) -> JsValue {
        let elapsed = self.clock.tick(now_ms);
        let events: Vec<PairDisclosed> = self.game.borrow_mut().advance(elapsed);
        to_js("tick", &events)
    }

    /// Milliseconds until the next scheduled task, or -1 when idle
    #[wasm_bindgen]
    pub fn next_due_in(&self) -> f64 {
        let game = self.game.borrow();
        match game.next_due() {
            Some(due) => due.saturating_sub(game.now()) as f64,
            None => -1.0,
        }
    }

    /// Get the current board view as JSON
    #[wasm_bindgen]
    pub fn view(&self) -> JsValue {
        log::debug("view", "Serializing board view");
        to_js("view", &self.game.borrow().view())
    }

    #[wasm_bindgen]
    pub fn reset(&mut self, animated: bool, reorder: bool, rebuild: bool) {
        self.clock.restart();
        self.game.borrow_mut().reset(animated, reorder, rebuild);
    }

    #[wasm_bindgen]
    pub fn reorder(&mut self, keep_rotations: bool, use_explicit_order: bool) {
        let mut game = self.game.borrow_mut();
        game.reorder(keep_rotations, use_explicit_order);
        game.rearrange();
    }

    #[wasm_bindgen]
    pub fn rearrange(&mut self) {
        self.game.borrow_mut().rearrange();
    }

    /// Re-layout for the current container size; runs on window resize
    /// unless `autoResize` is off
    #[wasm_bindgen]
    pub fn resize(&mut self) {
        self.game.borrow_mut().resize();
    }

    #[wasm_bindgen]
    pub fn destroy(&mut self) {
        if let Some(listener) = self.resize_listener.take() {
            listener.detach();
        }
        let mut game = self.game.borrow_mut();
        game.destroy();
        game.surface().detach();
    }

    #[wasm_bindgen]
    pub fn set_cards(&mut self, cards: JsValue) -> Result<(), String> {
        let cards: Vec<CardDefinition> = serde_wasm_bindgen::from_value(cards)
            .map_err(|e| format!("Failed to parse cards: {:?}", e))?;
        self.clock.restart();
        self.game
            .borrow_mut()
            .set_cards(cards)
            .map_err(|e| e.to_string())
    }

    #[wasm_bindgen]
    pub fn set_card_size(&mut self, width: u32, height: u32) -> Result<(), String> {
        self.game
            .borrow_mut()
            .set_card_size(width, height)
            .map_err(|e| e.to_string())
    }

    #[wasm_bindgen]
    pub fn set_max_rotation(&mut self, degrees: f64) {
        self.game.borrow_mut().set_max_rotation(degrees);
    }

    #[wasm_bindgen]
    pub fn is_finished(&self) -> bool {
        self.game.borrow().is_finished()
    }

    #[wasm_bindgen]
    pub fn moves(&self) -> u32 {
        self.game.borrow().moves()
    }

    /// Share message for a cleared board, timed from the first flip
    #[wasm_bindgen]
    pub fn share_text(&self) -> Option<String> {
        let game = self.game.borrow();
        if !game.is_finished() {
            return None;
        }
        Some(pairs_core::source::share_text(
            game.total_pairs(),
            self.clock.elapsed(),
        ))
    }

    /// Board order and disclosed pairs as JSON
    #[wasm_bindgen]
    pub fn snapshot(&self) -> JsValue {
        to_js("snapshot", &self.game.borrow().snapshot())
    }

    /// Board order and disclosed pairs as SCALE bytes
    #[wasm_bindgen]
    pub fn snapshot_scale(&self) -> Vec<u8> {
        self.game.borrow().snapshot().to_scale()
    }

    /// Put the cards back in the order stored in a SCALE snapshot
    #[wasm_bindgen]
    pub fn restore_order_scale(&mut self, bytes: Vec<u8>) -> Result<(), String> {
        log::action("restore_order_scale", &format!("len={}", bytes.len()));
        let snapshot = GameSnapshot::from_scale(&bytes).map_err(|e| e.to_string())?;
        let mut game = self.game.borrow_mut();
        game.restore_order(snapshot.order)
            .map_err(|e| e.to_string())?;
        game.rearrange();
        Ok(())
    }
}

impl Drop for GameEngine {
    fn drop(&mut self) {
        if let Some(listener) = self.resize_listener.take() {
            listener.detach();
        }
    }
}

/// Decode a SCALE snapshot into JSON, ready to merge into game options
#[wasm_bindgen]
pub fn decode_snapshot(bytes: Vec<u8>) -> Result<JsValue, String> {
    let snapshot = GameSnapshot::from_scale(&bytes).map_err(|e| e.to_string())?;
    Ok(to_js("decode_snapshot", &snapshot))
}
