mod clicks;
mod session;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::GameOptions;
use crate::game::MemoryGame;
use crate::layout::StaticSurface;
use crate::types::*;

// ==========================================
// HELPER FUNCTIONS (Boilerplate Reduction)
// ==========================================

const FLIP: u64 = 300;
const FLIP_BACK: u64 = 1000;

fn defs(n: usize) -> Vec<CardDefinition> {
    (0..n)
        .map(|i| {
            CardDefinition::new(format!("gopher-{}.png", i))
                .with_link(format!("https://gopherize.me/gopher/{}", i))
        })
        .collect()
}

fn options() -> GameOptions {
    GameOptions::default()
        .with_card_size(130, 140)
        .with_margins(10, 25)
        .with_seed(7)
}

fn surface() -> StaticSurface {
    StaticSurface::new(1001, 800)
}

fn new_game(pairs: usize) -> MemoryGame<StaticSurface> {
    MemoryGame::start(defs(pairs), options(), surface()).expect("valid game")
}

/// Game whose disclosed events are also collected through the handler
fn recording_game(pairs: usize) -> (MemoryGame<StaticSurface>, Rc<RefCell<Vec<PairDisclosed>>>) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let options = options().on_pair_disclosed(move |event| sink.borrow_mut().push(event.clone()));
    let game = MemoryGame::start(defs(pairs), options, surface()).expect("valid game");
    (game, seen)
}

fn card(pair: u32, slot: InstanceSlot) -> CardId {
    CardId::new(pair, slot)
}

fn first(pair: u32) -> CardId {
    card(pair, InstanceSlot::First)
}

fn second(pair: u32) -> CardId {
    card(pair, InstanceSlot::Second)
}

fn status(game: &MemoryGame<StaticSurface>, id: CardId) -> CardStatus {
    game.card(id).expect("card exists").status
}

/// Click a card and let its flip run to the end
fn flip(game: &mut MemoryGame<StaticSurface>, id: CardId) -> Vec<PairDisclosed> {
    assert_eq!(game.click(id), ClickOutcome::Flipped, "card {:?} should flip", id);
    game.advance(FLIP)
}

/// Match every pair still hidden, in index order
fn solve(game: &mut MemoryGame<StaticSurface>) -> Vec<PairDisclosed> {
    game.run_until_idle();
    let mut events = Vec::new();
    for pair in 0..game.total_pairs() as u32 {
        if !game.is_disclosed(pair) {
            events.extend(flip(game, first(pair)));
            events.extend(flip(game, second(pair)));
        }
    }
    events
}
