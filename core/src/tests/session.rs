use std::collections::BTreeMap;

use super::*;
use crate::error::GameError;

fn rotations_by_position(game: &MemoryGame<StaticSurface>) -> Vec<f64> {
    game.order()
        .iter()
        .map(|&id| game.card(id).expect("card").rotation)
        .collect()
}

fn rotations_by_card(game: &MemoryGame<StaticSurface>) -> BTreeMap<CardId, f64> {
    game.cards().iter().map(|c| (c.id, c.rotation)).collect()
}

fn all_hidden(game: &MemoryGame<StaticSurface>) -> bool {
    game.cards()
        .iter()
        .all(|c| c.status == CardStatus::Hidden && c.face == Face::Back && !c.is_animating())
}

// ==========================================
// RESET
// ==========================================

#[test]
fn test_reset_immediate_covers_everything() {
    let mut game = new_game(3);
    flip(&mut game, first(0));
    flip(&mut game, second(0));
    flip(&mut game, first(1));
    let order = game.pair_order();

    game.reset(false, false, false);

    assert!(all_hidden(&game));
    assert_eq!(game.moves(), 0);
    assert_eq!(game.disclosed_pairs(), 0);
    assert!(game.active().is_empty());
    assert_eq!(game.pair_order(), order);
    assert!(game.cards().iter().all(|c| !c.link_enabled));
}

#[test]
fn test_reset_cancels_pending_close() {
    let mut game = new_game(2);
    flip(&mut game, first(0));
    flip(&mut game, first(1));
    assert!(game.has_pending_close());

    game.reset(false, false, false);
    assert!(!game.has_pending_close());
    assert_eq!(game.pending_tasks(), 0);

    game.advance(5 * FLIP_BACK);
    assert!(all_hidden(&game));
}

#[test]
fn test_reset_with_reorder_keeps_position_rotations() {
    let mut game = new_game(6);
    let rotations = rotations_by_position(&game);
    let mut before = game.order().to_vec();

    game.reset(false, true, false);

    let mut after = game.order().to_vec();
    assert_eq!(rotations_by_position(&game), rotations);
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn test_rebuild_recreates_instances() {
    let mut game = new_game(3);
    flip(&mut game, first(2));
    flip(&mut game, second(2));

    game.reset(false, false, true);

    assert_eq!(game.cards().len(), 6);
    assert!(all_hidden(&game));
    assert_eq!(game.disclosed_pairs(), 0);
    assert_eq!(game.moves(), 0);
}

#[test]
fn test_animated_reset_waits_for_close() {
    let mut game = new_game(2);
    flip(&mut game, first(0));
    flip(&mut game, second(0));
    assert_eq!(game.disclosed_pairs(), 1);

    game.reset(true, false, false);

    assert!(game.pending_reset().is_some());
    assert_eq!(
        game.card(first(0)).map(|c| c.flip_direction),
        Some(FlipDirection::ToBack)
    );
    // Closing cards are still counted until the reset lands
    assert_eq!(game.disclosed_pairs(), 1);
    assert_eq!(game.click(first(1)), ClickOutcome::Ignored);

    game.advance(FLIP);

    assert!(game.pending_reset().is_none());
    assert!(all_hidden(&game));
    assert_eq!(game.disclosed_pairs(), 0);
    assert_eq!(game.moves(), 0);
}

#[test]
fn test_animated_reset_with_nothing_open_applies_at_once() {
    let mut game = new_game(2);
    game.reset(true, true, false);
    assert!(game.pending_reset().is_none());
    assert_eq!(game.pending_tasks(), 0);
}

#[test]
fn test_animated_reset_turns_back_card_mid_flip() {
    let mut game = new_game(2);
    game.click(first(0));
    game.advance(100);

    game.reset(true, false, false);
    assert_eq!(
        game.card(first(0)).map(|c| c.flip_direction),
        Some(FlipDirection::ToBack)
    );

    game.advance(FLIP);
    assert!(all_hidden(&game));
    assert!(game.active().is_empty());
    assert!(game.pending_reset().is_none());
}

#[test]
fn test_animated_rebuild_after_mismatch() {
    let mut game = new_game(2);
    flip(&mut game, first(0));
    flip(&mut game, first(1));

    game.reset(true, true, true);
    assert!(!game.has_pending_close());

    game.advance(FLIP);
    assert!(game.pending_reset().is_none());
    assert_eq!(game.cards().len(), 4);
    assert!(all_hidden(&game));
    assert_eq!(game.moves(), 0);
}

// ==========================================
// REORDER
// ==========================================

#[test]
fn test_explicit_order_is_idempotent() {
    let mut game = new_game(5);
    let order = game.pair_order();

    game.restore_order(order.clone()).expect("valid order");
    assert_eq!(game.pair_order(), order);

    game.reorder(true, true);
    assert_eq!(game.pair_order(), order);
}

#[test]
fn test_initial_order_is_used() {
    let mut options = options();
    options.initial_order = Some(vec![2, 0, 1, 1, 0, 2]);
    let game = MemoryGame::start(defs(3), options, surface()).expect("valid game");
    assert_eq!(game.pair_order(), vec![2, 0, 1, 1, 0, 2]);
}

#[test]
fn test_initial_order_with_wrong_length_is_ignored() {
    let mut options = options();
    options.initial_order = Some(vec![0, 0]);
    let game = MemoryGame::start(defs(3), options, surface()).expect("valid game");

    let mut pairs = game.pair_order();
    pairs.sort();
    assert_eq!(pairs, vec![0, 0, 1, 1, 2, 2]);
}

#[test]
fn test_restore_order_rejects_bad_input() {
    let mut game = new_game(2);
    let order = game.pair_order();

    assert_eq!(game.restore_order(vec![0, 1]), Err(GameError::InvalidOrder));
    assert_eq!(game.restore_order(vec![0, 0, 0, 1]), Err(GameError::InvalidOrder));
    assert_eq!(game.restore_order(vec![0, 1, 1, 7]), Err(GameError::InvalidOrder));
    assert_eq!(game.pair_order(), order);
}

#[test]
fn test_shuffle_without_keep_moves_rotation_with_card() {
    let mut game = new_game(6);
    let rotations = rotations_by_card(&game);

    game.reorder(false, false);

    assert_eq!(rotations_by_card(&game), rotations);
}

#[test]
fn test_rotations_within_bounds() {
    let game = new_game(10);
    let max = game.options().max_rotation;
    assert!(game.cards().iter().all(|c| c.rotation.abs() <= max));
    assert!(game.cards().iter().any(|c| c.rotation != 0.0));
}

// ==========================================
// LIFECYCLE
// ==========================================

#[test]
fn test_destroy_empties_board() {
    let mut game = new_game(3);
    flip(&mut game, first(0));
    flip(&mut game, first(1));

    game.destroy();

    assert!(game.cards().is_empty());
    assert!(game.order().is_empty());
    assert!(game.is_finished());
    assert_eq!(game.pending_tasks(), 0);
    assert_eq!(game.click(first(0)), ClickOutcome::Ignored);
    assert!(game.advance(10 * FLIP_BACK).is_empty());
}

#[test]
fn test_set_cards_rebuilds() {
    let mut game = new_game(2);
    flip(&mut game, first(0));

    game.set_cards(defs(4)).expect("valid cards");

    assert_eq!(game.total_pairs(), 4);
    assert_eq!(game.cards().len(), 8);
    assert_eq!(game.moves(), 0);
    assert!(all_hidden(&game));
}

#[test]
fn test_set_card_size() {
    let mut game = new_game(10);
    assert_eq!(game.layout().outer_width, 180);

    assert_eq!(
        game.set_card_size(0, 140),
        Err(GameError::InvalidCardSize {
            width: 0,
            height: 140
        })
    );
    assert_eq!(game.layout().outer_width, 180);

    game.set_card_size(100, 100).expect("valid size");
    assert_eq!(game.options().card_size, Some(crate::config::CardSize::new(100, 100)));
    assert_ne!(game.layout().outer_width, 180);
}

#[test]
fn test_set_max_rotation_rerolls() {
    let mut game = new_game(4);
    game.set_max_rotation(0.0);
    assert!(game.cards().iter().all(|c| c.rotation == 0.0));
}

#[test]
fn test_layout_applied_to_surface() {
    let game = new_game(10);
    assert_eq!(game.surface().applied, Some(*game.layout()));
    assert_eq!(game.layout().columns, 5);
    assert_eq!(game.layout().rows, 4);
}

#[test]
fn test_resize_follows_surface() {
    let mut game = new_game(10);
    game.surface_mut().width = 401;
    game.resize();
    assert_eq!(game.layout().columns, 2);
    assert_eq!(game.layout().rows, 10);
}
