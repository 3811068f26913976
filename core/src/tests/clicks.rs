use super::*;

#[test]
fn test_second_click_blocked_while_first_card_animates() {
    let mut game = new_game(2);

    assert_eq!(game.click(first(0)), ClickOutcome::Flipped);
    game.advance(100);
    assert!(game.is_locked());
    assert_eq!(game.click(first(1)), ClickOutcome::Ignored);
    assert_eq!(game.moves(), 1);
    assert_eq!(status(&game, first(1)), CardStatus::Hidden);

    game.advance(FLIP - 100);
    assert!(!game.is_locked());
    assert_eq!(game.click(first(1)), ClickOutcome::Flipped);
    assert_eq!(game.moves(), 2);
}

#[test]
fn test_click_on_animating_card_is_ignored() {
    let mut game = new_game(1);

    game.click(first(0));
    assert_eq!(game.click(first(0)), ClickOutcome::Ignored);
    assert_eq!(game.moves(), 1);
    assert_eq!(game.active().len(), 1);
}

#[test]
fn test_click_on_face_up_unmatched_card_is_ignored() {
    let mut game = new_game(2);

    flip(&mut game, first(0));
    assert_eq!(status(&game, first(0)), CardStatus::Flipping);
    assert_eq!(game.click(first(0)), ClickOutcome::Ignored);
    assert_eq!(game.moves(), 1);
    assert_eq!(game.active(), &[first(0)]);
}

#[test]
fn test_revealed_card_with_link_navigates_without_state_change() {
    let mut game = new_game(2);
    flip(&mut game, first(0));
    flip(&mut game, second(0));

    let before: Vec<CardInstance> = game.cards().to_vec();
    let moves = game.moves();

    assert_eq!(game.click(first(0)), ClickOutcome::Navigate);
    assert!(game.click(second(0)).is_navigable());
    assert_eq!(game.moves(), moves);
    assert_eq!(game.cards(), &before[..]);
}

#[test]
fn test_revealed_card_without_link_is_suppressed() {
    let cards = vec![
        CardDefinition::new("plain.png"),
        CardDefinition::new("empty-link.png").with_link(""),
    ];
    let mut game = MemoryGame::start(cards, options(), surface()).expect("valid game");

    solve(&mut game);
    assert!(game.is_finished());
    assert_eq!(game.click(first(0)), ClickOutcome::Ignored);
    assert_eq!(game.click(second(1)), ClickOutcome::Ignored);
}

#[test]
fn test_unknown_card_is_ignored() {
    let mut game = new_game(1);
    assert_eq!(game.click(CardId(99)), ClickOutcome::Ignored);
    assert_eq!(game.moves(), 0);
}

#[test]
fn test_link_click_allowed_while_other_card_animates() {
    let mut game = new_game(2);
    flip(&mut game, first(0));
    flip(&mut game, second(0));

    game.click(first(1));
    assert!(game.is_locked());
    assert_eq!(game.click(first(0)), ClickOutcome::Navigate);
}

#[test]
fn test_single_close_timer_pending_after_mismatch() {
    let mut game = new_game(2);

    flip(&mut game, first(0));
    flip(&mut game, first(1));
    assert!(game.has_pending_close());
    assert_eq!(game.pending_tasks(), 1);
    assert_eq!(game.next_due(), Some(2 * FLIP + FLIP_BACK));

    game.advance(FLIP_BACK);
    assert!(!game.has_pending_close());
    game.advance(FLIP);
    assert_eq!(game.pending_tasks(), 0);
    assert_eq!(game.next_due(), None);
}
