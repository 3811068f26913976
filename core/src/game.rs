//! Memory game session
//!
//! Owns the card arena, the disclosure state and the task queue. Hosts feed
//! it clicks and elapsed time; everything else happens in task handlers.

use std::collections::BTreeSet;

use crate::config::{CardSize, GameOptions};
use crate::error::{GameError, GameResult};
use crate::flip::{FlipPhase, FlipSequencer, FlipStep};
use crate::layout::{self, Layout, LayoutParams, Surface};
use crate::log;
use crate::rng::{ShuffleRng, XorShiftRng};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::snapshot::GameSnapshot;
use crate::types::*;
use crate::view::BoardView;

/// Seed used when the host does not provide one
pub const DEFAULT_SEED: u64 = 42;

/// Continuations queued on the scheduler
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// One half of a flip animation has finished
    FlipPhaseEnd { card: CardId, phase: FlipPhase },
    /// Turn the mismatched active pair back over
    CloseActive,
    /// Deliver a pair-disclosed event to the host
    EmitPairDisclosed(PairDisclosed),
}

/// Reset deferred until closing animations finish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetRequest {
    pub reorder: bool,
    pub rebuild: bool,
}

/// Disclosure and move tracking
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub disclosed: BTreeSet<u32>,
    /// Cards flipped face up and awaiting evaluation, at most two
    pub active: Vec<CardId>,
    pub moves: u32,
    close_timer: Option<TaskHandle>,
    reset_pending: Option<ResetRequest>,
}

pub struct MemoryGame<S: Surface> {
    definitions: Vec<CardDefinition>,
    options: GameOptions,
    surface: S,
    /// Arena indexed by `CardId`
    cards: Vec<CardInstance>,
    /// Physical display order
    order: Vec<CardId>,
    state: GameState,
    scheduler: Scheduler<Task>,
    flips: FlipSequencer,
    rng: XorShiftRng,
    layout: Layout,
}

impl<S: Surface> MemoryGame<S> {
    /// Build a game from the host's card list.
    ///
    /// Fails without building anything if the options are invalid.
    pub fn start(
        definitions: Vec<CardDefinition>,
        options: GameOptions,
        surface: S,
    ) -> GameResult<Self> {
        log::info("=== MEMORY GAME STARTING ===");
        options.validate(definitions.len())?;

        let seed = options.seed.unwrap_or(DEFAULT_SEED);
        let flips = FlipSequencer::new(options.card_flip_duration, options.easing);
        let mut game = Self {
            definitions,
            options,
            surface,
            cards: Vec::new(),
            order: Vec::new(),
            state: GameState::default(),
            scheduler: Scheduler::new(),
            flips,
            rng: XorShiftRng::seed_from_u64(seed),
            layout: Layout::default(),
        };

        for &pair in &game.options.already_disclosed_pairs {
            game.state.disclosed.insert(pair);
        }
        game.build();
        log::action(
            "start",
            &format!(
                "pairs={}, already_disclosed={}, seed={}",
                game.definitions.len(),
                game.state.disclosed.len(),
                seed
            ),
        );
        game.log_state();
        Ok(game)
    }

    // ==========================================
    // ACCESSORS
    // ==========================================

    pub fn definitions(&self) -> &[CardDefinition] {
        &self.definitions
    }

    pub fn options(&self) -> &GameOptions {
        &self.options
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn card(&self, id: CardId) -> Option<&CardInstance> {
        self.cards.get(id.index())
    }

    /// All instances in arena (id) order
    pub fn cards(&self) -> &[CardInstance] {
        &self.cards
    }

    /// Instances in physical display order
    pub fn order(&self) -> &[CardId] {
        &self.order
    }

    /// Pair index at each physical position
    pub fn pair_order(&self) -> Vec<u32> {
        self.order.iter().map(|id| id.pair_index()).collect()
    }

    /// The active pair, in flip order
    pub fn active(&self) -> &[CardId] {
        &self.state.active
    }

    pub fn moves(&self) -> u32 {
        self.state.moves
    }

    pub fn disclosed_pairs(&self) -> usize {
        self.state.disclosed.len()
    }

    pub fn is_disclosed(&self, pair_index: u32) -> bool {
        self.state.disclosed.contains(&pair_index)
    }

    pub fn total_pairs(&self) -> usize {
        self.definitions.len()
    }

    /// True once every pair is disclosed; an empty game is finished at once
    pub fn is_finished(&self) -> bool {
        self.state.disclosed.len() == self.definitions.len()
    }

    /// True while no hidden card may start a flip
    pub fn is_locked(&self) -> bool {
        !self.flips.is_idle() || self.state.active.len() >= 2
    }

    pub fn has_pending_close(&self) -> bool {
        self.state
            .close_timer
            .is_some_and(|handle| self.scheduler.is_pending(handle))
    }

    pub fn pending_reset(&self) -> Option<ResetRequest> {
        self.state.reset_pending
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    /// Time at which the next queued task runs, if any
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    /// Horizontal scale of a card at the current instant
    pub fn scale_of(&self, id: CardId) -> f64 {
        self.flips.scale(id, self.scheduler.now())
    }

    pub fn view(&self) -> BoardView {
        BoardView::from_game(self)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            order: self.pair_order(),
            disclosed: self.state.disclosed.iter().copied().collect(),
        }
    }

    // ==========================================
    // INPUT
    // ==========================================

    /// Route a click on a card through the state machine
    pub fn click(&mut self, id: CardId) -> ClickOutcome {
        let Some(card) = self.cards.get(id.index()) else {
            log::warn(&format!("click on unknown card {}", id.0));
            return ClickOutcome::Ignored;
        };

        if card.is_animating() || self.state.active.len() > 1 {
            log::debug("click", &format!("card {} ignored: busy", id.0));
            return ClickOutcome::Ignored;
        }

        match card.status {
            CardStatus::Revealed => {
                let linked = self
                    .definitions
                    .get(card.pair_index as usize)
                    .is_some_and(CardDefinition::has_link);
                if card.link_enabled && linked {
                    ClickOutcome::Navigate
                } else {
                    ClickOutcome::Ignored
                }
            }
            CardStatus::Flipping => ClickOutcome::Ignored,
            CardStatus::Hidden => {
                if !self.flips.is_idle() {
                    log::debug("click", &format!("card {} ignored: flip in progress", id.0));
                    return ClickOutcome::Ignored;
                }
                self.state.moves += 1;
                log::action("click", &format!("card={}, moves={}", id.0, self.state.moves));
                self.start_flip(id, FlipDirection::ToFront);
                self.log_state();
                ClickOutcome::Flipped
            }
        }
    }

    /// Move the clock forward, running every task that falls due.
    ///
    /// Returns the pair-disclosed events delivered during this step, after
    /// handing each to the `on_pair_disclosed` handler.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<PairDisclosed> {
        let until = self.scheduler.now().saturating_add(elapsed_ms);
        let mut events = Vec::new();
        while let Some(task) = self.scheduler.pop_due(until) {
            self.run_task(task, &mut events);
        }
        self.scheduler.settle(until);
        events
    }

    /// Run every queued task regardless of how far in the future it is
    pub fn run_until_idle(&mut self) -> Vec<PairDisclosed> {
        let mut events = Vec::new();
        while let Some(due) = self.scheduler.next_due() {
            let elapsed = due.saturating_sub(self.scheduler.now());
            events.extend(self.advance(elapsed));
        }
        events
    }

    // ==========================================
    // SESSION CONTROL
    // ==========================================

    /// Cover all cards, optionally reshuffling or rebuilding.
    ///
    /// When `animated`, revealed cards are flipped back first and the reset
    /// runs once those flips have finished.
    pub fn reset(&mut self, animated: bool, reorder: bool, rebuild: bool) {
        log::action(
            "reset",
            &format!("animated={}, reorder={}, rebuild={}", animated, reorder, rebuild),
        );
        if animated {
            self.state.reset_pending = Some(ResetRequest { reorder, rebuild });
            self.close_cards();
            if self.flips.is_idle() {
                self.apply_pending_reset();
            }
            return;
        }

        self.state.reset_pending = None;
        if rebuild {
            self.clean_up();
            self.build();
        } else {
            self.reset_cards();
            if reorder {
                self.reorder(true, false);
            }
        }
        self.log_state();
    }

    /// Shuffle the physical order, or apply the configured explicit order.
    ///
    /// With `keep_rotations` every position keeps the tilt it had, otherwise
    /// cards carry their own tilt with them. An explicit order always moves
    /// cards with their tilt.
    pub fn reorder(&mut self, keep_rotations: bool, use_explicit_order: bool) {
        let explicit = if use_explicit_order {
            self.options
                .usable_order(self.definitions.len())
                .map(<[u32]>::to_vec)
        } else {
            None
        };

        match explicit {
            Some(order) => {
                log::action("reorder", "explicit order");
                self.order = self.arrange_by_pairs(&order);
            }
            None => {
                log::action("reorder", &format!("shuffle, keep_rotations={}", keep_rotations));
                let rotations: Vec<f64> = self
                    .order
                    .iter()
                    .map(|id| self.cards[id.index()].rotation)
                    .collect();
                let shuffled = self.rng.shuffle_into(self.order.clone());
                if keep_rotations {
                    for (id, rotation) in shuffled.iter().zip(rotations) {
                        self.cards[id.index()].rotation = rotation;
                    }
                }
                self.order = shuffled;
            }
        }
    }

    /// Place cards in the given pair order, e.g. from a saved snapshot
    pub fn restore_order(&mut self, order: Vec<u32>) -> GameResult<()> {
        if order.len() != self.definitions.len() * 2 {
            return Err(GameError::InvalidOrder);
        }
        let previous = self.options.initial_order.replace(order);
        if let Err(e) = self.options.validate(self.definitions.len()) {
            log::result(false, &format!("restore_order: {}", e));
            self.options.initial_order = previous;
            return Err(e);
        }
        self.reorder(false, true);
        log::result(true, "restore_order");
        Ok(())
    }

    /// Re-measure and re-layout without reshuffling
    pub fn rearrange(&mut self) {
        log::action("rearrange", "re-layout in place");
        self.resize();
    }

    /// Recompute the layout from the surface's current size
    pub fn resize(&mut self) {
        let params = LayoutParams {
            width: 0,
            max_height: 0,
            card_count: self.cards.len(),
            card_size: self.options.card_size.unwrap_or(CardSize::new(0, 0)),
            margins: self.options.margins,
            preferred_aspect_ratio: self.options.preferred_aspect_ratio,
        };
        let (layout, passes) = layout::reflow(&mut self.surface, params);
        log::debug(
            "resize",
            &format!(
                "columns={}, rows={}, box={}x{}, passes={}",
                layout.columns, layout.rows, layout.outer_width, layout.outer_height, passes
            ),
        );
        self.layout = layout;
    }

    /// Tear the board down; the game is left empty
    pub fn destroy(&mut self) {
        log::action("destroy", &format!("pairs={}", self.definitions.len()));
        self.clean_up();
        self.definitions.clear();
        self.resize();
    }

    /// Replace the card list and rebuild the board
    pub fn set_cards(&mut self, definitions: Vec<CardDefinition>) -> GameResult<()> {
        // Pre-disclosed pairs only apply to the first build.
        self.options.already_disclosed_pairs.clear();
        self.options.validate(definitions.len())?;
        log::action("set_cards", &format!("pairs={}", definitions.len()));
        self.definitions = definitions;
        self.reset(false, true, true);
        Ok(())
    }

    /// Change the card content size and re-layout
    pub fn set_card_size(&mut self, width: u32, height: u32) -> GameResult<()> {
        let previous = self.options.card_size.replace(CardSize::new(width, height));
        if let Err(e) = self.options.validate(self.definitions.len()) {
            log::result(false, &format!("set_card_size: {}", e));
            self.options.card_size = previous;
            return Err(e);
        }
        self.rearrange();
        Ok(())
    }

    /// Change the maximum tilt, re-rolling every card's rotation
    pub fn set_max_rotation(&mut self, degrees: f64) {
        self.options.max_rotation = degrees;
        self.roll_rotations();
        self.rearrange();
    }

    // ==========================================
    // INTERNALS
    // ==========================================

    fn build(&mut self) {
        self.cards = (0..self.definitions.len() as u32)
            .flat_map(|pair| InstanceSlot::BOTH.map(|slot| CardInstance::new(pair, slot)))
            .collect();
        for card in &mut self.cards {
            if self.state.disclosed.contains(&card.pair_index) {
                card.reveal();
            }
        }
        self.order = self.cards.iter().map(|card| card.id).collect();
        self.reorder(true, true);
        self.resize();
        self.roll_rotations();
    }

    fn roll_rotations(&mut self) {
        let max = self.options.max_rotation;
        for id in &self.order {
            self.cards[id.index()].rotation = self.rng.signed_unit(max);
        }
    }

    /// Order the current instances by pair index, popping duplicates
    fn arrange_by_pairs(&self, order: &[u32]) -> Vec<CardId> {
        let mut buckets: Vec<Vec<CardId>> = vec![Vec::new(); self.definitions.len()];
        for &id in &self.order {
            buckets[id.pair_index() as usize].push(id);
        }
        order
            .iter()
            .filter_map(|&pair| buckets.get_mut(pair as usize).and_then(Vec::pop))
            .collect()
    }

    fn start_flip(&mut self, id: CardId, direction: FlipDirection) {
        let card = &mut self.cards[id.index()];
        card.flip_direction = direction;
        if direction == FlipDirection::ToFront {
            card.status = CardStatus::Flipping;
            self.state.active.push(id);
            debug_assert!(self.state.active.len() <= 2, "more than two active cards");
        }
        self.flips.start(&mut self.scheduler, id, direction);
    }

    fn run_task(&mut self, task: Task, events: &mut Vec<PairDisclosed>) {
        match task {
            Task::FlipPhaseEnd { card, phase } => {
                match self.flips.on_phase_end(&mut self.scheduler, card, phase) {
                    Some(FlipStep::SwapFace(face)) => self.cards[card.index()].face = face,
                    Some(FlipStep::Completed(direction)) => self.finish_flip(card, direction),
                    None => {}
                }
            }
            Task::CloseActive => {
                self.state.close_timer = None;
                log::debug("close", &format!("closing {} cards", self.state.active.len()));
                for id in self.state.active.clone() {
                    self.start_flip(id, FlipDirection::ToBack);
                }
            }
            Task::EmitPairDisclosed(event) => {
                log::action(
                    "pair_disclosed",
                    &format!(
                        "pair={}, disclosed={}/{}, moves={}, finished={}",
                        event.pair_index,
                        event.disclosed_pairs,
                        event.total_pairs,
                        event.moves,
                        event.finished
                    ),
                );
                if let Some(handler) = self.options.on_pair_disclosed.as_mut() {
                    handler(&event);
                }
                events.push(event);
            }
        }
    }

    fn finish_flip(&mut self, id: CardId, direction: FlipDirection) {
        match direction {
            FlipDirection::ToFront => {
                assert!(
                    self.state.active.contains(&id),
                    "flip to front ended on card {} outside the active pair",
                    id.0
                );
                self.cards[id.index()].flip_direction = FlipDirection::None;
                if let [first, second] = self.state.active[..] {
                    if first.pair_index() == second.pair_index() {
                        self.disclose(id, first, second);
                    } else {
                        self.close_active_later();
                    }
                }
            }
            FlipDirection::ToBack => {
                self.cards[id.index()].hide();
                let all_closed = self
                    .state
                    .active
                    .iter()
                    .all(|active| self.cards[active.index()].status == CardStatus::Hidden);
                if all_closed {
                    self.state.active.clear();
                }
                if self.state.reset_pending.is_some() && self.flips.is_idle() {
                    self.apply_pending_reset();
                }
            }
            FlipDirection::None => {}
        }
    }

    fn disclose(&mut self, trigger: CardId, first: CardId, second: CardId) {
        self.cards[first.index()].reveal();
        self.cards[second.index()].reveal();
        let pair_index = trigger.pair_index();
        self.state.disclosed.insert(pair_index);
        self.state.active.clear();

        let disclosed_pairs = self.state.disclosed.len() as u32;
        let total_pairs = self.definitions.len() as u32;
        let event = PairDisclosed {
            card: trigger,
            pair_index,
            definition: self.definitions[pair_index as usize].clone(),
            disclosed_pairs,
            total_pairs,
            moves: self.state.moves,
            finished: disclosed_pairs == total_pairs,
        };
        self.scheduler.next_tick(Task::EmitPairDisclosed(event));
        self.log_state();
    }

    /// Schedule the mismatch close, replacing any close already pending
    fn close_active_later(&mut self) {
        if let Some(handle) = self.state.close_timer.take() {
            self.scheduler.cancel(handle);
        }
        let delay = self.options.flip_back_timeout;
        log::debug("close", &format!("mismatch, closing in {}ms", delay));
        self.state.close_timer = Some(self.scheduler.schedule_after(delay, Task::CloseActive));
    }

    /// Flip every face-up card back, as the first half of an animated reset
    fn close_cards(&mut self) {
        if let Some(handle) = self.state.close_timer.take() {
            self.scheduler.cancel(handle);
        }
        let closing: Vec<CardId> = self
            .cards
            .iter()
            .filter(|card| {
                card.status != CardStatus::Hidden && card.flip_direction != FlipDirection::ToBack
            })
            .map(|card| card.id)
            .collect();
        for id in closing {
            self.start_flip(id, FlipDirection::ToBack);
        }
    }

    fn apply_pending_reset(&mut self) {
        if let Some(request) = self.state.reset_pending.take() {
            self.reset(false, request.reorder, request.rebuild);
        }
    }

    fn reset_cards(&mut self) {
        self.scheduler.clear();
        self.flips.clear();
        self.state = GameState::default();
        for card in &mut self.cards {
            card.hide();
        }
    }

    fn clean_up(&mut self) {
        self.scheduler.clear();
        self.flips.clear();
        self.state = GameState::default();
        self.cards.clear();
        self.order.clear();
    }

    fn log_state(&self) {
        log::state_summary(
            self.scheduler.now(),
            self.state.moves,
            self.state.disclosed.len(),
            self.definitions.len(),
            self.state.active.len(),
            self.scheduler.len(),
        );
    }
}
