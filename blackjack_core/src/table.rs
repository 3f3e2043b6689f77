//! The round engine: betting, dealing, per-seat turn resolution, dealer
//! policy and settlement over a table of one human seat plus automated
//! seats. The shoe and the running count are owned here; nothing else
//! draws cards or touches the count.

use crate::card::{Card, Rank};
use crate::count::HiLoCount;
use crate::error::GameError;
use crate::hand::{Hand, HandStatus};
use crate::player::Player;
use crate::shoe::Shoe;
use crate::strategy::{count_bet, Action, BASIC_STRATEGY};
use crate::GameConfig;
use log::{debug, info};
use std::collections::HashSet;

/// Decision source for the human seat. The engine blocks on these calls;
/// implementations are expected to return a legal value (the console layer
/// re-prompts until it has one), and the engine rejects anything else with
/// an error rather than guessing.
pub trait Decider {
    /// The bet for this round, within `[min_bet, wallet]`.
    fn choose_bet(&mut self, table: &BlackjackTable, seat: usize) -> u32;

    /// Whether to place an insurance side bet of half the main bet.
    fn take_insurance(&mut self, table: &BlackjackTable, state: &TurnState) -> bool;

    /// The next play for the hand in `state`, drawn from `legal`.
    fn choose_action(
        &mut self,
        table: &BlackjackTable,
        state: &TurnState,
        legal: &HashSet<Action>,
    ) -> Action;

    /// Table happenings worth showing. Purely observational.
    fn notify(&mut self, _table: &BlackjackTable, _event: &TableEvent) {}
}

/// Snapshot handed to the `Decider` at each decision point.
#[derive(Debug, Clone)]
pub struct TurnState {
    pub seat: usize,
    pub hand_index: usize,
    pub hand: Hand,
    pub dealer_up: Card,
    pub wallet: f32,
}

/// Things that happened at the table, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent {
    Reshuffled,
    BetPlaced { seat: usize, bet: u32 },
    CardDealt { seat: usize, card: Card },
    DealerShows { card: Card },
    HoleCardDealt,
    InsurancePlaced { seat: usize, amount: f32 },
    DealerBlackjack,
    ActionTaken { seat: usize, hand_index: usize, action: Action },
    HoleRevealed { card: Card },
    DealerDraws { card: Card },
    DealerStands { value: u8 },
    DealerBusts { value: u8 },
}

/// How a single hand settled against the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Blackjack,
    Win,
    Push,
    Loss,
}

/// One settled hand: the cards as they ended, the main-bet outcome and the
/// amounts returned to the wallet.
#[derive(Debug, Clone)]
pub struct HandResult {
    pub seat: usize,
    pub hand: Hand,
    pub outcome: Outcome,
    pub payout: f32,
    pub insurance_payout: f32,
}

/// Per-seat money movement for one round. `wallet_after` is the wallet once
/// settlement has run; conservation holds as
/// `wallet_after == wallet_before - staked + returned`.
#[derive(Debug, Clone)]
pub struct SeatLedger {
    pub name: String,
    pub staked: f32,
    pub returned: f32,
    pub wallet_after: f32,
}

/// Everything the caller needs to report a finished round.
#[derive(Debug, Clone)]
pub struct RoundSummary {
    pub results: Vec<HandResult>,
    pub ledgers: Vec<SeatLedger>,
    pub dealer_hand: Hand,
    pub dealer_value: u8,
    pub dealer_blackjack: bool,
    pub dealer_busted: bool,
}

/// Result of driving one round to completion.
#[derive(Debug, Clone)]
pub enum RoundOutcome {
    Completed(RoundSummary),
    /// The human seat can no longer cover the table minimum.
    HumanOut,
}

/// A blackjack table with the human at seat 0 and automated seats after it.
pub struct BlackjackTable {
    shoe: Shoe,
    count: HiLoCount,
    players: Vec<Player>,
    dealer_hand: Hand,
    hole_revealed: bool,
    ledgers: Vec<SeatLedger>,
    config: GameConfig,
}

impl BlackjackTable {
    pub fn new(config: GameConfig, human_name: impl Into<String>) -> Result<BlackjackTable, GameError> {
        config.validate()?;
        let shoe = match config.seed {
            Some(seed) => Shoe::with_seed(config.num_decks, config.penetration, seed),
            None => Shoe::new(config.num_decks, config.penetration),
        };
        let mut players = vec![Player::new(human_name, true, config.starting_wallet)];
        for i in 1..=config.num_cpu_players {
            players.push(Player::new(format!("CPU {}", i), false, config.starting_wallet));
        }
        Ok(BlackjackTable {
            shoe,
            count: HiLoCount::new(),
            players,
            dealer_hand: Hand::new(0),
            hole_revealed: false,
            ledgers: Vec::new(),
            config,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    /// The dealer's face-up card, once the initial deal has happened.
    pub fn dealer_up_card(&self) -> Option<Card> {
        self.dealer_hand.cards.first().copied()
    }

    pub fn hole_revealed(&self) -> bool {
        self.hole_revealed
    }

    pub fn running_count(&self) -> i32 {
        self.count.running_count()
    }

    pub fn true_count(&self) -> f32 {
        self.count.true_count(self.shoe.decks_remaining())
    }

    pub fn cards_remaining(&self) -> usize {
        self.shoe.len()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Plays one full round: reshuffle-check, clear, bet, deal, insurance,
    /// player turns, dealer turn, settle. Returns `HumanOut` when the human
    /// seat cannot cover the minimum bet.
    pub fn play_round(&mut self, human: &mut dyn Decider) -> Result<RoundOutcome, GameError> {
        self.reshuffle_check(human);
        self.clear_table();
        if !self.place_bets(human)? {
            return Ok(RoundOutcome::HumanOut);
        }
        self.deal_initial(human);
        if self.dealer_up_card().map(|c| c.rank) == Some(Rank::Ace) {
            self.offer_insurance(human);
        }
        if self.dealer_hand.is_natural() {
            human.notify(&*self, &TableEvent::DealerBlackjack);
            self.reveal_hole(human);
        } else {
            self.player_turns(human)?;
            self.dealer_turn(human);
        }
        Ok(RoundOutcome::Completed(self.settle()))
    }

    /// Rebuilds the shoe and zeroes the count once penetration is reached.
    fn reshuffle_check(&mut self, human: &mut dyn Decider) {
        if self.shoe.needs_shuffle() {
            self.shoe.rebuild();
            self.count.reset();
            info!("reshuffled, count reset");
            human.notify(&*self, &TableEvent::Reshuffled);
        }
    }

    fn clear_table(&mut self) {
        for player in self.players.iter_mut() {
            player.clear_hands();
        }
        self.dealer_hand = Hand::new(0);
        self.hole_revealed = false;
        self.ledgers = self
            .players
            .iter()
            .map(|p| SeatLedger {
                name: p.name.clone(),
                staked: 0.0,
                returned: 0.0,
                wallet_after: p.wallet,
            })
            .collect();
    }

    /// Collects one bet per eligible seat. Seats short of the minimum sit
    /// out; a short human seat ends the session. Returns whether the round
    /// goes ahead.
    fn place_bets(&mut self, human: &mut dyn Decider) -> Result<bool, GameError> {
        let min = self.config.min_bet;
        for seat in 0..self.players.len() {
            if !self.players[seat].can_play(min) {
                if self.players[seat].is_human {
                    info!("human seat below the minimum bet, ending session");
                    return Ok(false);
                }
                debug!("seat {} sits out this round", seat);
                continue;
            }
            let wallet = self.players[seat].wallet;
            let cap = wallet as u32;
            let bet = if self.players[seat].is_human {
                let bet = human.choose_bet(&*self, seat);
                if bet < min || bet > cap {
                    return Err(GameError::InvalidBet { bet, min, max: cap });
                }
                bet
            } else {
                count_bet(min, self.true_count(), wallet)
            };
            self.players[seat].wallet -= bet as f32;
            self.players[seat].hands.push(Hand::new(bet));
            self.ledgers[seat].staked += bet as f32;
            human.notify(&*self, &TableEvent::BetPlaced { seat, bet });
        }
        Ok(true)
    }

    /// Two round-robin passes: every active seat then the dealer. The hole
    /// card stays out of the count until reveal.
    fn deal_initial(&mut self, human: &mut dyn Decider) {
        for pass in 0..2 {
            for seat in 0..self.players.len() {
                if self.players[seat].hands.is_empty() {
                    continue;
                }
                let card = self.draw_seen();
                self.players[seat].hands[0].add_card(card);
                human.notify(&*self, &TableEvent::CardDealt { seat, card });
            }
            if pass == 0 {
                let card = self.draw_seen();
                self.dealer_hand.add_card(card);
                human.notify(&*self, &TableEvent::DealerShows { card });
            } else {
                // face down: the count update is deferred to the reveal
                let card = self.shoe.draw();
                self.dealer_hand.add_card(card);
                human.notify(&*self, &TableEvent::HoleCardDealt);
            }
        }
        for player in self.players.iter_mut() {
            if let Some(hand) = player.hands.first_mut() {
                if hand.is_natural() {
                    hand.status = HandStatus::Blackjack;
                }
            }
        }
    }

    /// Offers the side bet while the up-card is an ace. Automated seats buy
    /// in on a true count of 3 or better.
    fn offer_insurance(&mut self, human: &mut dyn Decider) {
        let dealer_up = self.dealer_hand.cards[0];
        for seat in 0..self.players.len() {
            if self.players[seat].hands.is_empty() {
                continue;
            }
            let hand = &self.players[seat].hands[0];
            if hand.status == HandStatus::Blackjack {
                continue;
            }
            let stake = hand.bet as f32 / 2.0;
            if self.players[seat].wallet < stake {
                continue;
            }
            let takes = if self.players[seat].is_human {
                let state = TurnState {
                    seat,
                    hand_index: 0,
                    hand: hand.clone(),
                    dealer_up,
                    wallet: self.players[seat].wallet,
                };
                human.take_insurance(&*self, &state)
            } else {
                self.true_count() >= 3.0
            };
            if takes {
                self.players[seat].wallet -= stake;
                self.players[seat].hands[0].insurance = stake;
                self.ledgers[seat].staked += stake;
                human.notify(&*self, &TableEvent::InsurancePlaced { seat, amount: stake });
            }
        }
    }

    /// Resolves every non-dealer hand, including hands spawned by a split
    /// mid-iteration.
    fn player_turns(&mut self, human: &mut dyn Decider) -> Result<(), GameError> {
        let dealer_up = self.dealer_hand.cards[0];
        for seat in 0..self.players.len() {
            let mut hand_index = 0;
            while hand_index < self.players[seat].hands.len() {
                while self.players[seat].hands[hand_index].status == HandStatus::Playing {
                    let legal = self.legal_actions(seat, hand_index);
                    let state = TurnState {
                        seat,
                        hand_index,
                        hand: self.players[seat].hands[hand_index].clone(),
                        dealer_up,
                        wallet: self.players[seat].wallet,
                    };
                    let action = if self.players[seat].is_human {
                        let action = human.choose_action(&*self, &state, &legal);
                        if !legal.contains(&action) {
                            return Err(GameError::IllegalAction { action });
                        }
                        action
                    } else {
                        BASIC_STRATEGY.recommend_filtered(&state.hand, dealer_up, &legal)
                    };
                    debug!("seat {} hand {}: {}", seat, hand_index, action);
                    self.apply_action(seat, hand_index, action);
                    human.notify(&*self, &TableEvent::ActionTaken { seat, hand_index, action });
                }
                hand_index += 1;
            }
        }
        Ok(())
    }

    /// The legal plays for a hand right now: hit and stand always, double
    /// only on the first decision with the wallet covering a second bet,
    /// split only on a pair with one split level still available.
    fn legal_actions(&self, seat: usize, hand_index: usize) -> HashSet<Action> {
        let player = &self.players[seat];
        let hand = &player.hands[hand_index];
        let mut legal = HashSet::from([Action::Hit, Action::Stand]);
        let covers_bet = player.wallet >= hand.bet as f32;
        if hand.cards.len() == 2 && covers_bet {
            legal.insert(Action::Double);
        }
        if hand.can_split() && covers_bet && player.hands.len() < 2 {
            legal.insert(Action::Split);
        }
        legal
    }

    fn apply_action(&mut self, seat: usize, hand_index: usize, action: Action) {
        match action {
            Action::Hit => {
                let card = self.draw_seen();
                self.players[seat].hands[hand_index].add_card(card);
            }
            Action::Stand => {
                self.players[seat].hands[hand_index].stand();
            }
            Action::Double => {
                let bet = self.players[seat].hands[hand_index].bet;
                self.players[seat].wallet -= bet as f32;
                self.ledgers[seat].staked += bet as f32;
                self.players[seat].hands[hand_index].bet = bet * 2;
                let card = self.draw_seen();
                let hand = &mut self.players[seat].hands[hand_index];
                hand.add_card(card);
                if hand.status == HandStatus::Playing {
                    hand.stand();
                }
            }
            Action::Split => {
                let bet = self.players[seat].hands[hand_index].bet;
                self.players[seat].wallet -= bet as f32;
                self.ledgers[seat].staked += bet as f32;
                let sibling = self.players[seat].hands[hand_index].split_off();
                self.players[seat].hands.insert(hand_index + 1, sibling);
                let card = self.draw_seen();
                self.players[seat].hands[hand_index].add_card(card);
                let card = self.draw_seen();
                self.players[seat].hands[hand_index + 1].add_card(card);
            }
        }
    }

    /// Applies the deferred count update for the hole card.
    fn reveal_hole(&mut self, human: &mut dyn Decider) {
        if self.hole_revealed {
            return;
        }
        self.hole_revealed = true;
        let card = self.dealer_hand.cards[1];
        self.count.observe(card);
        human.notify(&*self, &TableEvent::HoleRevealed { card });
    }

    /// Reveals the hole card, then draws to 17, hitting a soft 17 when the
    /// table rule says so.
    fn dealer_turn(&mut self, human: &mut dyn Decider) {
        self.reveal_hole(human);
        loop {
            let value = self.dealer_hand.value();
            let hits = value < 17
                || (value == 17 && self.dealer_hand.is_soft() && self.config.hits_soft_17);
            if !hits {
                break;
            }
            let card = self.draw_seen();
            self.dealer_hand.add_card(card);
            human.notify(&*self, &TableEvent::DealerDraws { card });
        }
        let value = self.dealer_hand.value();
        if self.dealer_hand.status == HandStatus::Bust {
            human.notify(&*self, &TableEvent::DealerBusts { value });
        } else {
            self.dealer_hand.stand();
            human.notify(&*self, &TableEvent::DealerStands { value });
        }
    }

    /// Settles every hand against the dealer: insurance first at 2:1, then
    /// the main bet by status and value comparison. Only wallets move.
    fn settle(&mut self) -> RoundSummary {
        let dealer_blackjack = self.dealer_hand.is_natural();
        let dealer_value = self.dealer_hand.value();
        let dealer_busted = dealer_value > 21;
        let mut results = Vec::new();
        for seat in 0..self.players.len() {
            for hand in self.players[seat].hands.clone() {
                let insurance_payout = if dealer_blackjack && hand.insurance > 0.0 {
                    hand.insurance * 3.0
                } else {
                    0.0
                };
                let bet = hand.bet as f32;
                let (outcome, payout) = match hand.status {
                    HandStatus::Blackjack if dealer_blackjack => (Outcome::Push, bet),
                    HandStatus::Blackjack => (Outcome::Blackjack, bet * 2.5),
                    HandStatus::Bust => (Outcome::Loss, 0.0),
                    _ if dealer_busted => (Outcome::Win, bet * 2.0),
                    _ => {
                        let value = hand.value();
                        if value > dealer_value {
                            (Outcome::Win, bet * 2.0)
                        } else if value == dealer_value {
                            (Outcome::Push, bet)
                        } else {
                            (Outcome::Loss, 0.0)
                        }
                    }
                };
                let returned = payout + insurance_payout;
                self.players[seat].wallet += returned;
                self.ledgers[seat].returned += returned;
                results.push(HandResult {
                    seat,
                    hand,
                    outcome,
                    payout,
                    insurance_payout,
                });
            }
            self.ledgers[seat].wallet_after = self.players[seat].wallet;
        }
        info!(
            "round settled: dealer {} ({}){}",
            self.dealer_hand,
            dealer_value,
            if dealer_busted { ", bust" } else { "" }
        );
        RoundSummary {
            results,
            ledgers: self.ledgers.clone(),
            dealer_hand: self.dealer_hand.clone(),
            dealer_value,
            dealer_blackjack,
            dealer_busted,
        }
    }

    fn draw_seen(&mut self) -> Card {
        let card = self.shoe.draw();
        self.count.observe(card);
        card
    }
}
