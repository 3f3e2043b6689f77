//! Terminal front end: prompting, rendering and the between-rounds options
//! menu. All game logic lives in `blackjack_core`; this layer only turns
//! engine callbacks into prompts and engine summaries into text.

use blackjack_core::prelude::*;
use std::collections::HashSet;
use std::io::{self, Write};

/// Reads one trimmed line from stdin after printing the prompt.
fn prompt(message: &str) -> String {
    print!("{} ", message);
    io::stdout().flush().ok();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}

fn parse_action(input: &str) -> Option<Action> {
    match input.to_lowercase().as_str() {
        "h" | "hit" => Some(Action::Hit),
        "s" | "stand" => Some(Action::Stand),
        "d" | "double" => Some(Action::Double),
        "p" | "split" => Some(Action::Split),
        _ => None,
    }
}

fn action_key(action: Action) -> &'static str {
    match action {
        Action::Hit => "[h]it",
        Action::Stand => "[s]tand",
        Action::Double => "[d]ouble",
        Action::Split => "s[p]lit",
    }
}

fn chart_cell(action: Option<Action>) -> char {
    match action {
        Some(Action::Hit) => 'H',
        Some(Action::Stand) => 'S',
        Some(Action::Double) => 'D',
        Some(Action::Split) => 'P',
        None => ' ',
    }
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Blackjack => "blackjack",
        Outcome::Win => "win",
        Outcome::Push => "push",
        Outcome::Loss => "loss",
    }
}

/// The human seat: prompts on every engine callback and re-prompts until
/// the input is legal, so the engine never sees a bad value.
pub struct ConsoleSeat {
    show_count: bool,
    show_advice: bool,
    show_chart: bool,
}

impl ConsoleSeat {
    fn new() -> ConsoleSeat {
        ConsoleSeat {
            show_count: false,
            show_advice: false,
            show_chart: false,
        }
    }

    fn print_count(&self, table: &BlackjackTable) {
        if self.show_count {
            println!(
                "  count: {} running, {:.1} true ({} cards left)",
                table.running_count(),
                table.true_count(),
                table.cards_remaining()
            );
        }
    }

    fn render_turn(&self, table: &BlackjackTable, state: &TurnState) {
        println!();
        if let Some(up) = table.dealer_up_card() {
            println!("Dealer shows {}", up);
        }
        println!(
            "Your hand: {} ({}{})",
            state.hand,
            state.hand.value(),
            if state.hand.is_soft() { ", soft" } else { "" }
        );
        println!("  bet {} | wallet {:.0}", state.hand.bet, state.wallet);
        self.print_count(table);
    }
}

impl Decider for ConsoleSeat {
    fn choose_bet(&mut self, table: &BlackjackTable, seat: usize) -> u32 {
        let wallet = table.players()[seat].wallet;
        let min = table.config().min_bet;
        let max = wallet as u32;
        if self.show_chart {
            print_chart();
        }
        println!();
        println!("Wallet: {:.0}", wallet);
        self.print_count(table);
        if self.show_count {
            println!("  suggested bet: {}", count_bet(min, table.true_count(), wallet));
        }
        loop {
            let input = prompt(&format!("Bet amount [{}-{}]:", min, max));
            match input.parse::<u32>() {
                Ok(bet) if (min..=max).contains(&bet) => return bet,
                _ => println!("Enter a whole number between {} and {}.", min, max),
            }
        }
    }

    fn take_insurance(&mut self, table: &BlackjackTable, state: &TurnState) -> bool {
        let stake = state.hand.bet as f32 / 2.0;
        self.print_count(table);
        loop {
            match prompt(&format!("Dealer shows an ace. Insurance for {:.1}? [y/n]", stake)).as_str() {
                "y" | "Y" => return true,
                "n" | "N" => return false,
                _ => println!("Enter y or n."),
            }
        }
    }

    fn choose_action(
        &mut self,
        table: &BlackjackTable,
        state: &TurnState,
        legal: &HashSet<Action>,
    ) -> Action {
        self.render_turn(table, state);
        if self.show_advice {
            let advice = BASIC_STRATEGY.recommend_filtered(&state.hand, state.dealer_up, legal);
            println!("  advisor: {}", advice);
        }
        let mut keys: Vec<&str> = legal.iter().map(|&a| action_key(a)).collect();
        keys.sort();
        loop {
            let input = prompt(&format!("Action ({}):", keys.join(" ")));
            match parse_action(&input) {
                Some(action) if legal.contains(&action) => return action,
                Some(_) => println!("That play is not available for this hand."),
                None => println!("Unrecognized action."),
            }
        }
    }

    fn notify(&mut self, table: &BlackjackTable, event: &TableEvent) {
        match *event {
            TableEvent::Reshuffled => println!("The shoe is reshuffled; the count starts over."),
            TableEvent::BetPlaced { seat, bet } if seat != 0 => {
                println!("{} bets {}.", table.players()[seat].name, bet)
            }
            TableEvent::CardDealt { seat, card } if seat == 0 => {
                println!("You are dealt {}.", card)
            }
            TableEvent::DealerShows { card } => println!("Dealer shows {}.", card),
            TableEvent::InsurancePlaced { seat, amount } if seat != 0 => {
                println!("{} takes insurance for {:.1}.", table.players()[seat].name, amount)
            }
            TableEvent::DealerBlackjack => println!("Dealer has blackjack!"),
            TableEvent::ActionTaken { seat, action, .. } if seat != 0 => {
                println!("{} plays {}.", table.players()[seat].name, action)
            }
            TableEvent::HoleRevealed { card } => println!("Dealer reveals {}.", card),
            TableEvent::DealerDraws { card } => println!("Dealer draws {}.", card),
            TableEvent::DealerStands { value } => println!("Dealer stands on {}.", value),
            TableEvent::DealerBusts { value } => println!("Dealer busts with {}!", value),
            _ => {}
        }
    }
}

/// The session loop: rounds until the human quits or goes broke, with an
/// options menu in between.
pub struct Session {
    table: BlackjackTable,
    seat: ConsoleSeat,
}

impl Session {
    pub fn new(table: BlackjackTable) -> Session {
        Session {
            table,
            seat: ConsoleSeat::new(),
        }
    }

    pub fn run(&mut self) -> Result<(), GameError> {
        println!(
            "Welcome to the table: {} decks, minimum bet {}.",
            self.table.config().num_decks,
            self.table.config().min_bet
        );
        loop {
            match self.table.play_round(&mut self.seat)? {
                RoundOutcome::Completed(summary) => self.print_summary(&summary),
                RoundOutcome::HumanOut => {
                    println!("You can no longer cover the minimum bet. Thanks for playing.");
                    break;
                }
            }
            if !self.between_rounds() {
                break;
            }
        }
        Ok(())
    }

    /// Returns whether the human wants another round.
    fn between_rounds(&mut self) -> bool {
        loop {
            match prompt("\n[d]eal again, [o]ptions, [q]uit:").as_str() {
                "d" | "D" | "" => return true,
                "o" | "O" => self.options_menu(),
                "q" | "Q" => return false,
                _ => println!("Unrecognized choice."),
            }
        }
    }

    fn options_menu(&mut self) {
        loop {
            println!();
            println!("Options:");
            println!("  1. show count           [{}]", on_off(self.seat.show_count));
            println!("  2. show advisor         [{}]", on_off(self.seat.show_advice));
            println!("  3. show strategy chart  [{}]", on_off(self.seat.show_chart));
            println!("  4. back");
            match prompt("Choice:").as_str() {
                "1" => self.seat.show_count = !self.seat.show_count,
                "2" => self.seat.show_advice = !self.seat.show_advice,
                "3" => self.seat.show_chart = !self.seat.show_chart,
                "4" | "" => return,
                _ => println!("Unrecognized choice."),
            }
        }
    }

    fn print_summary(&self, summary: &RoundSummary) {
        println!();
        println!(
            "Dealer: {} ({}{})",
            summary.dealer_hand,
            summary.dealer_value,
            if summary.dealer_busted { ", bust" } else { "" }
        );
        for result in &summary.results {
            let name = &self.table.players()[result.seat].name;
            print!(
                "{}: {} ({}) {} for {:.1}",
                name,
                result.hand,
                result.hand.value(),
                outcome_label(result.outcome),
                result.payout
            );
            if result.hand.insurance > 0.0 {
                print!(" (insurance returned {:.1})", result.insurance_payout);
            }
            println!();
        }
        for ledger in &summary.ledgers {
            println!("{}: wallet {:.1}", ledger.name, ledger.wallet_after);
        }
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Prints the fixed basic-strategy chart, one row per player holding and
/// one column per dealer up-card.
fn print_chart() {
    let header = || {
        print!("      ");
        for dealer in 2..=11u8 {
            if dealer == 11 {
                print!("  A");
            } else {
                print!(" {:>2}", dealer);
            }
        }
        println!();
    };

    println!("\nHard totals");
    header();
    for total in (5..=20u8).rev() {
        print!("  {:>2} |", total);
        for dealer in 2..=11u8 {
            print!("  {}", chart_cell(BASIC_STRATEGY.hard_entry(total, dealer)));
        }
        println!();
    }

    println!("\nSoft totals");
    header();
    for total in (13..=20u8).rev() {
        print!(" A,{:>1} |", total - 11);
        for dealer in 2..=11u8 {
            print!("  {}", chart_cell(BASIC_STRATEGY.soft_entry(total, dealer)));
        }
        println!();
    }

    println!("\nPairs");
    header();
    for pair in (2..=11u8).rev() {
        if pair == 11 {
            print!(" A,A |");
        } else {
            print!(" {:>2}s |", pair);
        }
        for dealer in 2..=11u8 {
            print!("  {}", chart_cell(BASIC_STRATEGY.pair_entry(pair, dealer)));
        }
        println!();
    }
    println!();
}
