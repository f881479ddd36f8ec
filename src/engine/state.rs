use serde::{Deserialize, Serialize};

use super::types::{ActionKind, Chips, HandStatus, SeatId, Street};
use crate::curve::BaseField;
use crate::shuffling::commitment::game_state_commitment;

pub const MAX_SEATS: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandConfig {
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub dealer: SeatId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatState {
    pub seat: SeatId,
    /// Chips behind, not yet wagered.
    pub stack: Chips,
    /// Wagered on the current street.
    pub street_bet: Chips,
    /// Wagered across the whole hand, current street included.
    pub total_bet: Chips,
    pub folded: bool,
    pub all_in: bool,
    /// Has voluntarily acted on the current street. Blind posts do not
    /// count, which is what gives the big blind its preflop option.
    pub acted: bool,
}

impl SeatState {
    pub fn new(seat: SeatId, stack: Chips) -> Self {
        Self {
            seat,
            stack,
            street_bet: 0,
            total_bet: 0,
            folded: false,
            all_in: false,
            acted: false,
        }
    }

    /// Can still be asked to act this street.
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }

    /// Still contesting the pot.
    pub fn in_hand(&self) -> bool {
        !self.folded
    }
}

/// The betting state of one hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingState {
    pub street: Street,
    pub status: HandStatus,
    pub dealer: SeatId,
    pub to_act: SeatId,

    /// Highest street bet any seat currently holds.
    pub bet_to_match: Chips,
    /// Size of the last full raise; the minimum increment for the next one.
    pub min_raise: Chips,
    pub last_action: ActionKind,
    pub last_bet_size: Chips,

    pub pot: Chips,
    pub small_blind: Chips,
    pub big_blind: Chips,

    pub seats: Vec<SeatState>,
}

impl BettingState {
    /// Starts a hand: seats the players, posts blinds, and hands the action
    /// to the first preflop actor.
    ///
    /// Heads-up the dealer posts the small blind and acts first preflop;
    /// with more players the blinds sit clockwise from the dealer and the
    /// seat after the big blind opens.
    pub fn new_hand(cfg: HandConfig, seats: Vec<SeatState>) -> Self {
        debug_assert!(seats.len() >= 2 && seats.len() <= MAX_SEATS);
        let mut state = Self {
            street: Street::Preflop,
            status: HandStatus::Active,
            dealer: cfg.dealer,
            to_act: cfg.dealer,
            bet_to_match: 0,
            min_raise: cfg.big_blind,
            last_action: ActionKind::Null,
            last_bet_size: 0,
            pot: 0,
            small_blind: cfg.small_blind,
            big_blind: cfg.big_blind,
            seats,
        };

        let (sb_seat, bb_seat) = state.blind_seats();
        state.post_blind(sb_seat, cfg.small_blind);
        state.post_blind(bb_seat, cfg.big_blind);

        // Blinds open the street as a forced bet.
        state.bet_to_match = state
            .seats
            .iter()
            .map(|s| s.street_bet)
            .max()
            .unwrap_or(0);
        state.last_action = ActionKind::Bet;
        state.last_bet_size = cfg.big_blind;
        state.min_raise = cfg.big_blind;
        state.to_act = state
            .next_actor_after(bb_seat)
            .unwrap_or(bb_seat);
        state
    }

    pub fn blind_seats(&self) -> (SeatId, SeatId) {
        if self.seats.len() == 2 {
            let other = self
                .next_seat_in_hand(self.dealer)
                .expect("two seats present");
            (self.dealer, other)
        } else {
            let sb = self.next_seat_in_hand(self.dealer).expect("seats present");
            let bb = self.next_seat_in_hand(sb).expect("seats present");
            (sb, bb)
        }
    }

    fn post_blind(&mut self, seat: SeatId, blind: Chips) {
        let idx = self.seat_index(seat).expect("blind seat exists");
        let posted = blind.min(self.seats[idx].stack);
        self.seats[idx].stack -= posted;
        self.seats[idx].street_bet += posted;
        self.seats[idx].total_bet += posted;
        if self.seats[idx].stack == 0 {
            self.seats[idx].all_in = true;
        }
        self.pot += posted;
    }

    pub fn seat_index(&self, seat: SeatId) -> Option<usize> {
        self.seats.iter().position(|s| s.seat == seat)
    }

    pub fn seat(&self, seat: SeatId) -> Option<&SeatState> {
        self.seats.iter().find(|s| s.seat == seat)
    }

    pub fn seat_mut(&mut self, seat: SeatId) -> Option<&mut SeatState> {
        self.seats.iter_mut().find(|s| s.seat == seat)
    }

    /// Next seat clockwise that is still contesting the pot.
    pub fn next_seat_in_hand(&self, from: SeatId) -> Option<SeatId> {
        self.next_matching(from, |s| s.in_hand())
    }

    /// Next seat clockwise that can still act this street.
    pub fn next_actor_after(&self, from: SeatId) -> Option<SeatId> {
        self.next_matching(from, |s| s.can_act())
    }

    fn next_matching(&self, from: SeatId, pred: impl Fn(&SeatState) -> bool) -> Option<SeatId> {
        for offset in 1..=MAX_SEATS as u8 {
            let candidate = (from + offset) % MAX_SEATS as u8;
            if let Some(seat) = self.seat(candidate) {
                if pred(seat) {
                    return Some(candidate);
                }
            }
        }
        None
    }

    pub fn seats_in_hand(&self) -> Vec<SeatId> {
        self.seats
            .iter()
            .filter(|s| s.in_hand())
            .map(|s| s.seat)
            .collect()
    }

    pub fn actors_remaining(&self) -> Vec<SeatId> {
        self.seats
            .iter()
            .filter(|s| s.can_act())
            .map(|s| s.seat)
            .collect()
    }

    /// A street is settled when every seat that can act has acted and holds
    /// the matched street bet.
    pub fn street_settled(&self) -> bool {
        self.seats
            .iter()
            .filter(|s| s.can_act())
            .all(|s| s.acted && s.street_bet == self.bet_to_match)
    }

    /// No further betting this hand: at most one seat can still act and it
    /// has nothing left to respond to.
    pub fn betting_locked(&self) -> bool {
        let actors = self.actors_remaining();
        match actors.len() {
            0 => true,
            1 => {
                let seat = self.seat(actors[0]).expect("actor exists");
                seat.street_bet >= self.bet_to_match
            }
            _ => false,
        }
    }

    /// Opens the next street: street bets fold into the running totals, the
    /// action state resets, and the first seat clockwise from the dealer
    /// that can act receives the turn.
    pub fn advance_street(&mut self) -> Option<Street> {
        let next = self.street.next()?;
        self.street = next;
        for seat in &mut self.seats {
            seat.street_bet = 0;
            if seat.can_act() {
                seat.acted = false;
            }
        }
        self.bet_to_match = 0;
        self.min_raise = self.big_blind;
        self.last_action = ActionKind::Null;
        self.last_bet_size = 0;
        if let Some(first) = self.next_actor_after(self.dealer) {
            self.to_act = first;
        }
        Some(next)
    }

    /// The canonical commitment tuple: seat-ordered stacks, pot, street,
    /// current player (1-based), last action, last bet size, seat-ordered
    /// street bets, status, dealer.
    pub fn state_tuple(&self) -> Vec<u64> {
        let mut tuple = Vec::with_capacity(2 * self.seats.len() + 7);
        for seat in &self.seats {
            tuple.push(seat.stack);
        }
        tuple.push(self.pot);
        tuple.push(self.street.as_u8() as u64);
        let current = self
            .seat_index(self.to_act)
            .map(|i| i as u64 + 1)
            .unwrap_or(0);
        tuple.push(current);
        tuple.push(self.last_action.as_u8() as u64);
        tuple.push(self.last_bet_size);
        for seat in &self.seats {
            tuple.push(seat.street_bet);
        }
        tuple.push(self.status.as_u8() as u64);
        tuple.push(self.dealer as u64);
        tuple
    }

    pub fn commitment(&self) -> BaseField {
        game_state_commitment(&self.state_tuple())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heads_up(dealer: SeatId) -> BettingState {
        BettingState::new_hand(
            HandConfig {
                small_blind: 1,
                big_blind: 2,
                dealer,
            },
            vec![SeatState::new(0, 100), SeatState::new(1, 100)],
        )
    }

    #[test]
    fn heads_up_blinds_and_first_actor() {
        let state = heads_up(0);
        // Dealer posts the small blind and opens preflop.
        assert_eq!(state.seat(0).unwrap().street_bet, 1);
        assert_eq!(state.seat(1).unwrap().street_bet, 2);
        assert_eq!(state.pot, 3);
        assert_eq!(state.to_act, 0);
        assert_eq!(state.bet_to_match, 2);
        assert_eq!(state.last_action, ActionKind::Bet);
    }

    #[test]
    fn three_handed_blinds_sit_clockwise_from_dealer() {
        let state = BettingState::new_hand(
            HandConfig {
                small_blind: 1,
                big_blind: 2,
                dealer: 0,
            },
            vec![
                SeatState::new(0, 50),
                SeatState::new(1, 50),
                SeatState::new(2, 50),
            ],
        );
        assert_eq!(state.seat(1).unwrap().street_bet, 1);
        assert_eq!(state.seat(2).unwrap().street_bet, 2);
        // First to act preflop is the seat after the big blind: the dealer.
        assert_eq!(state.to_act, 0);
    }

    #[test]
    fn short_stack_blind_posts_all_in() {
        let state = BettingState::new_hand(
            HandConfig {
                small_blind: 5,
                big_blind: 10,
                dealer: 0,
            },
            vec![SeatState::new(0, 100), SeatState::new(1, 4)],
        );
        let bb = state.seat(1).unwrap();
        assert_eq!(bb.street_bet, 4);
        assert!(bb.all_in);
        assert_eq!(state.pot, 9);
    }

    #[test]
    fn state_tuple_layout_is_seat_ordered() {
        let state = heads_up(1);
        let tuple = state.state_tuple();
        // stacks, pot, street, currentPlayer, lastAction, lastBetSize,
        // street bets, status, dealer
        assert_eq!(tuple.len(), 11);
        assert_eq!(tuple[0], state.seat(0).unwrap().stack);
        assert_eq!(tuple[1], state.seat(1).unwrap().stack);
        assert_eq!(tuple[2], state.pot);
        assert_eq!(tuple[3], 0); // preflop
        assert_eq!(tuple[10], 1); // dealer
        assert_eq!(state.commitment(), state.commitment());
    }

    #[test]
    fn street_advance_resets_action_state() {
        let mut state = heads_up(0);
        for seat in &mut state.seats {
            seat.acted = true;
            seat.street_bet = 2;
        }
        state.bet_to_match = 2;
        assert!(state.street_settled());

        let next = state.advance_street().unwrap();
        assert_eq!(next, Street::Flop);
        assert_eq!(state.bet_to_match, 0);
        assert_eq!(state.last_action, ActionKind::Null);
        assert_eq!(state.min_raise, state.big_blind);
        assert!(state.seats.iter().all(|s| s.street_bet == 0 && !s.acted));
        // Heads-up postflop the non-dealer acts first.
        assert_eq!(state.to_act, 1);
    }
}
