//! The room state machine.
//!
//! A room is driven exclusively through [`Room::handle`]; the registry owns
//! one task per room that feeds it events from a single channel. Proof
//! verification runs on the bounded worker pool and re-enters through the
//! same channel, so all state mutation is serialized per room.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use tokio::sync::{mpsc, Semaphore};
use tracing::{info, warn};

use super::dealing::{community_indices, hole_indices};
use super::events::{MessageSink, RoomEvent, VerifyJob};
use super::settle::{settle_fold_win, settle_showdown, Settlement};
use super::unmask::{UnmaskTarget, UnmaskTracker};
use super::{PlayerId, RoomId};
use crate::crypto_serde::field_from_decimal;
use crate::curve::{card_index_of_point, point_coordinates, BaseField, Curve};
use crate::engine::{
    apply_action, legal_actions_for, BettingState, Chips, HandConfig, PlayerAction, SeatId,
    SeatState, Street, Transition,
};
use crate::player::hand_eval::board_commitment;
use crate::protocol::{
    CardDto, ClientMessage, ErrorCode, FinalStackDto, GameStateDto, PlayerInfo, PotShareDto,
    RoomConfigDto, ServerMessage, ShowdownPlayerDto, COMMUNITY_TARGET,
};
use crate::showdown::{evaluate_five, RankArtifacts};
use crate::shuffling::{card_commitment, deck_commitment, initial_deck, Deck, MaskedCard};
use crate::verifier::{CircuitType, ProofVerifier, VerifyError};

const LOG_TARGET: &str = "game::room";

/// CPU-bound verifications across all rooms share this bounded pool.
const VERIFY_WORKERS: usize = 2;
static VERIFY_POOL: Lazy<Arc<Semaphore>> =
    Lazy::new(|| Arc::new(Semaphore::new(VERIFY_WORKERS)));

/// Repeated cryptographic failures within one hand forfeit the offender.
const MAX_PROOF_FAILURES: u32 = 3;

#[derive(Clone, Debug)]
pub struct RoomConfig {
    pub min_players: u8,
    pub max_players: u8,
    pub small_blind: Chips,
    pub big_blind: Chips,
    pub starting_stack: Chips,
    pub turn_timeout: Duration,
    pub phase_timeout: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 10,
            small_blind: 1,
            big_blind: 2,
            starting_stack: 100,
            turn_timeout: Duration::from_secs(60),
            phase_timeout: Duration::from_secs(30),
        }
    }
}

impl RoomConfig {
    fn dto(&self) -> RoomConfigDto {
        RoomConfigDto {
            min_players: self.min_players,
            max_players: self.max_players,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            starting_stack: self.starting_stack,
            turn_timeout_ms: self.turn_timeout.as_millis() as u64,
            phase_timeout_ms: self.phase_timeout.as_millis() as u64,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlayerSeat {
    pub id: PlayerId,
    pub name: String,
    pub public_key: Curve,
    pub seat: SeatId,
    pub ready: bool,
    pub stack: Chips,
}

impl PlayerSeat {
    fn info(&self) -> PlayerInfo {
        let (x, y) = point_coordinates(&self.public_key);
        PlayerInfo {
            player_id: self.id.to_string(),
            player_name: self.name.clone(),
            seat_index: self.seat,
            is_ready: self.ready,
            public_key_x: x.to_string(),
            public_key_y: y.to_string(),
        }
    }
}

#[derive(Debug)]
enum Phase {
    Waiting,
    Shuffling {
        turn: usize,
    },
    UnmaskingHole,
    Betting,
    UnmaskingCommunity {
        street: Street,
        /// Deck indices still to reveal this street, active card first.
        pending: VecDeque<u8>,
    },
    Showdown,
}

#[derive(Clone, Debug)]
struct HandReveal {
    rank: u16,
    description: String,
    cards: [u8; 5],
}

struct HandState {
    betting: BettingState,
    deck: Deck,
    deck_commitment: BaseField,
    /// Players yet to shuffle, in turn order.
    shuffle_order: Vec<PlayerId>,
    /// Players whose key layer is on the deck; exactly these can and must
    /// unmask.
    mask_holders: Vec<PlayerId>,
    hole_of: BTreeMap<SeatId, [u8; 2]>,
    community: [u8; 5],
    /// Deck index → revealed card value.
    community_values: BTreeMap<u8, u8>,
    trackers: BTreeMap<u8, UnmaskTracker>,
    reveals: BTreeMap<SeatId, HandReveal>,
    stacks_at_start: BTreeMap<SeatId, Chips>,
    proof_failures: BTreeMap<PlayerId, u32>,
}

pub struct Room {
    pub id: RoomId,
    config: RoomConfig,
    players: Vec<PlayerSeat>,
    dealer: SeatId,
    phase: Phase,
    hand: Option<HandState>,
    timer_generation: u64,
    pending_verify: BTreeSet<PlayerId>,
    sink: Arc<dyn MessageSink>,
    verifier: Arc<dyn ProofVerifier>,
    artifacts: Arc<RankArtifacts>,
    events_tx: mpsc::UnboundedSender<RoomEvent>,
}

impl Room {
    pub fn new(
        id: RoomId,
        config: RoomConfig,
        sink: Arc<dyn MessageSink>,
        verifier: Arc<dyn ProofVerifier>,
        artifacts: Arc<RankArtifacts>,
        events_tx: mpsc::UnboundedSender<RoomEvent>,
    ) -> Self {
        Self {
            id,
            config,
            players: Vec::new(),
            dealer: 0,
            phase: Phase::Waiting,
            hand: None,
            timer_generation: 0,
            pending_verify: BTreeSet::new(),
            sink,
            verifier,
            artifacts,
            events_tx,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Single entry point; the room task calls this for every event.
    pub fn handle(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Join {
                player_id,
                player_name,
                public_key,
            } => self.handle_join(player_id, player_name, public_key),
            RoomEvent::Client { player_id, message } => self.handle_client(player_id, message),
            RoomEvent::Disconnected { player_id } => self.handle_departure(player_id),
            RoomEvent::TimerFired { generation } => self.handle_timer(generation),
            RoomEvent::VerifyCompleted {
                player_id,
                circuit,
                job,
                result,
            } => self.handle_verified(player_id, circuit, job, result),
        }
    }

    // ------------------------------------------------------------------
    // Lobby
    // ------------------------------------------------------------------

    fn handle_join(&mut self, player_id: PlayerId, player_name: String, public_key: Curve) {
        if self.players.len() >= self.config.max_players as usize {
            self.reply(player_id, ErrorCode::RoomFull, "room is full");
            return;
        }
        let seat = self.lowest_free_seat();
        let player = PlayerSeat {
            id: player_id,
            name: player_name,
            public_key,
            seat,
            ready: false,
            stack: self.config.starting_stack,
        };
        let info = player.info();
        self.players.push(player);
        self.players.sort_by_key(|p| p.seat);

        info!(target = LOG_TARGET, room = %self.id, player = %player_id, seat, "player joined");
        self.sink.send(
            player_id,
            ServerMessage::RoomJoined {
                room_id: self.id.to_string(),
                player_id: player_id.to_string(),
                seat_index: seat,
                players: self.players.iter().map(|p| p.info()).collect(),
                config: self.config.dto(),
            },
        );
        self.sink.broadcast_except(
            &self.player_ids(),
            player_id,
            ServerMessage::PlayerJoined { player: info },
        );
    }

    fn handle_client(&mut self, player_id: PlayerId, message: ClientMessage) {
        if self.seat_of(player_id).is_none() {
            self.reply(player_id, ErrorCode::NotInRoom, "not seated in this room");
            return;
        }
        match message {
            ClientMessage::JoinRoom { .. } => {
                self.reply(player_id, ErrorCode::InvalidMessage, "already in a room");
            }
            ClientMessage::LeaveRoom => self.handle_departure(player_id),
            ClientMessage::Ready { is_ready } => self.handle_ready(player_id, is_ready),
            ClientMessage::SubmitShuffle {
                shuffled_deck,
                deck_commitment,
                proof,
                public_signals,
            } => self.handle_submit_shuffle(
                player_id,
                shuffled_deck,
                deck_commitment,
                proof,
                public_signals,
            ),
            ClientMessage::SubmitUnmask {
                card_index,
                unmasked_card,
                proof,
                public_signals,
            } => self.handle_submit_unmask(
                player_id,
                card_index,
                unmasked_card,
                proof,
                public_signals,
            ),
            ClientMessage::SubmitAction {
                action_type,
                amount,
                state_commitment,
                proof,
                public_signals,
            } => self.handle_submit_action(
                player_id,
                action_type,
                amount,
                state_commitment,
                proof,
                public_signals,
            ),
            ClientMessage::SubmitHandReveal {
                hand_rank,
                hand_description,
                card_indices,
                proof,
                public_signals,
            } => self.handle_submit_reveal(
                player_id,
                hand_rank,
                hand_description,
                card_indices,
                proof,
                public_signals,
            ),
        }
    }

    fn handle_ready(&mut self, player_id: PlayerId, is_ready: bool) {
        if !matches!(self.phase, Phase::Waiting) {
            self.reply(player_id, ErrorCode::InvalidState, "hand in progress");
            return;
        }
        if let Some(player) = self.players.iter_mut().find(|p| p.id == player_id) {
            player.ready = is_ready;
        }
        self.sink.broadcast(
            &self.player_ids(),
            ServerMessage::PlayerReady {
                player_id: player_id.to_string(),
                is_ready,
            },
        );
        self.maybe_start_hand();
    }

    fn maybe_start_hand(&mut self) {
        let eligible: Vec<&PlayerSeat> =
            self.players.iter().filter(|p| p.stack > 0).collect();
        if eligible.len() < self.config.min_players as usize {
            return;
        }
        if !eligible.iter().all(|p| p.ready) {
            return;
        }
        self.start_hand();
    }

    // ------------------------------------------------------------------
    // Hand setup and shuffle
    // ------------------------------------------------------------------

    fn start_hand(&mut self) {
        let participants: Vec<PlayerSeat> = self
            .players
            .iter()
            .filter(|p| p.stack > 0)
            .cloned()
            .collect();
        if !participants.iter().any(|p| p.seat == self.dealer) {
            // Rotation landed on an eliminated or vacated seat.
            self.dealer = participants[0].seat;
        }

        let seats: Vec<SeatState> = participants
            .iter()
            .map(|p| SeatState::new(p.seat, p.stack))
            .collect();
        let stacks_at_start = participants.iter().map(|p| (p.seat, p.stack)).collect();
        let betting = BettingState::new_hand(
            HandConfig {
                small_blind: self.config.small_blind,
                big_blind: self.config.big_blind,
                dealer: self.dealer,
            },
            seats,
        );

        // Shuffle turn order: clockwise, starting left of the dealer.
        let mut order: Vec<PlayerId> = Vec::with_capacity(participants.len());
        let mut seat = self.dealer;
        for _ in 0..participants.len() {
            seat = betting
                .next_seat_in_hand(seat)
                .expect("participants present");
            if let Some(p) = participants.iter().find(|p| p.seat == seat) {
                order.push(p.id);
            }
        }

        let deck = initial_deck();
        let commitment = deck_commitment(&deck);
        let n = participants.len();
        self.hand = Some(HandState {
            betting,
            deck,
            deck_commitment: commitment,
            shuffle_order: order,
            mask_holders: Vec::new(),
            hole_of: BTreeMap::new(),
            community: community_indices(n),
            community_values: BTreeMap::new(),
            trackers: BTreeMap::new(),
            reveals: BTreeMap::new(),
            stacks_at_start,
            proof_failures: BTreeMap::new(),
        });
        self.phase = Phase::Shuffling { turn: 0 };

        let state_dto = GameStateDto::from_state(&self.hand.as_ref().expect("hand active").betting);
        info!(target = LOG_TARGET, room = %self.id, players = n, dealer = self.dealer, "hand started");
        self.sink.broadcast(
            &self.player_ids(),
            ServerMessage::GameStarted {
                game_state: state_dto,
            },
        );
        self.send_shuffle_turn();
    }

    fn send_shuffle_turn(&mut self) {
        let Phase::Shuffling { turn } = &self.phase else {
            return;
        };
        let turn = *turn;
        let hand = self.hand.as_ref().expect("hand active");
        let shuffler = hand.shuffle_order[turn];
        let seat = self.seat_of(shuffler).unwrap_or_default();
        let deck_dto: Vec<CardDto> = hand.deck.iter().map(CardDto::from_card).collect();
        self.sink.send(
            shuffler,
            ServerMessage::ShuffleTurn {
                player_id: shuffler.to_string(),
                seat_index: seat,
                current_deck: deck_dto,
            },
        );
        self.arm_timer(self.config.phase_timeout);
    }

    fn handle_submit_shuffle(
        &mut self,
        player_id: PlayerId,
        shuffled_deck: Vec<CardDto>,
        declared_commitment: String,
        proof: String,
        public_signals: Vec<String>,
    ) {
        let Phase::Shuffling { turn } = &self.phase else {
            self.reply(player_id, ErrorCode::InvalidState, "not in the shuffle phase");
            return;
        };
        let turn = *turn;
        let Some(hand) = self.hand.as_ref() else {
            self.reply(player_id, ErrorCode::InvalidState, "no active hand");
            return;
        };
        if hand.shuffle_order.get(turn) != Some(&player_id) {
            self.reply(player_id, ErrorCode::NotYourTurn, "not your shuffle turn");
            return;
        }
        if self.pending_verify.contains(&player_id) {
            self.reply(player_id, ErrorCode::Busy, "verification already pending");
            return;
        }

        let mut deck: Deck = Vec::with_capacity(shuffled_deck.len());
        for dto in &shuffled_deck {
            match dto.to_card() {
                Ok(card) => deck.push(card),
                Err(_) => {
                    self.reply(player_id, ErrorCode::InvalidCard, "malformed card in deck");
                    return;
                }
            }
        }
        if deck.len() != 52 {
            self.reply(player_id, ErrorCode::InvalidCard, "deck must hold 52 cards");
            return;
        }

        let Some(signals) = self.parse_signals(player_id, &public_signals, 4) else {
            return;
        };
        let Ok(declared) = field_from_decimal(&declared_commitment) else {
            self.reply(player_id, ErrorCode::InvalidMessage, "malformed deck commitment");
            return;
        };

        let recomputed = deck_commitment(&deck);
        let expected_pub = self.public_key_coords(player_id);
        if signals[0] != hand.deck_commitment
            || signals[1] != declared
            || signals[1] != recomputed
            || (signals[2], signals[3]) != expected_pub
        {
            self.reply(
                player_id,
                ErrorCode::CommitmentMismatch,
                "public signals do not match the canonical deck state",
            );
            return;
        }

        let circuit = if turn == 0 {
            CircuitType::Shuffle
        } else {
            CircuitType::Reshuffle
        };
        self.spawn_verify(
            player_id,
            circuit,
            proof,
            signals,
            VerifyJob::Shuffle {
                deck,
                commitment: recomputed,
            },
        );
    }

    fn apply_shuffle(&mut self, player_id: PlayerId, deck: Deck, commitment: BaseField) {
        let Phase::Shuffling { turn } = &self.phase else {
            return;
        };
        let turn = *turn;
        {
            let hand = self.hand.as_mut().expect("hand active");
            if hand.shuffle_order.get(turn) != Some(&player_id) {
                return;
            }
            hand.deck = deck;
            hand.deck_commitment = commitment;
            hand.mask_holders.push(player_id);
        }
        self.sink.broadcast(
            &self.player_ids(),
            ServerMessage::ShuffleComplete {
                player_id: player_id.to_string(),
                deck_commitment: commitment.to_string(),
            },
        );

        let next = turn + 1;
        if next < self.hand.as_ref().expect("hand active").shuffle_order.len() {
            self.phase = Phase::Shuffling { turn: next };
            self.send_shuffle_turn();
        } else {
            self.deal();
        }
    }

    // ------------------------------------------------------------------
    // Dealing and hole-card unmasking
    // ------------------------------------------------------------------

    fn deal(&mut self) {
        self.phase = Phase::UnmaskingHole;
        let player_ids = self.player_ids();
        let seat_players: BTreeMap<SeatId, PlayerId> = self
            .players
            .iter()
            .map(|p| (p.seat, p.id))
            .collect();

        let hand = self.hand.as_mut().expect("hand active");
        let in_hand: Vec<SeatId> = hand.betting.seats_in_hand();

        // Seat-order positions over the players dealt in.
        let mut requests: Vec<(PlayerId, ServerMessage)> = Vec::new();
        for (position, seat) in in_hand.iter().enumerate() {
            let owner = seat_players[seat];
            let hole = hole_indices(position);
            hand.hole_of.insert(*seat, hole);
            requests.push((
                owner,
                ServerMessage::CardsDealt {
                    your_cards: hole.to_vec(),
                },
            ));
            for index in hole {
                let card = hand.deck[index as usize];
                let tracker =
                    UnmaskTracker::for_hole_card(index, card, owner, &hand.mask_holders);
                hand.trackers.insert(index, tracker);
            }
        }

        // Fan the hole-card unmask requests out in parallel: every mask
        // holder except the owner, all at once.
        for tracker in hand.trackers.values() {
            let UnmaskTarget::Player(owner) = tracker.target else {
                continue;
            };
            let card_dto = CardDto::from_card(&tracker.card);
            for holder in &hand.mask_holders {
                if *holder == owner {
                    continue;
                }
                requests.push((
                    *holder,
                    ServerMessage::UnmaskRequest {
                        card_index: tracker.card_index,
                        for_player_id: owner.to_string(),
                        card: card_dto.clone(),
                    },
                ));
            }
        }

        info!(target = LOG_TARGET, room = %self.id, "cards dealt");
        for (player, message) in requests {
            if player_ids.contains(&player) {
                self.sink.send(player, message);
            }
        }
        self.arm_timer(self.config.phase_timeout);
        self.flush_complete_hole_trackers();
    }

    fn handle_submit_unmask(
        &mut self,
        player_id: PlayerId,
        card_index: u8,
        unmasked_card: CardDto,
        proof: String,
        public_signals: Vec<String>,
    ) {
        if !matches!(
            self.phase,
            Phase::UnmaskingHole | Phase::UnmaskingCommunity { .. }
        ) {
            self.reply(player_id, ErrorCode::InvalidState, "no unmask in progress");
            return;
        }
        let Some(hand) = self.hand.as_ref() else {
            self.reply(player_id, ErrorCode::InvalidState, "no active hand");
            return;
        };
        let Some(tracker) = hand.trackers.get(&card_index) else {
            self.reply(player_id, ErrorCode::InvalidCard, "card is not being unmasked");
            return;
        };
        if tracker.has_contributed(player_id) {
            self.reply(player_id, ErrorCode::AlreadyUnmasked, "already unmasked this card");
            return;
        }
        if !tracker.expects(player_id) {
            self.reply(player_id, ErrorCode::InvalidUnmask, "unmask not expected from you");
            return;
        }
        if self.pending_verify.contains(&player_id) {
            self.reply(player_id, ErrorCode::Busy, "verification already pending");
            return;
        }
        let Ok(card) = unmasked_card.to_card() else {
            self.reply(player_id, ErrorCode::InvalidCard, "malformed card");
            return;
        };
        let Some(signals) = self.parse_signals(player_id, &public_signals, 4) else {
            return;
        };

        let expected_pub = self.public_key_coords(player_id);
        if signals[0] != card_commitment(&tracker.card)
            || signals[1] != card_commitment(&card)
            || (signals[2], signals[3]) != expected_pub
        {
            self.reply(
                player_id,
                ErrorCode::CommitmentMismatch,
                "public signals do not match the card state",
            );
            return;
        }

        self.spawn_verify(
            player_id,
            CircuitType::Unmask,
            proof,
            signals,
            VerifyJob::Unmask { card_index, card },
        );
    }

    fn apply_unmask(&mut self, player_id: PlayerId, card_index: u8, card: MaskedCard) {
        let player_ids = self.player_ids();
        let hand = self.hand.as_mut().expect("hand active");
        let Some(tracker) = hand.trackers.get_mut(&card_index) else {
            return;
        };
        if !tracker.expects(player_id) {
            return;
        }
        tracker.record(player_id, card);
        let remaining = tracker.remaining() as u8;
        let complete = tracker.is_complete();
        let target = tracker.target.clone();
        let card_now = tracker.card;

        self.sink.broadcast(
            &player_ids,
            ServerMessage::CardPartiallyUnmasked {
                card_index,
                by_player_id: player_id.to_string(),
                remaining_unmasks: remaining,
                card: CardDto::from_card(&card_now),
            },
        );

        match target {
            UnmaskTarget::Player(owner) => {
                if complete {
                    // Only the owner's own layer remains; hand it over.
                    self.sink.send(
                        owner,
                        ServerMessage::CardFullyUnmasked {
                            card_index,
                            card: CardDto::from_card(&card_now),
                            is_community: None,
                        },
                    );
                }
                self.maybe_finish_hole_unmasking();
            }
            UnmaskTarget::Community => {
                if complete {
                    self.finish_community_card(card_index, card_now);
                } else if let Some(next) = self
                    .hand
                    .as_ref()
                    .and_then(|h| h.trackers.get(&card_index))
                    .and_then(|t| t.next_in_queue())
                {
                    self.sink.send(
                        next,
                        ServerMessage::UnmaskRequest {
                            card_index,
                            for_player_id: COMMUNITY_TARGET.to_string(),
                            card: CardDto::from_card(&card_now),
                        },
                    );
                    self.arm_timer(self.config.phase_timeout);
                }
            }
        }
    }

    /// Hole trackers with nobody left to ask complete immediately (their
    /// owner holds the only remaining layer).
    fn flush_complete_hole_trackers(&mut self) {
        let ready: Vec<(u8, PlayerId, MaskedCard)> = self
            .hand
            .as_ref()
            .map(|hand| {
                hand.trackers
                    .values()
                    .filter_map(|t| match t.target {
                        UnmaskTarget::Player(owner) if t.is_complete() => {
                            Some((t.card_index, owner, t.card))
                        }
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        for (card_index, owner, card) in ready {
            self.sink.send(
                owner,
                ServerMessage::CardFullyUnmasked {
                    card_index,
                    card: CardDto::from_card(&card),
                    is_community: None,
                },
            );
        }
        self.maybe_finish_hole_unmasking();
    }

    fn maybe_finish_hole_unmasking(&mut self) {
        if !matches!(self.phase, Phase::UnmaskingHole) {
            return;
        }
        let all_done = self
            .hand
            .as_ref()
            .map(|h| h.trackers.values().all(|t| t.is_complete()))
            .unwrap_or(false);
        if !all_done {
            return;
        }
        self.hand.as_mut().expect("hand active").trackers.clear();
        self.begin_betting();
    }

    // ------------------------------------------------------------------
    // Betting
    // ------------------------------------------------------------------

    fn begin_betting(&mut self) {
        self.phase = Phase::Betting;
        let locked = self
            .hand
            .as_ref()
            .map(|h| h.betting.betting_locked())
            .unwrap_or(false);
        if locked {
            self.advance_after_street();
        } else {
            self.prompt_turn();
        }
    }

    fn prompt_turn(&mut self) {
        let hand = self.hand.as_ref().expect("hand active");
        let seat = hand.betting.to_act;
        let legals = legal_actions_for(&hand.betting, seat);
        let Some(player) = self.player_at(seat) else {
            return;
        };
        let message = ServerMessage::PlayerTurn {
            player_id: player.to_string(),
            seat_index: seat,
            valid_actions: legals.actions.iter().map(|a| a.as_u8()).collect(),
            min_bet: legals.min_bet.unwrap_or(0),
            min_raise: legals.min_raise_to.unwrap_or(0),
            amount_to_call: legals.amount_to_call,
            timeout_ms: self.config.turn_timeout.as_millis() as u64,
        };
        self.sink.broadcast(&self.player_ids(), message);
        self.arm_timer(self.config.turn_timeout);
    }

    fn handle_submit_action(
        &mut self,
        player_id: PlayerId,
        action_type: u8,
        amount: Chips,
        state_commitment: String,
        proof: String,
        public_signals: Vec<String>,
    ) {
        if !matches!(self.phase, Phase::Betting) {
            self.reply(player_id, ErrorCode::InvalidState, "not in a betting street");
            return;
        }
        let Some(seat) = self.seat_of(player_id) else {
            self.reply(player_id, ErrorCode::NotInRoom, "not seated");
            return;
        };
        let hand = self.hand.as_ref().expect("hand active");
        if hand.betting.to_act != seat {
            self.reply(player_id, ErrorCode::NotYourTurn, "not your turn");
            return;
        }
        if self.pending_verify.contains(&player_id) {
            self.reply(player_id, ErrorCode::Busy, "verification already pending");
            return;
        }
        let Some(action) = PlayerAction::from_wire(action_type, amount) else {
            self.reply(player_id, ErrorCode::InvalidAction, "unknown action type");
            return;
        };
        if !legal_actions_for(&hand.betting, seat).allows(action.kind()) {
            self.reply(player_id, ErrorCode::InvalidAction, "action not legal now");
            return;
        }

        let Some(signals) = self.parse_signals(player_id, &public_signals, 2) else {
            return;
        };
        let Ok(declared_after) = field_from_decimal(&state_commitment) else {
            self.reply(player_id, ErrorCode::InvalidMessage, "malformed state commitment");
            return;
        };

        // Replay the action on a scratch copy to pin the after-commitment.
        let mut scratch = hand.betting.clone();
        if apply_action(&mut scratch, seat, action).is_err() {
            self.reply(player_id, ErrorCode::InvalidAction, "action not legal now");
            return;
        }
        let expected_after = scratch.commitment();
        if signals[0] != hand.betting.commitment()
            || signals[1] != expected_after
            || declared_after != expected_after
        {
            self.reply(
                player_id,
                ErrorCode::CommitmentMismatch,
                "state commitments do not match the canonical game state",
            );
            return;
        }

        self.spawn_verify(
            player_id,
            CircuitType::GameAction,
            proof,
            signals,
            VerifyJob::Action {
                action,
                declared_commitment: declared_after,
            },
        );
    }

    fn apply_betting_action(&mut self, player_id: PlayerId, action: PlayerAction) {
        if !matches!(self.phase, Phase::Betting) {
            return;
        }
        let Some(seat) = self.seat_of(player_id) else {
            return;
        };
        let hand = self.hand.as_mut().expect("hand active");
        if hand.betting.to_act != seat {
            return;
        }
        let transition = match apply_action(&mut hand.betting, seat, action) {
            Ok(transition) => transition,
            Err(err) => {
                warn!(target = LOG_TARGET, room = %self.id, %err, "verified action failed to apply");
                self.reply(player_id, ErrorCode::InvalidAction, err.to_string());
                return;
            }
        };
        self.after_transition(transition);
    }

    fn after_transition(&mut self, transition: Transition) {
        let (applied, outcome) = match transition {
            Transition::Continued { applied, .. } => (applied, None),
            Transition::StreetEnd { applied, .. } => (applied, Some(None)),
            Transition::HandEnd { applied, winner } => (applied, Some(Some(winner))),
        };

        let actor = self.player_at(applied.seat).map(|p| p.to_string());
        self.sink.broadcast(
            &self.player_ids(),
            ServerMessage::ActionResult {
                player_id: actor.unwrap_or_default(),
                action_type: applied.kind.as_u8(),
                amount: applied.amount,
                new_pot: applied.new_pot,
                player_stack: applied.new_stack,
            },
        );

        match outcome {
            None => self.prompt_turn(),
            Some(Some(winner)) => self.finish_fold_win(winner),
            Some(None) => self.advance_after_street(),
        }
    }

    fn advance_after_street(&mut self) {
        let next = {
            let hand = self.hand.as_mut().expect("hand active");
            hand.betting.advance_street()
        };
        match next {
            Some(Street::Showdown) | None => self.begin_showdown(),
            Some(street) => self.begin_community_reveal(street),
        }
    }

    // ------------------------------------------------------------------
    // Community cards
    // ------------------------------------------------------------------

    fn begin_community_reveal(&mut self, street: Street) {
        let pending: VecDeque<u8> = {
            let hand = self.hand.as_ref().expect("hand active");
            let revealed = hand.community_values.len();
            let count = street.cards_revealed();
            hand.community[revealed..revealed + count]
                .iter()
                .copied()
                .collect()
        };
        self.phase = Phase::UnmaskingCommunity { street, pending };
        self.activate_next_community_card();
    }

    fn activate_next_community_card(&mut self) {
        let card_index = match &self.phase {
            Phase::UnmaskingCommunity { pending, .. } => pending.front().copied(),
            _ => return,
        };
        let Some(card_index) = card_index else {
            self.finish_street_reveal();
            return;
        };

        let first = {
            let hand = self.hand.as_mut().expect("hand active");
            let card = hand.deck[card_index as usize];
            let tracker =
                UnmaskTracker::for_community_card(card_index, card, &hand.mask_holders);
            let first = tracker.next_in_queue();
            let dto = CardDto::from_card(&card);
            hand.trackers.insert(card_index, tracker);
            first.map(|player| (player, dto))
        };
        match first {
            Some((player, card)) => {
                self.sink.send(
                    player,
                    ServerMessage::UnmaskRequest {
                        card_index,
                        for_player_id: COMMUNITY_TARGET.to_string(),
                        card,
                    },
                );
                self.arm_timer(self.config.phase_timeout);
            }
            None => {
                // Nobody holds a layer; the card is already open.
                let card = self.hand.as_ref().expect("hand active").deck[card_index as usize];
                self.finish_community_card(card_index, card);
            }
        }
    }

    fn finish_community_card(&mut self, card_index: u8, card: MaskedCard) {
        let value = match card_index_of_point(&card.msg) {
            Ok(value) => value,
            Err(_) => {
                // A fully unmasked community card must decode; if it does
                // not, some accepted proof lied about the algebra.
                warn!(target = LOG_TARGET, room = %self.id, card_index, "community card failed to decode");
                self.abort_hand("protocol_violation");
                return;
            }
        };
        {
            let hand = self.hand.as_mut().expect("hand active");
            hand.community_values.insert(card_index, value);
            hand.trackers.remove(&card_index);
        }
        self.sink.broadcast(
            &self.player_ids(),
            ServerMessage::CardFullyUnmasked {
                card_index,
                card: CardDto::from_card(&card),
                is_community: Some(true),
            },
        );
        if let Phase::UnmaskingCommunity { pending, .. } = &mut self.phase {
            pending.pop_front();
        }
        self.activate_next_community_card();
    }

    fn finish_street_reveal(&mut self) {
        let Phase::UnmaskingCommunity { street, .. } = &self.phase else {
            return;
        };
        let street = *street;
        let hand = self.hand.as_ref().expect("hand active");
        let revealed: Vec<u8> = hand
            .community
            .iter()
            .filter(|i| hand.community_values.contains_key(i))
            .copied()
            .collect();
        self.sink.broadcast(
            &self.player_ids(),
            ServerMessage::StreetAdvanced {
                street: street.as_u8(),
                community_card_indices: revealed,
            },
        );
        self.begin_betting();
    }

    // ------------------------------------------------------------------
    // Showdown and settlement
    // ------------------------------------------------------------------

    fn begin_showdown(&mut self) {
        self.phase = Phase::Showdown;
        let hand = self.hand.as_ref().expect("hand active");
        let in_hand = hand.betting.seats_in_hand();
        let pot = hand.betting.pot;
        let contenders: Vec<PlayerId> = in_hand
            .iter()
            .filter_map(|seat| self.player_at(*seat))
            .collect();

        for player in &contenders {
            let opponents: Vec<String> = contenders
                .iter()
                .filter(|p| *p != player)
                .map(|p| p.to_string())
                .collect();
            self.sink.send(
                *player,
                ServerMessage::RevealHandRequest { pot, opponents },
            );
        }
        self.arm_timer(self.config.phase_timeout);
    }

    fn handle_submit_reveal(
        &mut self,
        player_id: PlayerId,
        hand_rank: u16,
        hand_description: String,
        card_indices: [u8; 5],
        proof: String,
        public_signals: Vec<String>,
    ) {
        if !matches!(self.phase, Phase::Showdown) {
            self.reply(player_id, ErrorCode::InvalidState, "not at showdown");
            return;
        }
        let Some(seat) = self.seat_of(player_id) else {
            self.reply(player_id, ErrorCode::NotInRoom, "not seated");
            return;
        };
        let hand = self.hand.as_ref().expect("hand active");
        if !hand.betting.seats_in_hand().contains(&seat) {
            self.reply(player_id, ErrorCode::InvalidState, "folded hands do not reveal");
            return;
        }
        if hand.reveals.contains_key(&seat) {
            self.reply(player_id, ErrorCode::InvalidState, "hand already revealed");
            return;
        }
        if self.pending_verify.contains(&player_id) {
            self.reply(player_id, ErrorCode::Busy, "verification already pending");
            return;
        }
        let Some(signals) = self.parse_signals(player_id, &public_signals, 4) else {
            return;
        };

        // The claimed five cards must be distinct, on the table or in the
        // claimed hole, and actually evaluate to the claimed rank.
        let board: Vec<u8> = hand
            .community
            .iter()
            .filter_map(|i| hand.community_values.get(i))
            .copied()
            .collect();
        let mut off_board = 0usize;
        for (i, card) in card_indices.iter().enumerate() {
            if *card >= 52 || card_indices[..i].contains(card) {
                self.reply(player_id, ErrorCode::InvalidCard, "bad card indices");
                return;
            }
            if !board.contains(card) {
                off_board += 1;
            }
        }
        if off_board > 2 {
            self.reply(player_id, ErrorCode::InvalidCard, "more than two hole cards claimed");
            return;
        }
        let evaluated = match evaluate_five(&self.artifacts.tables, card_indices) {
            Ok(hand) => hand,
            Err(_) => {
                self.reply(player_id, ErrorCode::InvalidCard, "cards do not form a hand");
                return;
            }
        };
        if evaluated.rank != hand_rank {
            self.reply(
                player_id,
                ErrorCode::CommitmentMismatch,
                "claimed rank does not match the cards",
            );
            return;
        }

        let expected_root = self.artifacts.root_for(evaluated.is_flush);
        let board_values: [u8; 5] = match board.as_slice().try_into() {
            Ok(values) => values,
            Err(_) => {
                self.reply(player_id, ErrorCode::InvalidState, "board incomplete");
                return;
            }
        };
        if signals[0] != expected_root
            || signals[2] != board_commitment(board_values)
            || signals[3] != BaseField::from(hand_rank as u64)
        {
            self.reply(
                player_id,
                ErrorCode::CommitmentMismatch,
                "public signals do not match the table state",
            );
            return;
        }
        // signals[1] is the hole-card commitment: private to the prover,
        // bound by the circuit.

        self.spawn_verify(
            player_id,
            CircuitType::HandEval,
            proof,
            signals,
            VerifyJob::HandReveal {
                hand_rank,
                description: hand_description,
                card_indices,
            },
        );
    }

    fn apply_reveal(
        &mut self,
        player_id: PlayerId,
        hand_rank: u16,
        description: String,
        cards: [u8; 5],
    ) {
        if !matches!(self.phase, Phase::Showdown) {
            return;
        }
        let Some(seat) = self.seat_of(player_id) else {
            return;
        };
        {
            let hand = self.hand.as_mut().expect("hand active");
            hand.reveals.insert(
                seat,
                HandReveal {
                    rank: hand_rank,
                    description: description.clone(),
                    cards,
                },
            );
        }
        self.sink.broadcast(
            &self.player_ids(),
            ServerMessage::HandRevealed {
                player_id: player_id.to_string(),
                hand_rank,
                hand_description: description,
                card_indices: cards.to_vec(),
            },
        );

        let hand = self.hand.as_ref().expect("hand active");
        let everyone_revealed = hand
            .betting
            .seats_in_hand()
            .iter()
            .all(|seat| hand.reveals.contains_key(seat));
        if everyone_revealed {
            self.settle_and_finish();
        }
    }

    fn settle_and_finish(&mut self) {
        let settlement = {
            let hand = self.hand.as_ref().expect("hand active");
            let ranks: BTreeMap<SeatId, u16> = hand
                .reveals
                .iter()
                .map(|(seat, reveal)| (*seat, reveal.rank))
                .collect();
            settle_showdown(&hand.betting.seats, self.dealer, &ranks)
        };
        self.apply_payouts(&settlement);

        let hand = self.hand.as_ref().expect("hand active");
        let players_dto: Vec<ShowdownPlayerDto> = hand
            .betting
            .seats_in_hand()
            .iter()
            .filter_map(|seat| {
                let player = self.player_at(*seat)?;
                let reveal = hand.reveals.get(seat);
                Some(ShowdownPlayerDto {
                    player_id: player.to_string(),
                    seat_index: *seat,
                    hand_rank: reveal.map(|r| r.rank),
                    hand_description: reveal.map(|r| r.description.clone()),
                    card_indices: reveal.map(|r| r.cards.to_vec()),
                })
            })
            .collect();
        let winners: Vec<String> = settlement
            .winners
            .iter()
            .filter_map(|seat| self.player_at(*seat))
            .map(|p| p.to_string())
            .collect();
        let distribution: Vec<PotShareDto> = settlement
            .payouts
            .iter()
            .filter_map(|(seat, amount)| {
                Some(PotShareDto {
                    player_id: self.player_at(*seat)?.to_string(),
                    amount: *amount,
                })
            })
            .collect();
        self.sink.broadcast(
            &self.player_ids(),
            ServerMessage::Showdown {
                players: players_dto,
                winners,
                pot_distribution: distribution,
            },
        );
        self.end_hand("showdown");
    }

    fn finish_fold_win(&mut self, winner: SeatId) {
        let settlement = {
            let hand = self.hand.as_ref().expect("hand active");
            settle_fold_win(&hand.betting.seats, winner)
        };
        self.apply_payouts(&settlement);
        self.end_hand("fold");
    }

    /// Final stacks: the chips behind in the betting state plus any pot
    /// share won.
    fn apply_payouts(&mut self, settlement: &Settlement) {
        let stacks: BTreeMap<SeatId, Chips> = {
            let hand = self.hand.as_ref().expect("hand active");
            hand.betting.seats.iter().map(|s| (s.seat, s.stack)).collect()
        };
        for player in &mut self.players {
            if let Some(stack) = stacks.get(&player.seat) {
                let payout = settlement.payouts.get(&player.seat).copied().unwrap_or(0);
                player.stack = stack + payout;
            }
        }
    }

    fn abort_hand(&mut self, reason: &str) {
        if let Some(hand) = self.hand.as_ref() {
            let restored = hand.stacks_at_start.clone();
            for player in &mut self.players {
                if let Some(stack) = restored.get(&player.seat) {
                    player.stack = *stack;
                }
            }
        }
        warn!(target = LOG_TARGET, room = %self.id, reason, "hand aborted");
        self.end_hand(reason);
    }

    fn end_hand(&mut self, reason: &str) {
        let final_stacks: Vec<FinalStackDto> = self
            .players
            .iter()
            .map(|p| FinalStackDto {
                player_id: p.id.to_string(),
                seat_index: p.seat,
                stack: p.stack,
            })
            .collect();
        self.sink.broadcast(
            &self.player_ids(),
            ServerMessage::GameEnded {
                reason: reason.to_string(),
                final_stacks,
            },
        );

        self.hand = None;
        self.phase = Phase::Waiting;
        self.cancel_timer();
        self.pending_verify.clear();
        for player in &mut self.players {
            player.ready = false;
        }
        // Dealer rotates one seat, skipping eliminated stacks.
        if let Some(next_dealer) = self.next_funded_seat(self.dealer) {
            self.dealer = next_dealer;
        }
        info!(target = LOG_TARGET, room = %self.id, reason, dealer = self.dealer, "hand ended");
    }

    fn next_funded_seat(&self, from: SeatId) -> Option<SeatId> {
        for offset in 1..=10u8 {
            let candidate = (from + offset) % 10;
            if self
                .players
                .iter()
                .any(|p| p.seat == candidate && p.stack > 0)
            {
                return Some(candidate);
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Departures, timers, forfeits
    // ------------------------------------------------------------------

    fn handle_departure(&mut self, player_id: PlayerId) {
        let Some(seat) = self.seat_of(player_id) else {
            return;
        };
        info!(target = LOG_TARGET, room = %self.id, player = %player_id, "player departed");
        self.pending_verify.remove(&player_id);

        let in_active_hand = self
            .hand
            .as_ref()
            .map(|h| h.betting.seats_in_hand().contains(&seat))
            .unwrap_or(false);

        if in_active_hand {
            self.forfeit(player_id, seat);
        }

        self.players.retain(|p| p.id != player_id);
        self.sink.broadcast(
            &self.player_ids(),
            ServerMessage::PlayerLeft {
                player_id: player_id.to_string(),
            },
        );
        if matches!(self.phase, Phase::Waiting) {
            self.maybe_start_hand();
        }
    }

    /// Forfeit for the current hand: fold the seat; if the departing
    /// player's key layers are still needed to open cards, the hand cannot
    /// be completed and is aborted instead.
    fn forfeit(&mut self, player_id: PlayerId, seat: SeatId) {
        if self.hand.is_none() {
            return;
        }
        let (survivors, holds_needed_layers) = {
            let hand = self.hand.as_mut().expect("hand active");
            if let Some(idx) = hand.betting.seat_index(seat) {
                hand.betting.seats[idx].folded = true;
            }
            hand.shuffle_order.retain(|p| *p != player_id);
            (
                hand.betting.seats_in_hand(),
                hand.mask_holders.contains(&player_id),
            )
        };

        if survivors.len() == 1 {
            // Fold-win needs no further cryptography.
            self.finish_fold_win(survivors[0]);
            return;
        }

        match &self.phase {
            Phase::Shuffling { turn } => {
                let turn = *turn;
                if holds_needed_layers {
                    self.abort_hand("player_forfeit");
                } else {
                    // Not yet shuffled: skip their turn and continue.
                    let order_len = self.hand.as_ref().expect("hand active").shuffle_order.len();
                    if turn >= order_len {
                        self.deal();
                    } else {
                        self.phase = Phase::Shuffling { turn };
                        self.send_shuffle_turn();
                    }
                }
            }
            Phase::UnmaskingHole | Phase::UnmaskingCommunity { .. } => {
                if holds_needed_layers {
                    self.abort_hand("player_forfeit");
                }
            }
            Phase::Betting => {
                let (is_turn, settled, next) = {
                    let hand = self.hand.as_ref().expect("hand active");
                    (
                        hand.betting.to_act == seat,
                        hand.betting.street_settled(),
                        hand.betting.next_actor_after(seat),
                    )
                };
                if is_turn {
                    // The engine sees the seat as folded already; move the
                    // turn along.
                    if settled {
                        self.advance_after_street();
                    } else if let Some(next) = next {
                        self.hand.as_mut().expect("hand active").betting.to_act = next;
                        self.prompt_turn();
                    }
                }
            }
            Phase::Showdown => {
                // Their reveal is simply never received; the showdown timer
                // or the remaining reveals settle the hand.
                let everyone_revealed = {
                    let hand = self.hand.as_ref().expect("hand active");
                    hand.betting
                        .seats_in_hand()
                        .iter()
                        .all(|s| hand.reveals.contains_key(s))
                };
                if everyone_revealed {
                    self.settle_and_finish();
                }
            }
            Phase::Waiting => {}
        }
    }

    fn handle_timer(&mut self, generation: u64) {
        if generation != self.timer_generation {
            return;
        }
        match &self.phase {
            Phase::Waiting => {}
            Phase::Shuffling { turn } => {
                let Some(hand) = self.hand.as_ref() else {
                    return;
                };
                if let Some(&laggard) = hand.shuffle_order.get(*turn) {
                    warn!(target = LOG_TARGET, room = %self.id, player = %laggard, "shuffle turn timed out");
                    self.handle_departure(laggard);
                }
            }
            Phase::UnmaskingHole | Phase::UnmaskingCommunity { .. } => {
                let Some(hand) = self.hand.as_ref() else {
                    return;
                };
                let delinquents: Vec<PlayerId> = hand
                    .mask_holders
                    .iter()
                    .copied()
                    .filter(|p| {
                        hand.trackers
                            .values()
                            .any(|t| !t.is_complete() && t.depends_on(*p))
                    })
                    .collect();
                warn!(
                    target = LOG_TARGET,
                    room = %self.id,
                    count = delinquents.len(),
                    "unmask phase timed out"
                );
                for player in delinquents {
                    self.handle_departure(player);
                    if self.hand.is_none() {
                        break;
                    }
                }
            }
            Phase::Betting => {
                let Some(hand) = self.hand.as_ref() else {
                    return;
                };
                let seat = hand.betting.to_act;
                if let Some(player) = self.player_at(seat) {
                    info!(target = LOG_TARGET, room = %self.id, player = %player, seat, "turn timed out, auto-folding");
                }
                let transition = {
                    let hand = self.hand.as_mut().expect("hand active");
                    apply_action(&mut hand.betting, seat, PlayerAction::Fold)
                };
                if let Ok(transition) = transition {
                    self.after_transition(transition);
                }
            }
            Phase::Showdown => {
                // Whoever has not revealed forfeits their claim on the pot.
                self.settle_and_finish();
            }
        }
    }

    // ------------------------------------------------------------------
    // Verification plumbing
    // ------------------------------------------------------------------

    fn spawn_verify(
        &mut self,
        player_id: PlayerId,
        circuit: CircuitType,
        proof_hex: String,
        signals: Vec<BaseField>,
        job: VerifyJob,
    ) {
        let Ok(proof) = hex::decode(proof_hex.trim_start_matches("0x")) else {
            self.reply(player_id, ErrorCode::InvalidMessage, "malformed proof encoding");
            return;
        };
        self.pending_verify.insert(player_id);

        let verifier = self.verifier.clone();
        let tx = self.events_tx.clone();
        let pool = VERIFY_POOL.clone();
        tokio::spawn(async move {
            let _permit = pool.acquire_owned().await;
            let verify_result = tokio::task::spawn_blocking({
                let signals = signals.clone();
                move || verifier.verify(circuit, &proof, &signals)
            })
            .await
            .unwrap_or(Err(VerifyError::Invalid));
            let _ = tx.send(RoomEvent::VerifyCompleted {
                player_id,
                circuit,
                job,
                result: verify_result,
            });
        });
    }

    fn handle_verified(
        &mut self,
        player_id: PlayerId,
        circuit: CircuitType,
        job: VerifyJob,
        result: Result<(), VerifyError>,
    ) {
        self.pending_verify.remove(&player_id);
        // The player may have left while the proof was in flight.
        if self.seat_of(player_id).is_none() {
            return;
        }

        if let Err(err) = result {
            warn!(target = LOG_TARGET, room = %self.id, player = %player_id, %circuit, %err, "proof rejected");
            self.reply(player_id, ErrorCode::InvalidProof, err.to_string());
            let failures = {
                let Some(hand) = self.hand.as_mut() else {
                    return;
                };
                let entry = hand.proof_failures.entry(player_id).or_default();
                *entry += 1;
                *entry
            };
            if failures >= MAX_PROOF_FAILURES {
                warn!(target = LOG_TARGET, room = %self.id, player = %player_id, "repeated proof failures, forfeiting");
                self.handle_departure(player_id);
            }
            return;
        }

        match job {
            VerifyJob::Shuffle { deck, commitment } => {
                self.apply_shuffle(player_id, deck, commitment)
            }
            VerifyJob::Unmask { card_index, card } => {
                self.apply_unmask(player_id, card_index, card)
            }
            VerifyJob::Action { action, .. } => self.apply_betting_action(player_id, action),
            VerifyJob::HandReveal {
                hand_rank,
                description,
                card_indices,
            } => self.apply_reveal(player_id, hand_rank, description, card_indices),
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn parse_signals(
        &self,
        player_id: PlayerId,
        raw: &[String],
        expected: usize,
    ) -> Option<Vec<BaseField>> {
        if raw.len() != expected {
            self.reply(
                player_id,
                ErrorCode::InvalidMessage,
                format!("expected {expected} public signals"),
            );
            return None;
        }
        let mut signals = Vec::with_capacity(raw.len());
        for value in raw {
            match field_from_decimal(value) {
                Ok(signal) => signals.push(signal),
                Err(_) => {
                    self.reply(player_id, ErrorCode::InvalidMessage, "malformed public signal");
                    return None;
                }
            }
        }
        Some(signals)
    }

    fn public_key_coords(&self, player_id: PlayerId) -> (BaseField, BaseField) {
        use ark_ff::Zero;
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .map(|p| point_coordinates(&p.public_key))
            .unwrap_or((BaseField::zero(), BaseField::zero()))
    }

    fn reply(&self, player_id: PlayerId, code: ErrorCode, message: impl Into<String>) {
        self.sink
            .send(player_id, ServerMessage::error(code, message));
    }

    fn player_ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|p| p.id).collect()
    }

    fn seat_of(&self, player_id: PlayerId) -> Option<SeatId> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .map(|p| p.seat)
    }

    fn player_at(&self, seat: SeatId) -> Option<PlayerId> {
        self.players
            .iter()
            .find(|p| p.seat == seat)
            .map(|p| p.id)
    }

    fn lowest_free_seat(&self) -> SeatId {
        for seat in 0..10u8 {
            if !self.players.iter().any(|p| p.seat == seat) {
                return seat;
            }
        }
        0
    }

    fn arm_timer(&mut self, duration: Duration) {
        self.timer_generation += 1;
        let generation = self.timer_generation;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            let _ = tx.send(RoomEvent::TimerFired { generation });
        });
    }

    fn cancel_timer(&mut self) {
        self.timer_generation += 1;
    }
}
