//! Per-card unmask trackers.
//!
//! A hole card needs every player except its owner; requests fan out in
//! parallel. A community card needs every player, one at a time, because
//! each unmask witness builds on the card state the previous one produced.

use std::collections::{BTreeSet, VecDeque};

use super::PlayerId;
use crate::shuffling::MaskedCard;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnmaskTarget {
    Player(PlayerId),
    Community,
}

#[derive(Clone, Debug)]
pub struct UnmaskTracker {
    pub card_index: u8,
    pub target: UnmaskTarget,
    /// Current (partially unmasked) card state; advances with each accepted
    /// proof, so the commitment a peer sees for this index is monotonic.
    pub card: MaskedCard,
    contributed: BTreeSet<PlayerId>,
    required: BTreeSet<PlayerId>,
    /// Community only: players yet to unmask, in request order.
    queue: VecDeque<PlayerId>,
}

impl UnmaskTracker {
    /// Tracker for a hole card: everyone but the owner unmasks, in any
    /// order.
    pub fn for_hole_card(
        card_index: u8,
        card: MaskedCard,
        owner: PlayerId,
        players: &[PlayerId],
    ) -> Self {
        let required: BTreeSet<PlayerId> =
            players.iter().copied().filter(|p| *p != owner).collect();
        Self {
            card_index,
            target: UnmaskTarget::Player(owner),
            card,
            contributed: BTreeSet::new(),
            required,
            queue: VecDeque::new(),
        }
    }

    /// Tracker for a community card: every player unmasks, sequentially in
    /// the given order.
    pub fn for_community_card(card_index: u8, card: MaskedCard, players: &[PlayerId]) -> Self {
        Self {
            card_index,
            target: UnmaskTarget::Community,
            card,
            contributed: BTreeSet::new(),
            required: players.iter().copied().collect(),
            queue: players.iter().copied().collect(),
        }
    }

    /// Whether this player's unmask would be accepted right now.
    pub fn expects(&self, player: PlayerId) -> bool {
        match self.target {
            UnmaskTarget::Player(_) => {
                self.required.contains(&player) && !self.contributed.contains(&player)
            }
            UnmaskTarget::Community => self.queue.front() == Some(&player),
        }
    }

    pub fn has_contributed(&self, player: PlayerId) -> bool {
        self.contributed.contains(&player)
    }

    /// Records an accepted partial unmask and advances the card state.
    pub fn record(&mut self, player: PlayerId, card_after: MaskedCard) {
        debug_assert!(self.expects(player));
        self.contributed.insert(player);
        self.card = card_after;
        if self.queue.front() == Some(&player) {
            self.queue.pop_front();
        }
    }

    pub fn is_complete(&self) -> bool {
        self.contributed == self.required
    }

    pub fn remaining(&self) -> usize {
        self.required.len() - self.contributed.len()
    }

    /// Community only: who the next request goes to.
    pub fn next_in_queue(&self) -> Option<PlayerId> {
        self.queue.front().copied()
    }

    /// Whether completing this tracker still depends on the given player.
    pub fn depends_on(&self, player: PlayerId) -> bool {
        self.required.contains(&player) && !self.contributed.contains(&player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn players(n: usize) -> Vec<PlayerId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    fn card() -> MaskedCard {
        MaskedCard::from_card_index(0)
    }

    #[test]
    fn hole_tracker_completes_when_all_non_owners_contribute() {
        let ids = players(3);
        let mut tracker = UnmaskTracker::for_hole_card(0, card(), ids[0], &ids);

        assert!(!tracker.expects(ids[0]), "owner never unmasks own card");
        assert!(tracker.expects(ids[1]));
        assert_eq!(tracker.remaining(), 2);

        tracker.record(ids[1], card());
        assert!(!tracker.is_complete());
        assert!(!tracker.expects(ids[1]), "double contribution refused");

        tracker.record(ids[2], card());
        assert!(tracker.is_complete());
        assert_eq!(tracker.remaining(), 0);
    }

    #[test]
    fn community_tracker_enforces_queue_order() {
        let ids = players(3);
        let mut tracker = UnmaskTracker::for_community_card(4, card(), &ids);

        assert_eq!(tracker.next_in_queue(), Some(ids[0]));
        assert!(tracker.expects(ids[0]));
        assert!(!tracker.expects(ids[1]), "out of turn");

        tracker.record(ids[0], card());
        assert_eq!(tracker.next_in_queue(), Some(ids[1]));
        tracker.record(ids[1], card());
        tracker.record(ids[2], card());
        assert!(tracker.is_complete());
        assert_eq!(tracker.next_in_queue(), None);
    }

    #[test]
    fn dependency_tracks_missing_contributors() {
        let ids = players(2);
        let mut tracker = UnmaskTracker::for_community_card(6, card(), &ids);
        assert!(tracker.depends_on(ids[0]));
        tracker.record(ids[0], card());
        assert!(!tracker.depends_on(ids[0]));
        assert!(tracker.depends_on(ids[1]));
    }
}
