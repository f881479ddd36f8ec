use super::engine::{apply_action, Transition};
use super::errors::ActionError;
use super::legals::legal_actions_for;
use super::pots::compute_pots;
use super::state::{BettingState, HandConfig, SeatState};
use super::types::{ActionKind, Chips, PlayerAction, SeatId, Street};

fn heads_up(stacks: [Chips; 2], dealer: SeatId) -> BettingState {
    BettingState::new_hand(
        HandConfig {
            small_blind: 1,
            big_blind: 2,
            dealer,
        },
        vec![SeatState::new(0, stacks[0]), SeatState::new(1, stacks[1])],
    )
}

fn three_handed(stacks: [Chips; 3]) -> BettingState {
    BettingState::new_hand(
        HandConfig {
            small_blind: 1,
            big_blind: 2,
            dealer: 0,
        },
        vec![
            SeatState::new(0, stacks[0]),
            SeatState::new(1, stacks[1]),
            SeatState::new(2, stacks[2]),
        ],
    )
}

fn total_chips(state: &BettingState) -> Chips {
    state.seats.iter().map(|s| s.stack).sum::<Chips>() + state.pot
}

#[test]
fn heads_up_fold_ends_the_hand_with_blinds_in_the_pot() {
    // P0 deals, posts 1; P1 posts 2. P0 folds to the big blind.
    let mut state = heads_up([100, 100], 0);
    assert_eq!(state.pot, 3);
    assert_eq!(state.seat(0).unwrap().stack, 99);
    assert_eq!(state.seat(1).unwrap().stack, 98);

    let transition = apply_action(&mut state, 0, PlayerAction::Fold).unwrap();
    match transition {
        Transition::HandEnd { winner, .. } => assert_eq!(winner, 1),
        other => panic!("expected hand end, got {other:?}"),
    }
    // The pot (3) goes to the winner at settlement: 98 + 3 = 101.
}

#[test]
fn heads_up_call_then_check_closes_preflop() {
    let mut state = heads_up([100, 100], 0);

    // Dealer completes the small blind.
    let t = apply_action(&mut state, 0, PlayerAction::Call).unwrap();
    assert!(matches!(t, Transition::Continued { next_to_act: 1, .. }));
    assert_eq!(state.pot, 4);
    assert_eq!(state.seat(0).unwrap().stack, 98);

    // Big blind exercises the option with a check; street settles.
    let t = apply_action(&mut state, 1, PlayerAction::Check).unwrap();
    assert!(matches!(
        t,
        Transition::StreetEnd {
            street: Street::Preflop,
            ..
        }
    ));

    assert_eq!(state.advance_street(), Some(Street::Flop));
    // Non-dealer acts first postflop.
    assert_eq!(state.to_act, 1);

    // Both check every remaining street.
    for expected in [Street::Flop, Street::Turn, Street::River] {
        assert_eq!(state.street, expected);
        let t = apply_action(&mut state, 1, PlayerAction::Check).unwrap();
        assert!(matches!(t, Transition::Continued { .. }));
        let t = apply_action(&mut state, 0, PlayerAction::Check).unwrap();
        assert!(matches!(t, Transition::StreetEnd { street, .. } if street == expected));
        state.advance_street().unwrap();
    }
    assert_eq!(state.street, Street::Showdown);
    assert_eq!(state.pot, 4);
    assert_eq!(total_chips(&state), 200);
}

#[test]
fn big_blind_may_raise_the_limped_pot() {
    let mut state = heads_up([100, 100], 0);
    apply_action(&mut state, 0, PlayerAction::Call).unwrap();

    let legals = legal_actions_for(&state, 1);
    assert!(legals.allows(ActionKind::Check));
    assert!(legals.allows(ActionKind::Raise));
    assert_eq!(legals.min_raise_to, Some(4));

    let t = apply_action(&mut state, 1, PlayerAction::Raise { to: 6 }).unwrap();
    assert!(matches!(t, Transition::Continued { next_to_act: 0, .. }));
    assert_eq!(state.bet_to_match, 6);
    assert_eq!(state.min_raise, 4);
}

#[test]
fn raise_below_minimum_is_rejected() {
    let mut state = heads_up([100, 100], 0);
    // Dealer raises to 6 (min-raise is the big blind, so 4 is the floor).
    apply_action(&mut state, 0, PlayerAction::Raise { to: 6 }).unwrap();
    // Re-raise must reach 6 + 4 = 10.
    let err = apply_action(&mut state, 1, PlayerAction::Raise { to: 9 }).unwrap_err();
    assert_eq!(err, ActionError::RaiseBelowMinimum { to: 9, minimum: 10 });
    assert!(apply_action(&mut state, 1, PlayerAction::Raise { to: 10 }).is_ok());
}

#[test]
fn check_facing_a_bet_is_rejected() {
    let mut state = heads_up([100, 100], 0);
    let err = apply_action(&mut state, 0, PlayerAction::Check).unwrap_err();
    assert_eq!(err, ActionError::CannotCheckFacingBet);
}

#[test]
fn bet_is_illegal_once_the_street_is_opened() {
    let mut state = heads_up([100, 100], 0);
    apply_action(&mut state, 0, PlayerAction::Call).unwrap();
    apply_action(&mut state, 1, PlayerAction::Check).unwrap();
    state.advance_street().unwrap();

    apply_action(&mut state, 1, PlayerAction::Bet { amount: 10 }).unwrap();
    let err = apply_action(&mut state, 0, PlayerAction::Bet { amount: 20 }).unwrap_err();
    assert_eq!(err, ActionError::CannotBetWhenOpened);
}

#[test]
fn out_of_turn_actions_are_rejected() {
    let mut state = heads_up([100, 100], 0);
    let err = apply_action(&mut state, 1, PlayerAction::Call).unwrap_err();
    assert_eq!(err, ActionError::NotYourTurn);
}

#[test]
fn pot_conservation_holds_across_a_raised_hand() {
    let mut state = three_handed([100, 80, 120]);
    let before = total_chips(&state);

    apply_action(&mut state, 0, PlayerAction::Raise { to: 6 }).unwrap();
    assert_eq!(total_chips(&state), before);
    apply_action(&mut state, 1, PlayerAction::Call).unwrap();
    assert_eq!(total_chips(&state), before);
    apply_action(&mut state, 2, PlayerAction::Call).unwrap();
    assert_eq!(total_chips(&state), before);
    assert_eq!(state.pot, 18);
}

#[test]
fn short_all_in_call_creates_a_side_pot() {
    // Scenario: P1 (stack 20) shoves, P2 and P3 (50 each) call and then
    // escalate; the 20-level main pot stays three-handed.
    let mut state = three_handed([20, 50, 50]);

    // Seat 0 (dealer) opens all-in for 20.
    let t = apply_action(&mut state, 0, PlayerAction::AllIn).unwrap();
    assert!(matches!(t, Transition::Continued { .. }));
    assert!(state.seat(0).unwrap().all_in);
    assert_eq!(state.bet_to_match, 20);

    // Seat 1 calls 20 total (19 more on top of the small blind).
    apply_action(&mut state, 1, PlayerAction::Call).unwrap();
    // Seat 2 shoves to 50.
    apply_action(&mut state, 2, PlayerAction::AllIn).unwrap();
    // Seat 1 calls the remaining 30; everyone is committed.
    let t = apply_action(&mut state, 1, PlayerAction::Call).unwrap();
    assert!(matches!(t, Transition::StreetEnd { .. }));

    let pots = compute_pots(&state.seats);
    assert_eq!(pots.len(), 2);
    assert_eq!(pots[0].amount, 60); // 20 × 3, all three eligible
    assert_eq!(pots[0].eligible, vec![0, 1, 2]);
    assert_eq!(pots[1].amount, 60); // 30 × 2
    assert_eq!(pots[1].eligible, vec![1, 2]);
    let total: Chips = pots.iter().map(|p| p.amount).sum();
    assert_eq!(total, state.pot);
}

#[test]
fn fold_after_short_all_in_leaves_main_pot_uncontested_by_folder() {
    // P1 shoves 20, P2 calls, P3 raises to 50, P2 folds: P3's excess over
    // the 20 level is returned-equivalent (single-eligible side pot).
    let mut state = three_handed([20, 50, 50]);
    apply_action(&mut state, 0, PlayerAction::AllIn).unwrap();
    apply_action(&mut state, 1, PlayerAction::Call).unwrap();
    apply_action(&mut state, 2, PlayerAction::AllIn).unwrap();
    let t = apply_action(&mut state, 1, PlayerAction::Fold).unwrap();
    // Two players remain in the hand (one all-in on each side); betting is
    // over for the street.
    assert!(matches!(t, Transition::StreetEnd { .. }));

    let pots = compute_pots(&state.seats);
    // Levels 20 and 50: the folder's 20 sits in the main pot.
    assert_eq!(pots[0].amount, 60);
    assert_eq!(pots[0].eligible, vec![0, 2]);
    assert_eq!(pots[1].amount, 30);
    assert_eq!(pots[1].eligible, vec![2]);
}

#[test]
fn all_in_below_min_raise_does_not_reopen_the_street() {
    let mut state = three_handed([100, 100, 25]);
    // Seat 0 raises to 20.
    apply_action(&mut state, 0, PlayerAction::Raise { to: 20 }).unwrap();
    // Seat 1 calls.
    apply_action(&mut state, 1, PlayerAction::Call).unwrap();
    // Seat 2 shoves 25 total: above the match but short of 20 + 18.
    apply_action(&mut state, 2, PlayerAction::AllIn).unwrap();
    assert_eq!(state.bet_to_match, 25);
    // Minimum raise increment is unchanged by the short shove.
    assert_eq!(state.min_raise, 18);

    // Seat 0 owes 5 more; a raise must still reach 25 + 18.
    let err = apply_action(&mut state, 0, PlayerAction::Raise { to: 30 }).unwrap_err();
    assert_eq!(
        err,
        ActionError::RaiseBelowMinimum { to: 30, minimum: 43 }
    );
    apply_action(&mut state, 0, PlayerAction::Call).unwrap();
    let t = apply_action(&mut state, 1, PlayerAction::Call).unwrap();
    assert!(matches!(t, Transition::StreetEnd { .. }));
}

#[test]
fn legal_actions_match_apply_outcomes() {
    // Closure property: an action kind is offered exactly when some
    // parameterization of it applies cleanly.
    let states: Vec<BettingState> = vec![
        heads_up([100, 100], 0),
        {
            let mut s = heads_up([100, 100], 0);
            apply_action(&mut s, 0, PlayerAction::Call).unwrap();
            s
        },
        {
            let mut s = heads_up([100, 100], 0);
            apply_action(&mut s, 0, PlayerAction::Call).unwrap();
            apply_action(&mut s, 1, PlayerAction::Check).unwrap();
            s.advance_street().unwrap();
            s
        },
        {
            let mut s = three_handed([100, 100, 25]);
            apply_action(&mut s, 0, PlayerAction::Raise { to: 20 }).unwrap();
            s
        },
    ];

    for state in states {
        let seat = state.to_act;
        let legals = legal_actions_for(&state, seat);
        let probes: Vec<(ActionKind, PlayerAction)> = vec![
            (ActionKind::Fold, PlayerAction::Fold),
            (ActionKind::Check, PlayerAction::Check),
            (ActionKind::Call, PlayerAction::Call),
            (
                ActionKind::Bet,
                PlayerAction::Bet {
                    amount: legals.min_bet.unwrap_or(state.big_blind),
                },
            ),
            (
                ActionKind::Raise,
                PlayerAction::Raise {
                    to: legals
                        .min_raise_to
                        .unwrap_or(state.bet_to_match + state.min_raise),
                },
            ),
            (ActionKind::AllIn, PlayerAction::AllIn),
        ];
        for (kind, action) in probes {
            let mut probe_state = state.clone();
            let applied = apply_action(&mut probe_state, seat, action).is_ok();
            assert_eq!(
                applied,
                legals.allows(kind),
                "kind {kind:?} mismatch in state {state:?}"
            );
        }
    }
}
