//! Integration tests for bracket generation: seating, byes and next-match pointers.

mod common;

use chrono::Utc;
use common::{at, bracket_with_competitors, next_match, started};
use knockout_tournament_web::{
    build_bracket, compute_topology, register_competitor, BuildError, TournamentError,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn build_requires_competitors() {
    let mut bracket = bracket_with_competitors(0);
    let before = bracket.clone();
    let result = build_bracket(&mut bracket, &mut StdRng::seed_from_u64(1), Utc::now());
    assert_eq!(result.unwrap_err(), BuildError::NoCompetitors);
    assert!(!bracket.tournament.is_started());
    assert!(bracket.matches.is_empty());
    assert_eq!(bracket.tournament, before.tournament);
}

#[test]
fn build_twice_is_rejected() {
    let mut bracket = started(4, 1);
    let before = bracket.clone();
    let result = build_bracket(&mut bracket, &mut StdRng::seed_from_u64(2), Utc::now());
    assert_eq!(
        result.unwrap_err(),
        BuildError::Tournament(TournamentError::AlreadyStarted)
    );
    assert_eq!(bracket.matches, before.matches);
}

#[test]
fn registration_closes_at_start() {
    let mut bracket = started(2, 1);
    let late = Uuid::new_v4();
    assert_eq!(
        register_competitor(&mut bracket, late).unwrap_err(),
        TournamentError::AlreadyStarted
    );
    assert!(bracket.participation(late).is_none());
}

#[test]
fn competitor_registers_once() {
    let mut bracket = bracket_with_competitors(1);
    let id = bracket.participations[0].competitor_id;
    assert_eq!(
        register_competitor(&mut bracket, id).unwrap_err(),
        TournamentError::AlreadyRegistered(id)
    );
    assert_eq!(bracket.participations.len(), 1);
}

#[test]
fn single_competitor_wins_outright() {
    let before = Utc::now();
    let bracket = started(1, 7);
    let c = bracket.participations[0].competitor_id;

    let start = bracket.tournament.started().unwrap();
    assert_eq!(start.competitor_count, 1);
    assert_eq!(start.starting_round, 0);
    assert!(start.started_at >= before);

    assert_eq!(bracket.matches.len(), 1);
    let m = &bracket.matches[0];
    assert_eq!((m.round, m.position), (0, 0));
    assert_eq!(m.slot_a, Some(c));
    assert_eq!(m.slot_b, None);
    assert_eq!(m.winner(), Some(c));
    assert_eq!(m.loser(), None);
    assert!(m.result_registered_at().is_some());
    assert_eq!(next_match(&bracket, c), None);
}

#[test]
fn two_competitors_meet_in_the_final() {
    let bracket = started(2, 3);
    assert_eq!(bracket.matches.len(), 1);
    let m = &bracket.matches[0];
    assert_eq!((m.round, m.position), (0, 0));
    let (a, b) = m.pairing().unwrap();
    assert_ne!(a, b);
    assert!(!m.is_decided());
    assert_eq!(next_match(&bracket, a), Some(m.id));
    assert_eq!(next_match(&bracket, b), Some(m.id));
    assert!(bracket.third_place_match().is_none());
}

#[test]
fn three_competitors_one_semifinal_and_a_bye() {
    let bracket = started(3, 11);
    assert_eq!(bracket.tournament.started().unwrap().starting_round, 1);
    let order: Vec<(u32, u32)> = bracket.matches.iter().map(|m| (m.round, m.position)).collect();
    assert_eq!(order, vec![(1, 0), (1, 1), (0, 0), (0, 1)]);

    let semi = at(&bracket, 1, 0);
    let (a, b) = semi.pairing().unwrap();
    assert!(!semi.is_decided());
    assert_eq!(next_match(&bracket, a), Some(semi.id));
    assert_eq!(next_match(&bracket, b), Some(semi.id));

    let bye = at(&bracket, 1, 1);
    let byed = bye.slot_a.unwrap();
    assert_eq!(bye.slot_b, None);
    assert_eq!(bye.winner(), Some(byed));
    assert_eq!(bye.loser(), None);

    // Position 1 feeds slot B of the final.
    let final_match = at(&bracket, 0, 0);
    assert_eq!(final_match.slot_a, None);
    assert_eq!(final_match.slot_b, Some(byed));
    assert!(!final_match.is_decided());
    assert_eq!(next_match(&bracket, byed), Some(final_match.id));

    let third = at(&bracket, 0, 1);
    assert_eq!((third.slot_a, third.slot_b), (None, None));
    assert!(!third.is_decided());
}

#[test]
fn five_competitors_three_byes() {
    let bracket = started(5, 5);
    let start = bracket.tournament.started().unwrap();
    assert_eq!(start.starting_round, 2);
    assert_eq!(bracket.matches.len(), 8);

    let first = at(&bracket, 2, 0);
    assert!(first.pairing().is_some());
    assert!(!first.is_decided());

    for position in 1..4 {
        let m = at(&bracket, 2, position);
        let c = m.slot_a.unwrap();
        assert_eq!(m.slot_b, None);
        assert_eq!(m.winner(), Some(c));
        assert_eq!(m.loser(), None);

        let target = at(&bracket, 1, position / 2);
        let slot = if position % 2 == 0 { target.slot_a } else { target.slot_b };
        assert_eq!(slot, Some(c));
        assert_eq!(next_match(&bracket, c), Some(target.id));
    }

    // Semifinal 0 waits for the winner of entry match 0; semifinal 1 is two byes.
    assert_eq!(at(&bracket, 1, 0).slot_a, None);
    assert!(at(&bracket, 1, 0).slot_b.is_some());
    assert!(at(&bracket, 1, 1).is_ready());

    for (round, position) in [(0, 0), (0, 1)] {
        let m = at(&bracket, round, position);
        assert_eq!((m.slot_a, m.slot_b), (None, None));
        assert!(!m.is_decided());
    }
}

#[test]
fn structural_invariants_hold_for_many_sizes() {
    for n in 1..=40 {
        let bracket = started(n, n as u64);
        let t = compute_topology(n).unwrap();

        let expected = (2usize << t.starting_round) - 1 + usize::from(n > 2);
        assert_eq!(bracket.matches.len(), expected, "n = {n}");

        let slots: HashSet<(u32, u32)> = bracket.matches.iter().map(|m| (m.round, m.position)).collect();
        assert_eq!(slots.len(), bracket.matches.len(), "n = {n}");

        let entry: Vec<_> = bracket
            .matches
            .iter()
            .filter(|m| m.round == t.starting_round)
            .collect();
        assert_eq!(entry.len(), t.entry_matches);
        assert!(entry.iter().all(|m| m.slot_a.is_some()), "n = {n}");
        let byes = entry.iter().filter(|m| m.slot_b.is_none()).count();
        assert_eq!(byes, 2 * t.entry_matches - n, "n = {n}");
        // Every bye is already decided; every full entry match is not.
        for m in &entry {
            assert_eq!(m.is_decided(), m.slot_b.is_none(), "n = {n}");
        }

        let seated: HashSet<_> = entry
            .iter()
            .flat_map(|m| [m.slot_a, m.slot_b])
            .flatten()
            .collect();
        assert_eq!(seated.len(), n);

        for p in &bracket.participations {
            match p.next_match {
                Some(id) => {
                    let m = bracket.find_match(id).unwrap();
                    assert!(m.has_competitor(p.competitor_id));
                    assert!(!m.is_decided());
                }
                None => assert_eq!(n, 1),
            }
        }
    }
}

#[test]
fn same_seed_same_seating() {
    let template = bracket_with_competitors(11);
    let now = Utc::now();

    let mut first = template.clone();
    build_bracket(&mut first, &mut StdRng::seed_from_u64(99), now).unwrap();
    let mut second = template.clone();
    build_bracket(&mut second, &mut StdRng::seed_from_u64(99), now).unwrap();

    let seating = |b: &knockout_tournament_web::Bracket| -> Vec<_> {
        b.matches.iter().map(|m| (m.slot_a, m.slot_b)).collect()
    };
    assert_eq!(seating(&first), seating(&second));
}
