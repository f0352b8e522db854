//! Helpers shared by the integration tests.
#![allow(dead_code)]

use chrono::Utc;
use knockout_tournament_web::{
    build_bracket, register_competitor, register_match_result, Bracket, CompetitorId, Match,
    Tournament,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

/// Unstarted tournament with `n` registered competitors.
pub fn bracket_with_competitors(n: usize) -> Bracket {
    let mut bracket = Bracket::new(Tournament::new("Test Cup").unwrap());
    for _ in 0..n {
        register_competitor(&mut bracket, Uuid::new_v4()).unwrap();
    }
    bracket
}

/// Tournament with `n` competitors and its bracket built.
pub fn started(n: usize, seed: u64) -> Bracket {
    let mut bracket = bracket_with_competitors(n);
    build_bracket(&mut bracket, &mut StdRng::seed_from_u64(seed), Utc::now()).unwrap();
    bracket
}

pub fn at(bracket: &Bracket, round: u32, position: u32) -> &Match {
    bracket
        .match_at(round, position)
        .unwrap_or_else(|| panic!("no match at round {round} position {position}"))
}

pub fn next_match(bracket: &Bracket, competitor: CompetitorId) -> Option<Uuid> {
    bracket.participation(competitor).unwrap().next_match
}

/// Register `winner` for the match at (round, position).
pub fn play(bracket: &mut Bracket, round: u32, position: u32, winner: CompetitorId) -> Match {
    let id = at(bracket, round, position).id;
    register_match_result(bracket, id, winner, Utc::now())
        .unwrap()
        .clone()
}

/// Play every ready match, slot A always winning, until nothing is left to play.
pub fn play_out(bracket: &mut Bracket) {
    while let Some(m) = bracket.matches.iter().find(|m| m.is_ready()).cloned() {
        let winner = m.slot_a.unwrap();
        register_match_result(bracket, m.id, winner, Utc::now()).unwrap();
    }
}
