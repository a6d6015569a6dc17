use crate::card::{Color, ManaCost};
use crate::game::state::{Card, LandInPlay};
use crate::rng::GameRng;

/// Scoring for a color-lock decision (passage/town/wilds/fabled locks
/// and cycler fetches). The scoring is pure; randomness is confined to
/// the single tie-break draw in `choose_color`.
///
/// A color is worth more when a tracked cost wants it and nothing else
/// can make it, and less for every in-play land that already can.
pub fn score_color(
    color: Color,
    board: &[LandInPlay],
    hand: &[Card],
    exclude_hand_idx: Option<usize>,
    costs: &[ManaCost],
) -> i32 {
    let mut score = 0;

    if costs.iter().any(|cost| cost.requires_color(color)) {
        score += 10;
    }

    let producers = board
        .iter()
        .filter(|entry| board_produces(entry, color))
        .count();
    if producers == 0 {
        score += 5;
    }

    let in_hand = hand.iter().enumerate().any(|(idx, card)| {
        Some(idx) != exclude_hand_idx
            && card.producible().map_or(false, |colors| colors.contains(color))
    });
    if !in_hand {
        score += 3;
    }

    score - producers as i32
}

fn board_produces(entry: &LandInPlay, color: Color) -> bool {
    match entry.locked {
        Some(locked) => locked == color,
        None => entry.land.production.has_color(color),
    }
}

/// Pick the best-scoring eligible color, breaking ties uniformly at
/// random. None when nothing is eligible (the lock is deferred, never
/// forced).
pub fn choose_color(
    eligible: &[Color],
    board: &[LandInPlay],
    hand: &[Card],
    exclude_hand_idx: Option<usize>,
    costs: &[ManaCost],
    rng: &mut GameRng,
) -> Option<Color> {
    if eligible.is_empty() {
        return None;
    }

    let scored: Vec<(Color, i32)> = eligible
        .iter()
        .map(|&color| {
            (
                color,
                score_color(color, board, hand, exclude_hand_idx, costs),
            )
        })
        .collect();
    let best = scored.iter().map(|(_, s)| *s).max()?;
    let top: Vec<Color> = scored
        .iter()
        .filter(|(_, s)| *s == best)
        .map(|(c, _)| *c)
        .collect();
    Some(*rng.pick(&top))
}
