use crate::card::{Color, ColorSet, LandKind, ManaCost};
use crate::game::state::{Card, RockInPlay, TrialState, UnitOwner};
use crate::game::{lands, mana};
use crate::simulation::binding;

/// One full simulated turn: draw, resolve cyclers, make the land drop,
/// cast a rock. Castability of the tracked costs is the caller's to
/// record afterwards.
pub fn take_turn(state: &mut TrialState, costs: &[ManaCost]) {
    state.begin_turn();
    resolve_cyclers(state, costs);
    play_land(state, costs);
    cast_rock(state);
}

/// Swap every cycler whose land threshold is met for a basic of its
/// color, drawn from the deck into hand. A cycler with no matching
/// basic left simply stays in hand.
pub fn resolve_cyclers(state: &mut TrialState, costs: &[ManaCost]) {
    let mut idx = 0;
    while idx < state.hand.len() {
        let color = match &state.hand[idx] {
            Card::Cycler(cycler) if (cycler.threshold as usize) <= state.lands.len() => {
                cycler.color()
            }
            _ => {
                idx += 1;
                continue;
            }
        };

        let eligible: Vec<Color> = if state.basics_left(color) > 0 {
            vec![color]
        } else {
            Vec::new()
        };
        let choice = binding::choose_color(
            &eligible,
            &state.lands,
            &state.hand,
            Some(idx),
            costs,
            &mut state.rng,
        );

        match choice.and_then(|c| state.take_basic_from_deck(c)) {
            Some(basic) => {
                state.rng.shuffle(&mut state.deck);
                let cycler = state.hand.remove(idx);
                state.removed.push(cycler);
                state.hand.push(basic);
                // the removed slot now holds the next card; don't advance
            }
            None => idx += 1,
        }
    }
}

/// Make at most one land drop, preferring a land that lets a tracked
/// cost be paid this very turn. Otherwise tapped lands go down early
/// (their cost is sunk now, not later), with slowlands and passages
/// held back.
pub fn play_land(state: &mut TrialState, costs: &[ManaCost]) -> bool {
    if state.played_land_this_turn {
        return false;
    }

    // partition hand lands by how they would arrive
    let mut passages: Vec<usize> = Vec::new(); // deprioritized choice lands
    let mut slowlands: Vec<usize> = Vec::new();
    let mut untapped: Vec<usize> = Vec::new();
    let mut other_tapped: Vec<usize> = Vec::new();
    for (idx, card) in state.hand.iter().enumerate() {
        let land = match card {
            Card::Land { land, .. } => land,
            _ => continue,
        };
        let tapped = lands::enters_tapped(land, state.lands.len(), state.turn);
        if land.kind == LandKind::Passage {
            passages.push(idx);
        } else if tapped && land.kind == LandKind::Slow {
            slowlands.push(idx);
        } else if tapped {
            other_tapped.push(idx);
        } else {
            untapped.push(idx);
        }
    }

    // a land that enables a cast right now wins; passages only as a
    // last resort
    let scan: Vec<usize> = untapped.iter().chain(&slowlands).copied().collect();
    for &idx in scan.iter().chain(&passages) {
        ensure_locked(state, idx, costs);
        if enables_cast(state, idx, costs) {
            state.put_land_into_play(idx);
            return true;
        }
    }

    // otherwise: priority order, most cost-color overlap, random ties
    let bucket = [other_tapped, untapped, slowlands, passages]
        .into_iter()
        .find(|bucket| !bucket.is_empty());
    let bucket = match bucket {
        Some(bucket) => bucket,
        None => return false,
    };
    for &idx in &bucket {
        ensure_locked(state, idx, costs);
    }
    let chosen = pick_by_overlap(state, &bucket, costs);
    state.put_land_into_play(chosen);
    true
}

/// Resolve a choice land's color lock while it is still in hand, so a
/// later play keeps the same lock. Fetch kinds only consider colors
/// with a basic left in the deck; an empty field defers the lock.
fn ensure_locked(state: &mut TrialState, hand_idx: usize, costs: &[ManaCost]) {
    let eligible: Vec<Color> = match &state.hand[hand_idx] {
        Card::Land { land, locked } => {
            if locked.is_some() || !land.kind.locks_color() {
                return;
            }
            let mut colors = land.production.colors_in_order();
            if land.kind.fetches() {
                colors.retain(|&color| state.basics_left(color) > 0);
            }
            colors
        }
        _ => return,
    };

    let choice = binding::choose_color(
        &eligible,
        &state.lands,
        &state.hand,
        Some(hand_idx),
        costs,
        &mut state.rng,
    );
    if choice.is_some() {
        if let Card::Land { locked, .. } = &mut state.hand[hand_idx] {
            *locked = choice;
        }
    }
}

fn enables_cast(state: &TrialState, hand_idx: usize, costs: &[ManaCost]) -> bool {
    match &state.hand[hand_idx] {
        Card::Land { land, locked } => state.would_enable_cast(land, *locked, costs),
        _ => false,
    }
}

/// Most overlap between a land's colors and any tracked cost's colors;
/// ties (and the no-cost case) resolve uniformly at random
fn pick_by_overlap(state: &mut TrialState, bucket: &[usize], costs: &[ManaCost]) -> usize {
    if costs.is_empty() {
        return *state.rng.pick(bucket);
    }

    let scored: Vec<(usize, usize)> = bucket
        .iter()
        .map(|&idx| {
            let colors = match &state.hand[idx] {
                Card::Land { land, .. } => land.production.all_colors(),
                _ => ColorSet::new(),
            };
            let overlap = costs
                .iter()
                .map(|cost| colors.intersection(cost.color_set()).len())
                .max()
                .unwrap_or(0);
            (idx, overlap)
        })
        .collect();
    let best = scored.iter().map(|(_, s)| *s).max().unwrap_or(0);
    let top: Vec<usize> = scored
        .iter()
        .filter(|(_, s)| *s == best)
        .map(|(idx, _)| *idx)
        .collect();
    *state.rng.pick(&top)
}

/// Cast the first rock in hand whose cost is payable. The units that
/// pay for it are spent for the rest of the turn; the rock's own unit
/// is usable immediately after.
pub fn cast_rock(state: &mut TrialState) -> bool {
    for idx in 0..state.hand.len() {
        let cost = match &state.hand[idx] {
            Card::Rock(rock) => rock.cost.clone(),
            _ => continue,
        };
        let (units, owners) = state.mana_units();
        let claimed = match mana::claim_units(&cost, &units) {
            Some(claimed) => claimed,
            None => continue,
        };
        for unit_idx in claimed {
            match owners[unit_idx] {
                UnitOwner::Land(i) => state.lands[i].spent = true,
                UnitOwner::Rock(i) => state.rocks[i].spent = true,
            }
        }
        if let Card::Rock(rock) = state.hand.remove(idx) {
            state.rocks.push(RockInPlay { rock, spent: false });
        }
        return true;
    }
    false
}
