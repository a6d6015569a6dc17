use crate::card::{Cycler, Land, ManaCost, Rock};
use crate::game::state::{Card, TrialState};
use crate::rng::GameRng;
use crate::simulation::{mulligan, turns};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Everything the deck under test contains, already validated
#[derive(Debug, Clone, Default)]
pub struct DeckSpec {
    pub lands: Vec<Land>,
    pub spells: Vec<ManaCost>,
    pub cyclers: Vec<Cycler>,
    pub rocks: Vec<Rock>,
}

impl DeckSpec {
    /// Explicitly declared cards; the rest of the deck is blanks
    pub fn declared_cards(&self) -> usize {
        self.lands.len() + self.cyclers.len() + self.rocks.len()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no lands specified")]
    NoLands,
    #[error("no spells specified")]
    NoSpells,
    #[error("cycles must be a positive integer")]
    ZeroCycles,
    #[error("max turn must be a positive integer")]
    ZeroTurns,
    #[error("deck size {deck_size} is smaller than the {declared} cards declared")]
    DeckTooSmall { deck_size: usize, declared: usize },
}

/// Simulation parameters, validated before any trial runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimSettings {
    /// Number of Monte Carlo trials
    pub cycles: usize,
    pub deck_size: usize,
    pub on_play: bool,
    /// Trials run (and record castability) through this turn
    pub max_turn: u32,
}

impl Default for SimSettings {
    fn default() -> Self {
        SimSettings {
            cycles: 20_000,
            deck_size: 60,
            on_play: true,
            max_turn: 10,
        }
    }
}

impl SimSettings {
    pub fn validate(&self, deck: &DeckSpec) -> Result<(), ConfigError> {
        if deck.lands.is_empty() {
            return Err(ConfigError::NoLands);
        }
        if deck.spells.is_empty() {
            return Err(ConfigError::NoSpells);
        }
        if self.cycles == 0 {
            return Err(ConfigError::ZeroCycles);
        }
        if self.max_turn == 0 {
            return Err(ConfigError::ZeroTurns);
        }
        if self.deck_size < deck.declared_cards() {
            return Err(ConfigError::DeckTooSmall {
                deck_size: self.deck_size,
                declared: deck.declared_cards(),
            });
        }
        Ok(())
    }
}

/// Progress hook the driver calls once per finished trial. Trials run
/// on rayon workers, so implementations must be Sync.
pub trait SimObserver: Sync {
    fn trial_finished(&self) {}
}

/// Observer that ignores everything
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Per-spell simulation result
#[derive(Debug, Clone, Serialize)]
pub struct SpellOutcome {
    /// The cost as written in the input
    pub cost: String,
    /// Fraction of trials in which the cost was payable on each turn
    pub probability_by_turn: BTreeMap<u32, f64>,
}

impl SpellOutcome {
    pub fn probability(&self, turn: u32) -> f64 {
        self.probability_by_turn.get(&turn).copied().unwrap_or(0.0)
    }
}

fn build_deck(deck: &DeckSpec, deck_size: usize) -> Vec<Card> {
    let mut cards = Vec::with_capacity(deck_size);
    cards.extend(deck.lands.iter().cloned().map(Card::land));
    cards.extend(deck.cyclers.iter().cloned().map(Card::Cycler));
    cards.extend(deck.rocks.iter().cloned().map(Card::Rock));
    while cards.len() < deck_size {
        cards.push(Card::Blank);
    }
    cards
}

/// One full playout. Returns, per spell, the turns it was castable on.
pub fn run_trial(deck: &DeckSpec, settings: &SimSettings, seed: u64) -> Vec<Vec<bool>> {
    let cards = build_deck(deck, settings.deck_size);
    let mut state = TrialState::new(cards, settings.on_play, GameRng::new(Some(seed)));
    mulligan::draw_opening_hand(&mut state);

    let mut castable = vec![vec![false; settings.max_turn as usize]; deck.spells.len()];
    for turn in 1..=settings.max_turn {
        turns::take_turn(&mut state, &deck.spells);
        for (spell_idx, cost) in deck.spells.iter().enumerate() {
            if state.can_cast(cost) {
                castable[spell_idx][(turn - 1) as usize] = true;
            }
        }
    }
    castable
}

/// Run the full Monte Carlo simulation. Trial i always uses seed
/// `base_seed + i`, so a fixed seed gives bit-identical probabilities
/// no matter how rayon schedules the trials.
pub fn run_simulation(
    deck: &DeckSpec,
    settings: &SimSettings,
    seed: Option<u64>,
    observer: &dyn SimObserver,
) -> Result<Vec<SpellOutcome>, ConfigError> {
    settings.validate(deck)?;
    let base_seed = seed.unwrap_or_else(|| GameRng::new(None).seed());

    let records: Vec<Vec<Vec<bool>>> = (0..settings.cycles)
        .into_par_iter()
        .map(|i| {
            let record = run_trial(deck, settings, base_seed.wrapping_add(i as u64));
            observer.trial_finished();
            record
        })
        .collect();

    let mut counts = vec![vec![0usize; settings.max_turn as usize]; deck.spells.len()];
    for record in &records {
        for (spell_idx, turns_hit) in record.iter().enumerate() {
            for (turn_idx, &hit) in turns_hit.iter().enumerate() {
                if hit {
                    counts[spell_idx][turn_idx] += 1;
                }
            }
        }
    }

    Ok(deck
        .spells
        .iter()
        .enumerate()
        .map(|(spell_idx, cost)| {
            let probability_by_turn = (1..=settings.max_turn)
                .map(|turn| {
                    let hits = counts[spell_idx][(turn - 1) as usize];
                    (turn, hits as f64 / settings.cycles as f64)
                })
                .collect();
            SpellOutcome {
                cost: cost.text().to_string(),
                probability_by_turn,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{LandKind, ManaProduction};

    fn basics(color: &str, count: usize) -> Vec<Land> {
        (0..count)
            .map(|_| {
                Land::new(LandKind::Basic, ManaProduction::parse(color).unwrap()).unwrap()
            })
            .collect()
    }

    fn spec(lands: Vec<Land>, spells: &[&str]) -> DeckSpec {
        DeckSpec {
            lands,
            spells: spells.iter().map(|s| ManaCost::parse(s).unwrap()).collect(),
            cyclers: Vec::new(),
            rocks: Vec::new(),
        }
    }

    #[test]
    fn test_validation_catches_bad_settings() {
        let deck = spec(basics("W", 24), &["2W"]);
        let ok = SimSettings::default();
        assert!(ok.validate(&deck).is_ok());

        let no_spells = spec(basics("W", 24), &[]);
        assert_eq!(ok.validate(&no_spells), Err(ConfigError::NoSpells));

        let no_lands = spec(Vec::new(), &["2W"]);
        assert_eq!(ok.validate(&no_lands), Err(ConfigError::NoLands));

        let tiny = SimSettings {
            deck_size: 10,
            ..SimSettings::default()
        };
        assert_eq!(
            tiny.validate(&deck),
            Err(ConfigError::DeckTooSmall {
                deck_size: 10,
                declared: 24
            })
        );

        let zero = SimSettings {
            cycles: 0,
            ..SimSettings::default()
        };
        assert_eq!(zero.validate(&deck), Err(ConfigError::ZeroCycles));
    }

    #[test]
    fn test_same_seed_same_probabilities() {
        let deck = spec(basics("W", 24), &["1W"]);
        let settings = SimSettings {
            cycles: 200,
            max_turn: 4,
            ..SimSettings::default()
        };
        let first = run_simulation(&deck, &settings, Some(42), &NoopObserver).unwrap();
        let second = run_simulation(&deck, &settings, Some(42), &NoopObserver).unwrap();
        assert_eq!(
            first[0].probability_by_turn, second[0].probability_by_turn,
            "fixed seed must be bit-exact"
        );
    }

    #[test]
    fn test_probabilities_in_unit_range() {
        let deck = spec(basics("W", 24), &["1W", "4WW"]);
        let settings = SimSettings {
            cycles: 100,
            max_turn: 6,
            ..SimSettings::default()
        };
        let outcomes = run_simulation(&deck, &settings, Some(7), &NoopObserver).unwrap();
        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert_eq!(outcome.probability_by_turn.len(), 6);
            for (&turn, &p) in &outcome.probability_by_turn {
                assert!((0.0..=1.0).contains(&p), "turn {}: {}", turn, p);
            }
        }
    }

    #[test]
    fn test_observer_called_once_per_trial() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counter(AtomicUsize);
        impl SimObserver for Counter {
            fn trial_finished(&self) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }

        let deck = spec(basics("W", 24), &["W"]);
        let settings = SimSettings {
            cycles: 50,
            max_turn: 2,
            ..SimSettings::default()
        };
        let counter = Counter(AtomicUsize::new(0));
        run_simulation(&deck, &settings, Some(1), &counter).unwrap();
        assert_eq!(counter.0.load(Ordering::Relaxed), 50);
    }

    #[test]
    fn test_trial_keeps_cards_conserved() {
        let mut deck = spec(basics("W", 20), &["2W"]);
        deck.cyclers = vec![
            Cycler::new(ManaProduction::parse("W").unwrap(), 2).unwrap();
            4
        ];
        let settings = SimSettings {
            cycles: 1,
            max_turn: 8,
            ..SimSettings::default()
        };

        // replay a trial by hand to watch the invariant each turn
        let cards = build_deck(&deck, settings.deck_size);
        let mut state = TrialState::new(cards, true, GameRng::new(Some(5)));
        mulligan::draw_opening_hand(&mut state);
        assert_eq!(state.total_cards(), settings.deck_size);
        for _ in 1..=settings.max_turn {
            turns::take_turn(&mut state, &deck.spells);
            assert_eq!(state.total_cards(), settings.deck_size);
        }
    }
}
