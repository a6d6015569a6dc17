use crate::card::{Color, ColorSet, Cycler, Land, LandKind, ManaCost, Rock};
use crate::game::{lands, mana};
use crate::rng::GameRng;

/// A card in the trial's deck or hand. `Blank` stands in for the
/// non-mana cards padding the deck out to its full size.
#[derive(Debug, Clone)]
pub enum Card {
    Land { land: Land, locked: Option<Color> },
    Cycler(Cycler),
    Rock(Rock),
    Blank,
}

impl Card {
    pub fn land(land: Land) -> Card {
        Card::Land { land, locked: None }
    }

    pub fn is_land(&self) -> bool {
        matches!(self, Card::Land { .. })
    }

    /// The colors this card could eventually yield, if any
    pub fn producible(&self) -> Option<ColorSet> {
        match self {
            Card::Land { land, .. } => Some(land.production.all_colors()),
            Card::Cycler(cycler) => Some(cycler.production.all_colors()),
            Card::Rock(rock) => Some(rock.production.all_colors()),
            Card::Blank => None,
        }
    }
}

/// A land on the battlefield with its per-entry state
#[derive(Debug, Clone)]
pub struct LandInPlay {
    pub land: Land,
    pub locked: Option<Color>,
    pub entered_tapped: bool,
    pub turn_entered: u32,
    /// Consumed paying a rock's casting cost this turn
    pub spent: bool,
}

/// A mana rock on the battlefield
#[derive(Debug, Clone)]
pub struct RockInPlay {
    pub rock: Rock,
    pub spent: bool,
}

/// Which in-play card a mana unit came from, for marking units
/// consumed by a rock's casting cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitOwner {
    Land(usize),
    Rock(usize),
}

/// One simulated playout's entire mutable state. Nothing here is
/// shared across trials.
#[derive(Clone)]
pub struct TrialState {
    /// Live deck; the top of the deck is the end of the vec
    pub deck: Vec<Card>,
    pub hand: Vec<Card>,
    pub lands: Vec<LandInPlay>,
    pub rocks: Vec<RockInPlay>,
    /// Cards that left the game: cycled-away cyclers and the basics
    /// merged into the fetch land that pulled them. Keeps the card
    /// count conserved for sanity checks.
    pub removed: Vec<Card>,
    pub turn: u32,
    pub on_play: bool,
    pub played_land_this_turn: bool,
    pub mulligans: u32,
    pub rng: GameRng,
}

impl TrialState {
    /// Shuffle the given deck and start at turn 0 with an empty hand.
    /// The opening hand (and its mulligans) is drawn by the caller.
    pub fn new(mut deck: Vec<Card>, on_play: bool, mut rng: GameRng) -> Self {
        rng.shuffle(&mut deck);
        TrialState {
            deck,
            hand: Vec::new(),
            lands: Vec::new(),
            rocks: Vec::new(),
            removed: Vec::new(),
            turn: 0,
            on_play,
            played_land_this_turn: false,
            mulligans: 0,
            rng,
        }
    }

    pub fn draw_card(&mut self) {
        if let Some(card) = self.deck.pop() {
            self.hand.push(card);
        }
    }

    /// Advance to the next turn: reset per-turn flags and draw
    /// (the first turn's draw is skipped on the play)
    pub fn begin_turn(&mut self) {
        self.turn += 1;
        self.played_land_this_turn = false;
        for entry in &mut self.lands {
            entry.spent = false;
        }
        for rock in &mut self.rocks {
            rock.spent = false;
        }
        if !(self.on_play && self.turn == 1) {
            self.draw_card();
        }
    }

    /// How many basics of this color are still in the deck
    pub fn basics_left(&self, color: Color) -> usize {
        self.deck
            .iter()
            .filter(|card| {
                matches!(card, Card::Land { land, .. }
                    if land.kind == LandKind::Basic && land.production.has_color(color))
            })
            .count()
    }

    /// Remove one basic of this color from the deck, if any remains
    pub fn take_basic_from_deck(&mut self, color: Color) -> Option<Card> {
        let pos = self.deck.iter().position(|card| {
            matches!(card, Card::Land { land, .. }
                if land.kind == LandKind::Basic && land.production.has_color(color))
        })?;
        Some(self.deck.remove(pos))
    }

    /// Union of production colors across in-play lands that can
    /// unlock a verge's second color
    fn verge_feed(&self) -> ColorSet {
        self.lands
            .iter()
            .filter(|entry| entry.land.kind.feeds_verge())
            .fold(ColorSet::new(), |acc, entry| {
                acc.union(entry.land.production.all_colors())
            })
    }

    /// Union of colors granted to every unit by in-play filter rocks
    fn filter_colors(&self) -> ColorSet {
        self.rocks
            .iter()
            .filter(|rock| rock.rock.filter)
            .fold(ColorSet::new(), |acc, rock| {
                acc.union(rock.rock.production.all_colors())
            })
    }

    fn land_unit(&self, entry: &LandInPlay, verge_feed: ColorSet) -> Option<ColorSet> {
        if entry.spent {
            return None;
        }
        if entry.entered_tapped && entry.turn_entered == self.turn {
            return None;
        }
        let colors = lands::producible_colors(&entry.land, entry.locked, verge_feed);
        if colors.is_empty() {
            None
        } else {
            Some(colors)
        }
    }

    /// Every currently usable mana unit on the board, one per usable
    /// land and non-filter rock, with filter colors folded in
    pub fn mana_units(&self) -> (Vec<ColorSet>, Vec<UnitOwner>) {
        let feed = self.verge_feed();
        let mut units = Vec::with_capacity(self.lands.len() + self.rocks.len());
        let mut owners = Vec::with_capacity(units.capacity());

        for (idx, entry) in self.lands.iter().enumerate() {
            if let Some(colors) = self.land_unit(entry, feed) {
                units.push(colors);
                owners.push(UnitOwner::Land(idx));
            }
        }
        for (idx, rock) in self.rocks.iter().enumerate() {
            if rock.rock.filter || rock.spent {
                continue;
            }
            units.push(rock.rock.production.all_colors());
            owners.push(UnitOwner::Rock(idx));
        }

        let filters = self.filter_colors();
        if !filters.is_empty() {
            for unit in &mut units {
                *unit = unit.union(filters);
            }
        }
        (units, owners)
    }

    /// The unit list as it would look right after playing the given
    /// land this turn. Pure: the real board is untouched.
    pub fn hypothetical_units(&self, land: &Land, locked: Option<Color>) -> Vec<ColorSet> {
        let mut feed = self.verge_feed();
        if land.kind.feeds_verge() {
            feed = feed.union(land.production.all_colors());
        }

        let mut units = Vec::with_capacity(self.lands.len() + self.rocks.len() + 1);
        for entry in self.lands.iter() {
            if let Some(colors) = self.land_unit(entry, feed) {
                units.push(colors);
            }
        }
        if !lands::enters_tapped(land, self.lands.len(), self.turn) {
            let colors = lands::producible_colors(land, locked, feed);
            if !colors.is_empty() {
                units.push(colors);
            }
        }
        for rock in self.rocks.iter() {
            if rock.rock.filter || rock.spent {
                continue;
            }
            units.push(rock.rock.production.all_colors());
        }

        let filters = self.filter_colors();
        if !filters.is_empty() {
            for unit in &mut units {
                *unit = unit.union(filters);
            }
        }
        units
    }

    pub fn can_cast(&self, cost: &ManaCost) -> bool {
        let (units, _) = self.mana_units();
        mana::can_pay(cost, &units)
    }

    /// Would playing this land let any tracked cost be paid this turn?
    pub fn would_enable_cast(&self, land: &Land, locked: Option<Color>, costs: &[ManaCost]) -> bool {
        let units = self.hypothetical_units(land, locked);
        costs.iter().any(|cost| mana::can_pay(cost, &units))
    }

    /// Move a hand card onto the battlefield as this turn's land drop.
    /// Fetch kinds immediately pull a basic of their locked color out
    /// of the deck (merged into the land) and reshuffle.
    pub fn put_land_into_play(&mut self, hand_idx: usize) {
        let card = self.hand.remove(hand_idx);
        let (land, locked) = match card {
            Card::Land { land, locked } => (land, locked),
            other => {
                // not a land; put it back rather than lose it
                self.hand.insert(hand_idx, other);
                return;
            }
        };

        let tapped = lands::enters_tapped(&land, self.lands.len(), self.turn);
        let fetch = if land.kind.fetches() { locked } else { None };
        self.lands.push(LandInPlay {
            land,
            locked,
            entered_tapped: tapped,
            turn_entered: self.turn,
            spent: false,
        });
        self.played_land_this_turn = true;

        if let Some(color) = fetch {
            if let Some(basic) = self.take_basic_from_deck(color) {
                self.removed.push(basic);
                self.rng.shuffle(&mut self.deck);
            }
        }
    }

    /// Total cards accounted for across every zone; constant for the
    /// lifetime of a trial
    pub fn total_cards(&self) -> usize {
        self.deck.len() + self.hand.len() + self.lands.len() + self.rocks.len() + self.removed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::ManaProduction;

    fn land(kind: LandKind, production: &str) -> Land {
        Land::new(kind, ManaProduction::parse(production).unwrap()).unwrap()
    }

    fn state_with_deck(deck: Vec<Card>) -> TrialState {
        TrialState::new(deck, true, GameRng::new(Some(7)))
    }

    fn play(state: &mut TrialState, kind: LandKind, production: &str) {
        state.hand.push(Card::land(land(kind, production)));
        state.put_land_into_play(state.hand.len() - 1);
    }

    #[test]
    fn test_begin_turn_draws_except_first_on_play() {
        let deck = vec![Card::Blank; 10];
        let mut state = state_with_deck(deck);
        state.begin_turn();
        assert_eq!(state.hand.len(), 0, "no draw on turn 1 on the play");
        state.begin_turn();
        assert_eq!(state.hand.len(), 1);

        let mut on_draw = TrialState::new(vec![Card::Blank; 10], false, GameRng::new(Some(7)));
        on_draw.begin_turn();
        assert_eq!(on_draw.hand.len(), 1, "draws on turn 1 on the draw");
    }

    #[test]
    fn test_untapped_land_usable_same_turn() {
        let mut state = state_with_deck(vec![]);
        state.begin_turn();
        play(&mut state, LandKind::Basic, "W");
        assert!(state.can_cast(&ManaCost::parse("W").unwrap()));
        assert!(!state.can_cast(&ManaCost::parse("WW").unwrap()));
    }

    #[test]
    fn test_tapped_land_unusable_until_next_turn() {
        let mut state = state_with_deck(vec![]);
        state.begin_turn();
        play(&mut state, LandKind::Tapped, "W");
        assert!(!state.can_cast(&ManaCost::parse("W").unwrap()));

        state.begin_turn();
        assert!(state.can_cast(&ManaCost::parse("W").unwrap()));
    }

    #[test]
    fn test_verge_feed_built_from_board() {
        let mut state = state_with_deck(vec![]);
        state.begin_turn();
        play(&mut state, LandKind::Verge, "WR");
        assert!(!state.can_cast(&ManaCost::parse("R").unwrap()));

        state.begin_turn();
        play(&mut state, LandKind::Untapped, "WU");
        assert!(state.can_cast(&ManaCost::parse("R").unwrap()));
    }

    #[test]
    fn test_hypothetical_play_does_not_mutate() {
        let mut state = state_with_deck(vec![]);
        state.begin_turn();
        play(&mut state, LandKind::Basic, "W");

        let candidate = land(LandKind::Basic, "W");
        let cost = ManaCost::parse("WW").unwrap();
        assert!(state.would_enable_cast(&candidate, None, std::slice::from_ref(&cost)));
        assert_eq!(state.lands.len(), 1);
        assert!(!state.can_cast(&cost));
    }

    #[test]
    fn test_hypothetical_tapped_land_adds_nothing() {
        let mut state = state_with_deck(vec![]);
        state.begin_turn();
        let candidate = land(LandKind::Tapped, "W");
        let cost = ManaCost::parse("W").unwrap();
        assert!(!state.would_enable_cast(&candidate, None, std::slice::from_ref(&cost)));
    }

    #[test]
    fn test_fetch_merges_basic_and_conserves_cards() {
        let deck = vec![
            Card::land(land(LandKind::Basic, "R")),
            Card::Blank,
            Card::Blank,
        ];
        let mut state = state_with_deck(deck);
        let before = state.total_cards() + 1; // plus the wilds we add to hand
        state.begin_turn();

        state.hand.push(Card::Land {
            land: land(LandKind::Wilds, "WUBRG"),
            locked: Some(Color::Red),
        });
        state.put_land_into_play(state.hand.len() - 1);

        assert_eq!(state.lands.len(), 1);
        assert_eq!(state.removed.len(), 1, "fetched basic leaves the deck");
        assert_eq!(state.basics_left(Color::Red), 0);
        assert_eq!(state.total_cards(), before);
    }

    #[test]
    fn test_fetch_with_no_basic_is_a_noop() {
        let mut state = state_with_deck(vec![Card::Blank; 3]);
        state.begin_turn();
        state.hand.push(Card::Land {
            land: land(LandKind::Wilds, "WUBRG"),
            locked: Some(Color::Red),
        });
        state.put_land_into_play(state.hand.len() - 1);
        assert!(state.removed.is_empty());
        assert_eq!(state.lands.len(), 1);
    }

    #[test]
    fn test_filter_rock_extends_every_unit() {
        let mut state = state_with_deck(vec![]);
        state.begin_turn();
        play(&mut state, LandKind::Basic, "W");
        state.begin_turn();
        play(&mut state, LandKind::Basic, "W");

        assert!(!state.can_cast(&ManaCost::parse("U").unwrap()));

        let filter = Rock::new(
            ManaCost::parse("1").unwrap(),
            ManaProduction::parse("WUBRG").unwrap(),
            true,
        )
        .unwrap();
        state.rocks.push(RockInPlay {
            rock: filter,
            spent: false,
        });

        // filter adds no unit of its own, but either land can now pay U
        assert!(state.can_cast(&ManaCost::parse("UU").unwrap()));
        assert!(!state.can_cast(&ManaCost::parse("UUU").unwrap()));
    }

    #[test]
    fn test_spent_units_excluded() {
        let mut state = state_with_deck(vec![]);
        state.begin_turn();
        play(&mut state, LandKind::Basic, "W");
        state.begin_turn();
        play(&mut state, LandKind::Basic, "W");
        state.lands[0].spent = true;

        assert!(!state.can_cast(&ManaCost::parse("WW").unwrap()));
        state.begin_turn();
        assert!(state.can_cast(&ManaCost::parse("WW").unwrap()));
    }
}
