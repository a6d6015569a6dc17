use crate::game::state::{Card, TrialState};

const HAND_SIZE: usize = 7;

/// Count the lands in a hand
fn count_lands(hand: &[Card]) -> usize {
    hand.iter().filter(|card| card.is_land()).count()
}

/// Decide whether to throw a fresh 7-card hand back.
/// The first two looks reject the extremes (0-1 or 6-7 lands), the
/// third only the hopeless ones (no lands, or nothing but), and after
/// that anything is kept.
pub fn should_mulligan(hand: &[Card], mulligan_count: u32) -> bool {
    let lands = count_lands(hand);
    match mulligan_count {
        0 | 1 => lands <= 1 || lands >= 6,
        2 => lands == 0 || lands == hand.len(),
        _ => false,
    }
}

/// Draw the opening hand, mulliganing London-style: every redraw is a
/// full 7, then as many cards go to the bottom of the deck as
/// mulligans were taken. Non-lands are bottomed first, at random;
/// lands only when nothing else is left.
pub fn draw_opening_hand(state: &mut TrialState) {
    for _ in 0..HAND_SIZE {
        state.draw_card();
    }

    let mut mulligans = 0;
    while should_mulligan(&state.hand, mulligans) {
        let returned: Vec<Card> = state.hand.drain(..).collect();
        state.deck.extend(returned);
        state.rng.shuffle(&mut state.deck);
        for _ in 0..HAND_SIZE {
            state.draw_card();
        }
        mulligans += 1;
    }
    state.mulligans = mulligans;

    for _ in 0..mulligans {
        if state.hand.is_empty() {
            break;
        }
        let non_lands: Vec<usize> = state
            .hand
            .iter()
            .enumerate()
            .filter(|(_, card)| !card.is_land())
            .map(|(idx, _)| idx)
            .collect();
        let victim = if non_lands.is_empty() {
            state.rng.random_range(state.hand.len())
        } else {
            *state.rng.pick(&non_lands)
        };
        let card = state.hand.remove(victim);
        // bottom of the deck; we draw from the other end
        state.deck.insert(0, card);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Land, LandKind, ManaProduction};
    use crate::rng::GameRng;

    fn basic(color: &str) -> Card {
        Card::land(Land::new(LandKind::Basic, ManaProduction::parse(color).unwrap()).unwrap())
    }

    fn hand_with_lands(lands: usize) -> Vec<Card> {
        let mut hand = Vec::new();
        for _ in 0..lands {
            hand.push(basic("W"));
        }
        while hand.len() < HAND_SIZE {
            hand.push(Card::Blank);
        }
        hand
    }

    #[test]
    fn test_first_look_rejects_extremes() {
        assert!(should_mulligan(&hand_with_lands(0), 0));
        assert!(should_mulligan(&hand_with_lands(1), 0));
        assert!(!should_mulligan(&hand_with_lands(2), 0));
        assert!(!should_mulligan(&hand_with_lands(5), 0));
        assert!(should_mulligan(&hand_with_lands(6), 0));
        assert!(should_mulligan(&hand_with_lands(7), 0));
    }

    #[test]
    fn test_third_look_keeps_all_but_hopeless() {
        assert!(should_mulligan(&hand_with_lands(0), 2));
        assert!(!should_mulligan(&hand_with_lands(1), 2));
        assert!(!should_mulligan(&hand_with_lands(6), 2));
        assert!(should_mulligan(&hand_with_lands(7), 2));
    }

    #[test]
    fn test_fourth_look_always_keeps() {
        assert!(!should_mulligan(&hand_with_lands(0), 3));
        assert!(!should_mulligan(&hand_with_lands(7), 5));
    }

    #[test]
    fn test_all_land_deck_settles_after_three_mulligans() {
        // every hand is 7 lands: looks 0, 1 and 2 all reject, then keep
        let deck: Vec<Card> = (0..60).map(|_| basic("W")).collect();
        let mut state = TrialState::new(deck, true, GameRng::new(Some(9)));
        draw_opening_hand(&mut state);

        assert_eq!(state.mulligans, 3);
        assert_eq!(state.hand.len(), HAND_SIZE - 3);
        assert_eq!(state.deck.len(), 60 - state.hand.len());
    }

    #[test]
    fn test_balanced_deck_usually_keeps_seven() {
        let mut deck: Vec<Card> = (0..24).map(|_| basic("W")).collect();
        deck.extend((0..36).map(|_| Card::Blank));
        let mut keeps_at_seven = 0;
        for seed in 0..50 {
            let mut state = TrialState::new(deck.clone(), true, GameRng::new(Some(seed)));
            draw_opening_hand(&mut state);
            assert_eq!(state.hand.len() + state.mulligans as usize, HAND_SIZE);
            if state.mulligans == 0 {
                keeps_at_seven += 1;
            }
        }
        assert!(
            keeps_at_seven > 35,
            "a 24-land deck should keep most openers, kept {}/50",
            keeps_at_seven
        );
    }

    #[test]
    fn test_bottoming_prefers_non_lands() {
        // force exactly one mulligan by rigging the hand afterwards is
        // fiddly; instead check the invariant across many seeds: after
        // bottoming, hand land ratio never suffers while non-lands remain
        let mut deck: Vec<Card> = (0..6).map(|_| basic("W")).collect();
        deck.extend((0..54).map(|_| Card::Blank));
        for seed in 0..50 {
            let mut state = TrialState::new(deck.clone(), true, GameRng::new(Some(seed)));
            draw_opening_hand(&mut state);
            if state.mulligans > 0 && count_lands(&state.hand) > 0 {
                // lands were never bottomed while blanks were available
                let blanks_bottomed = state.deck[..state.mulligans as usize]
                    .iter()
                    .filter(|c| !c.is_land())
                    .count();
                let lands_bottomed = state.mulligans as usize - blanks_bottomed;
                if blanks_bottomed < state.mulligans as usize {
                    // only possible if the hand ran out of non-lands
                    assert_eq!(
                        state.hand.iter().filter(|c| !c.is_land()).count(),
                        0,
                        "seed {}: bottomed {} lands with non-lands still in hand",
                        seed,
                        lands_bottomed
                    );
                }
            }
        }
    }

    #[test]
    fn test_card_conservation_through_mulligans() {
        let mut deck: Vec<Card> = (0..20).map(|_| basic("W")).collect();
        deck.extend((0..40).map(|_| Card::Blank));
        for seed in 0..20 {
            let mut state = TrialState::new(deck.clone(), true, GameRng::new(Some(seed)));
            draw_opening_hand(&mut state);
            assert_eq!(state.total_cards(), 60);
        }
    }
}
