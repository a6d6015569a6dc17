use crate::card::{ColorSet, ManaCost};

/// Payability over a list of mana units.
///
/// Each unit is the color set one usable source can produce right now;
/// a unit pays for exactly one mana. The allocation is greedy with no
/// backtracking, in a fixed order the whole simulator depends on:
/// fixed colored requirements first (in the cost's own color order,
/// claiming units in source order), then hybrid components in listing
/// order, then generic from whatever is left. An unmet hybrid never
/// fails outright; it degrades into extra generic.
///
/// This can under-report payability for adversarial color mixes. It is
/// intentionally not a maximum-matching solver.
pub fn can_pay(cost: &ManaCost, units: &[ColorSet]) -> bool {
    claim_units(cost, units).is_some()
}

/// Like `can_pay`, but returns the indices of the units the payment
/// consumes (colored and hybrid claims in claim order, then the
/// lowest-index leftovers for generic). None if the cost is unpayable.
pub fn claim_units(cost: &ManaCost, units: &[ColorSet]) -> Option<Vec<usize>> {
    let mut claimed = vec![false; units.len()];
    let mut picks = Vec::new();

    // fixed colored requirements, fail fast if any color runs short
    for &(color, count) in &cost.colored {
        let mut found = 0;
        for (idx, unit) in units.iter().enumerate() {
            if claimed[idx] || !unit.contains(color) {
                continue;
            }
            claimed[idx] = true;
            picks.push(idx);
            found += 1;
            if found == count {
                break;
            }
        }
        if found < count {
            return None;
        }
    }

    // hybrids: first matching unit, else degrade to generic
    let mut generic = cost.generic;
    for hybrid in &cost.hybrid {
        let matched = units
            .iter()
            .enumerate()
            .find(|(idx, unit)| !claimed[*idx] && hybrid.matches(**unit));
        match matched {
            Some((idx, _)) => {
                claimed[idx] = true;
                picks.push(idx);
            }
            None => generic += hybrid.generic_fallback(),
        }
    }

    // generic takes anything still unclaimed
    for idx in 0..units.len() {
        if generic == 0 {
            break;
        }
        if claimed[idx] {
            continue;
        }
        claimed[idx] = true;
        picks.push(idx);
        generic -= 1;
    }

    if generic > 0 {
        return None;
    }
    Some(picks)
}
