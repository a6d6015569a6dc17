use crate::card::{Color, ColorSet, Land, LandKind};

/// Whether a land would enter play tapped, given the number of other
/// lands already in play and the current turn. Re-evaluated at the
/// moment the land is played; the result holds for that entry only.
pub fn enters_tapped(land: &Land, others_in_play: usize, turn: u32) -> bool {
    match land.kind {
        LandKind::Basic | LandKind::Untapped | LandKind::Verge | LandKind::Passage => false,
        LandKind::Tapped | LandKind::Wilds => true,
        LandKind::Fast => others_in_play >= 3,
        LandKind::Slow | LandKind::Fabled => others_in_play <= 2,
        LandKind::Town => turn >= 4,
    }
}

/// The colors a land can produce right now, ignoring entry tap and
/// spent-this-turn state (the trial layer screens those out first).
///
/// A locked land produces only its locked color; a lockable land whose
/// lock was deferred produces nothing yet. A verge gates its second
/// color on `verge_feed`: the union of production colors across every
/// basic/untapped/tapped land in play. Verges never feed each other,
/// so the caller can pass the whole-board union without excluding the
/// land being queried.
pub fn producible_colors(land: &Land, locked: Option<Color>, verge_feed: ColorSet) -> ColorSet {
    if let Some(color) = locked {
        return ColorSet::singleton(color);
    }
    if land.kind.locks_color() {
        return ColorSet::new();
    }
    if land.kind == LandKind::Verge {
        return verge_colors(land, verge_feed);
    }
    land.production.all_colors()
}

/// First listed color unconditionally; the second only once the board
/// feed shares one of the verge's two colors. Lands never leave play,
/// so the condition persists once met.
fn verge_colors(land: &Land, verge_feed: ColorSet) -> ColorSet {
    let ordered = land.production.colors_in_order();
    let mut available = ColorSet::singleton(ordered[0]);

    if !verge_feed.intersection(land.production.all_colors()).is_empty() {
        available.insert(ordered[1]);
    }
    available
}
