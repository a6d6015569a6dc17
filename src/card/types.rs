use crate::card::cost::ManaCost;
use crate::card::production::ManaProduction;
use std::fmt;
use thiserror::Error;

/// Mana colors in Magic: The Gathering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Colorless,
    ];

    /// Convert to the single character representation
    pub fn to_char(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Colorless => 'C',
        }
    }

    /// Parse from the single character representation
    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            'C' => Some(Color::Colorless),
            _ => None,
        }
    }

    fn bit(&self) -> u8 {
        match self {
            Color::White => 1 << 0,
            Color::Blue => 1 << 1,
            Color::Black => 1 << 2,
            Color::Red => 1 << 3,
            Color::Green => 1 << 4,
            Color::Colorless => 1 << 5,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A set of mana colors as bitflags (no allocations)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorSet(u8);

impl ColorSet {
    pub fn new() -> Self {
        ColorSet(0)
    }

    pub fn singleton(color: Color) -> Self {
        ColorSet(color.bit())
    }

    /// The full five-color set (no colorless)
    pub fn wubrg() -> Self {
        let mut set = ColorSet::new();
        for color in [Color::White, Color::Blue, Color::Black, Color::Red, Color::Green] {
            set.insert(color);
        }
        set
    }

    pub fn insert(&mut self, color: Color) {
        self.0 |= color.bit();
    }

    pub fn contains(&self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    pub fn union(&self, other: ColorSet) -> ColorSet {
        ColorSet(self.0 | other.0)
    }

    pub fn intersection(&self, other: ColorSet) -> ColorSet {
        ColorSet(self.0 & other.0)
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate contained colors in WUBRGC order
    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        Color::ALL.iter().copied().filter(|c| self.contains(*c))
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for color in self.iter() {
            write!(f, "{}", color)?;
        }
        Ok(())
    }
}

/// Errors in mana production / mana cost notation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotationError {
    #[error("unknown symbol '{0}' (expected one of W U B R G C)")]
    UnknownSymbol(char),
    #[error("unbalanced braces in '{0}'")]
    Unbalanced(String),
    #[error("empty braces in '{0}'")]
    EmptyGroup(String),
    #[error("malformed group '{{{0}}}'")]
    MalformedGroup(String),
    #[error("'{0}' contains no mana symbols")]
    Empty(String),
}

/// Structural constraint violations for a declared card
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("{kind} lands must produce exactly one color, got '{got}'")]
    WantSingleColor { kind: &'static str, got: String },
    #[error("verge lands must produce exactly two colors, got '{got}'")]
    WantTwoColors { got: String },
    #[error("{kind} lands must produce WUBRG, got '{got}'")]
    WantFiveColors { kind: &'static str, got: String },
    #[error("town lands must produce WUBRGC, got '{got}'")]
    WantSixColors { got: String },
    #[error("cyclers must produce exactly one color with no choice, got '{got}'")]
    CyclerColors { got: String },
    #[error("cycler threshold must be a positive integer")]
    CyclerThreshold,
    #[error("rocks must produce at least one color")]
    RockNoColors,
}

/// The closed set of land behaviors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandKind {
    /// Single color, always untapped, fetchable by wilds/fabled/cyclers
    Basic,
    /// Any colors, always untapped
    Untapped,
    /// Any colors, always enters tapped
    Tapped,
    /// Enters tapped once three or more other lands are in play
    Fast,
    /// Enters tapped while two or fewer other lands are in play
    Slow,
    /// Enters tapped from turn 4 on; locks to a single color choice
    Town,
    /// Two colors; the second is gated on the rest of the board
    Verge,
    /// Any color, locks to a single choice; deprioritized when sequencing
    Passage,
    /// Always tapped; locks to a basic type and fetches it from the deck
    Wilds,
    /// Like wilds, but untapped once three or more other lands are in play
    Fabled,
}

impl LandKind {
    /// Parse a land kind name as written in input files.
    /// Accepts the common aliases for the untapped/tapped catch-all kinds.
    pub fn parse(name: &str) -> Option<LandKind> {
        match name {
            "basic" => Some(LandKind::Basic),
            "untapped" | "shock" | "dual" | "fetch" => Some(LandKind::Untapped),
            "tapped" | "surveil" => Some(LandKind::Tapped),
            "fastland" | "fast" => Some(LandKind::Fast),
            "slowland" | "slow" => Some(LandKind::Slow),
            "town" | "startingtown" => Some(LandKind::Town),
            "verge" => Some(LandKind::Verge),
            "passage" | "multiversal" => Some(LandKind::Passage),
            "wilds" => Some(LandKind::Wilds),
            "fabled" => Some(LandKind::Fabled),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LandKind::Basic => "basic",
            LandKind::Untapped => "untapped",
            LandKind::Tapped => "tapped",
            LandKind::Fast => "fastland",
            LandKind::Slow => "slowland",
            LandKind::Town => "town",
            LandKind::Verge => "verge",
            LandKind::Passage => "passage",
            LandKind::Wilds => "wilds",
            LandKind::Fabled => "fabled",
        }
    }

    /// Whether this kind resolves its production to a single color choice,
    /// held for the rest of the trial once made
    pub fn locks_color(&self) -> bool {
        matches!(
            self,
            LandKind::Town | LandKind::Passage | LandKind::Wilds | LandKind::Fabled
        )
    }

    /// Whether playing this kind pulls a basic of the locked color out of the deck
    pub fn fetches(&self) -> bool {
        matches!(self, LandKind::Wilds | LandKind::Fabled)
    }

    /// Whether this kind satisfies a verge land's second-color condition
    pub fn feeds_verge(&self) -> bool {
        matches!(self, LandKind::Basic | LandKind::Untapped | LandKind::Tapped)
    }
}

/// An immutable land template. Per-trial state (color lock, entry tap)
/// lives on the trial's own copies, never here.
#[derive(Debug, Clone, PartialEq)]
pub struct Land {
    pub kind: LandKind,
    pub production: ManaProduction,
}

impl Land {
    /// Build a land, enforcing the kind's production constraint
    pub fn new(kind: LandKind, production: ManaProduction) -> Result<Self, CardError> {
        let colors = production.all_colors();
        match kind {
            LandKind::Basic => {
                if colors.len() != 1 {
                    return Err(CardError::WantSingleColor {
                        kind: kind.name(),
                        got: colors.to_string(),
                    });
                }
            }
            LandKind::Verge => {
                if colors.len() != 2 {
                    return Err(CardError::WantTwoColors {
                        got: colors.to_string(),
                    });
                }
            }
            LandKind::Passage | LandKind::Wilds | LandKind::Fabled => {
                if colors != ColorSet::wubrg() {
                    return Err(CardError::WantFiveColors {
                        kind: kind.name(),
                        got: colors.to_string(),
                    });
                }
            }
            LandKind::Town => {
                let mut all = ColorSet::wubrg();
                all.insert(Color::Colorless);
                if colors != all {
                    return Err(CardError::WantSixColors {
                        got: colors.to_string(),
                    });
                }
            }
            _ => {}
        }
        Ok(Land { kind, production })
    }
}

/// A landcycler: discards itself for a basic of its color once enough
/// lands are in play to cover the cycling cost
#[derive(Debug, Clone, PartialEq)]
pub struct Cycler {
    pub production: ManaProduction,
    /// In-play land count needed before cycling happens
    pub threshold: u32,
}

impl Cycler {
    pub fn new(production: ManaProduction, threshold: u32) -> Result<Self, CardError> {
        if production.all_colors().len() != 1 || production.options().len() != 1 {
            return Err(CardError::CyclerColors {
                got: production.all_colors().to_string(),
            });
        }
        if threshold == 0 {
            return Err(CardError::CyclerThreshold);
        }
        Ok(Cycler {
            production,
            threshold,
        })
    }

    /// The single basic type this cycler fetches
    pub fn color(&self) -> Color {
        self.production.colors_in_order()[0]
    }
}

/// A mana rock: cast for its own cost, then stays in play.
/// A plain rock adds one mana unit per turn; a filter rock adds no unit
/// but makes its colors available through every other unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Rock {
    pub cost: ManaCost,
    pub production: ManaProduction,
    pub filter: bool,
}

impl Rock {
    pub fn new(cost: ManaCost, production: ManaProduction, filter: bool) -> Result<Self, CardError> {
        if production.all_colors().is_empty() {
            return Err(CardError::RockNoColors);
        }
        Ok(Rock {
            cost,
            production,
            filter,
        })
    }
}
