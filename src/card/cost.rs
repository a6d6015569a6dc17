use crate::card::types::{Color, ColorSet, NotationError};
use std::fmt;
use std::str::FromStr;

/// A hybrid cost component: one unit payable in more than one way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HybridCost {
    /// `{N/C}`: either N generic mana or one mana of the color
    GenericOr { amount: u32, color: Color },
    /// `{C/C}`: one mana of either color
    EitherOr(Color, Color),
}

impl HybridCost {
    /// Whether a single mana unit with the given colors can cover this component
    pub fn matches(&self, unit: ColorSet) -> bool {
        match self {
            HybridCost::GenericOr { color, .. } => unit.contains(*color),
            HybridCost::EitherOr(a, b) => unit.contains(*a) || unit.contains(*b),
        }
    }

    /// Extra generic mana owed when no unit covers this component.
    /// One unit was already budgeted for the component, hence amount - 1.
    pub fn generic_fallback(&self) -> u32 {
        match self {
            HybridCost::GenericOr { amount, .. } => amount.saturating_sub(1),
            HybridCost::EitherOr(..) => 0,
        }
    }

    /// The colors this component can be paid with
    pub fn colors(&self) -> ColorSet {
        match self {
            HybridCost::GenericOr { color, .. } => ColorSet::singleton(*color),
            HybridCost::EitherOr(a, b) => ColorSet::singleton(*a).union(ColorSet::singleton(*b)),
        }
    }
}

/// The mana cost of a spell
///
/// Notation: bare digits are generic (`2G` = 2 generic + one green), a
/// braced number is generic too (`{3}WU`), `{3/R}` is 3 generic OR one
/// red, `{W/U}` is one white OR one blue. Colored requirements keep
/// first-seen order, which the matcher relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManaCost {
    text: String,
    pub generic: u32,
    pub colored: Vec<(Color, u32)>,
    pub hybrid: Vec<HybridCost>,
}

impl ManaCost {
    /// Parse compact cost notation
    pub fn parse(input: &str) -> Result<Self, NotationError> {
        let chars: Vec<char> = input.chars().collect();
        let mut cost = ManaCost {
            text: input.to_string(),
            generic: 0,
            colored: Vec::new(),
            hybrid: Vec::new(),
        };
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '{' => {
                    let close = chars[i + 1..]
                        .iter()
                        .position(|&c| c == '}')
                        .map(|p| p + i + 1)
                        .ok_or_else(|| NotationError::Unbalanced(input.to_string()))?;
                    let content: String = chars[i + 1..close].iter().collect();
                    if content.is_empty() {
                        return Err(NotationError::EmptyGroup(input.to_string()));
                    }
                    if content.contains('/') {
                        cost.hybrid.push(parse_hybrid(&content)?);
                    } else if let Ok(amount) = content.parse::<u32>() {
                        cost.generic += amount;
                    } else {
                        return Err(NotationError::MalformedGroup(content));
                    }
                    i = close + 1;
                }
                '}' => return Err(NotationError::Unbalanced(input.to_string())),
                c if c.is_ascii_digit() => {
                    let mut end = i;
                    while end < chars.len() && chars[end].is_ascii_digit() {
                        end += 1;
                    }
                    let number: String = chars[i..end].iter().collect();
                    cost.generic += number
                        .parse::<u32>()
                        .map_err(|_| NotationError::MalformedGroup(number.clone()))?;
                    i = end;
                }
                c => {
                    let color = Color::from_char(c).ok_or(NotationError::UnknownSymbol(c))?;
                    cost.bump_colored(color);
                    i += 1;
                }
            }
        }

        Ok(cost)
    }

    fn bump_colored(&mut self, color: Color) {
        if let Some(entry) = self.colored.iter_mut().find(|(c, _)| *c == color) {
            entry.1 += 1;
        } else {
            self.colored.push((color, 1));
        }
    }

    /// The original notation, kept for display only
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Minimum total mana units this cost can ever need
    pub fn total_mana_needed(&self) -> u32 {
        let colored: u32 = self.colored.iter().map(|(_, n)| n).sum();
        self.generic + colored + self.hybrid.len() as u32
    }

    /// Every color this cost can make use of (fixed and hybrid)
    pub fn color_set(&self) -> ColorSet {
        let mut set = ColorSet::new();
        for (color, _) in &self.colored {
            set.insert(*color);
        }
        for hybrid in &self.hybrid {
            set = set.union(hybrid.colors());
        }
        set
    }

    /// Whether this cost has any use for the given color
    pub fn requires_color(&self, color: Color) -> bool {
        self.color_set().contains(color)
    }
}

fn parse_hybrid(content: &str) -> Result<HybridCost, NotationError> {
    let parts: Vec<&str> = content.split('/').collect();
    if parts.len() != 2 {
        return Err(NotationError::MalformedGroup(content.to_string()));
    }

    let single_color = |part: &str| -> Result<Color, NotationError> {
        let mut it = part.chars();
        match (it.next(), it.next()) {
            (Some(c), None) => Color::from_char(c).ok_or(NotationError::UnknownSymbol(c)),
            _ => Err(NotationError::MalformedGroup(content.to_string())),
        }
    };

    if let Ok(amount) = parts[0].parse::<u32>() {
        Ok(HybridCost::GenericOr {
            amount,
            color: single_color(parts[1])?,
        })
    } else {
        Ok(HybridCost::EitherOr(
            single_color(parts[0])?,
            single_color(parts[1])?,
        ))
    }
}

impl FromStr for ManaCost {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ManaCost::parse(s)
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_only() {
        let cost = ManaCost::parse("3").unwrap();
        assert_eq!(cost.generic, 3);
        assert!(cost.colored.is_empty());
        assert!(cost.hybrid.is_empty());
    }

    #[test]
    fn test_colored_only() {
        let cost = ManaCost::parse("WUB").unwrap();
        assert_eq!(cost.generic, 0);
        assert_eq!(
            cost.colored,
            vec![(Color::White, 1), (Color::Blue, 1), (Color::Black, 1)]
        );
    }

    #[test]
    fn test_mixed_cost() {
        let cost = ManaCost::parse("2WU").unwrap();
        assert_eq!(cost.generic, 2);
        assert_eq!(cost.colored, vec![(Color::White, 1), (Color::Blue, 1)]);
        assert_eq!(cost.total_mana_needed(), 4);
    }

    #[test]
    fn test_bracketed_generic() {
        let cost = ManaCost::parse("{3}WU").unwrap();
        assert_eq!(cost.generic, 3);
        assert_eq!(cost.colored.len(), 2);
    }

    #[test]
    fn test_multi_digit_generic() {
        let cost = ManaCost::parse("12W").unwrap();
        assert_eq!(cost.generic, 12);
    }

    #[test]
    fn test_hybrid_generic_cost() {
        let cost = ManaCost::parse("{3/R}{3/W}").unwrap();
        assert_eq!(cost.generic, 0);
        assert!(cost.colored.is_empty());
        assert_eq!(
            cost.hybrid,
            vec![
                HybridCost::GenericOr {
                    amount: 3,
                    color: Color::Red
                },
                HybridCost::GenericOr {
                    amount: 3,
                    color: Color::White
                },
            ]
        );
        assert_eq!(cost.total_mana_needed(), 2);
    }

    #[test]
    fn test_hybrid_either_or() {
        let cost = ManaCost::parse("{W/U}B").unwrap();
        assert_eq!(cost.hybrid, vec![HybridCost::EitherOr(Color::White, Color::Blue)]);
        assert_eq!(cost.colored, vec![(Color::Black, 1)]);
        assert_eq!(cost.total_mana_needed(), 2);
    }

    #[test]
    fn test_multiple_same_color() {
        let cost = ManaCost::parse("WWW").unwrap();
        assert_eq!(cost.colored, vec![(Color::White, 3)]);
        assert_eq!(cost.generic, 0);
    }

    #[test]
    fn test_color_set_includes_hybrids() {
        let cost = ManaCost::parse("{3/R}W").unwrap();
        assert!(cost.requires_color(Color::Red));
        assert!(cost.requires_color(Color::White));
        assert!(!cost.requires_color(Color::Blue));
    }

    #[test]
    fn test_hybrid_fallback_amounts() {
        let gen = HybridCost::GenericOr {
            amount: 3,
            color: Color::Red,
        };
        assert_eq!(gen.generic_fallback(), 2);

        let zero = HybridCost::GenericOr {
            amount: 0,
            color: Color::Red,
        };
        assert_eq!(zero.generic_fallback(), 0);

        let either = HybridCost::EitherOr(Color::White, Color::Blue);
        assert_eq!(either.generic_fallback(), 0);
    }

    #[test]
    fn test_rejects_bad_notation() {
        assert!(ManaCost::parse("2X").is_err());
        assert!(ManaCost::parse("{2").is_err());
        assert!(ManaCost::parse("{}").is_err());
        assert!(ManaCost::parse("{W}").is_err());
        assert!(ManaCost::parse("{1/2/3}").is_err());
    }

    #[test]
    fn test_display_preserves_text() {
        let cost = ManaCost::parse("{3/R}{3/W}").unwrap();
        assert_eq!(cost.to_string(), "{3/R}{3/W}");
    }
}
