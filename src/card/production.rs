use crate::card::types::{Color, ColorSet, NotationError};
use std::str::FromStr;

/// The mana a land (or rock) can produce: an ordered list of options,
/// each option an ordered list of colors. A single-color option is
/// mandatory production; a multi-color option is a choice of one.
///
/// Notation: `W` single white, `WG` white and green, `W/G` or `{W/G}`
/// white or green, `{R/U}U` (red or blue) and blue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManaProduction {
    options: Vec<Vec<Color>>,
}

impl ManaProduction {
    /// Parse compact production notation. Fails on symbols outside the
    /// WUBRGC alphabet and on malformed braces.
    pub fn parse(input: &str) -> Result<Self, NotationError> {
        let chars: Vec<char> = input.chars().collect();
        let mut options: Vec<Vec<Color>> = Vec::new();
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
                        options.push(parse_choice(&content)?);
                    } else {
                        // every symbol in the group is mandatory
                        for c in content.chars() {
                            let color = Color::from_char(c)
                                .ok_or(NotationError::UnknownSymbol(c))?;
                            options.push(vec![color]);
                        }
                    }
                    i = close + 1;
                }
                '}' => return Err(NotationError::Unbalanced(input.to_string())),
                '/' => {
                    // bare slash extends the previous option into a choice
                    let next = chars
                        .get(i + 1)
                        .and_then(|&c| Color::from_char(c))
                        .ok_or_else(|| NotationError::MalformedGroup(input.to_string()))?;
                    let last = options
                        .last_mut()
                        .ok_or_else(|| NotationError::MalformedGroup(input.to_string()))?;
                    last.push(next);
                    i += 2;
                }
                c => {
                    let color = Color::from_char(c).ok_or(NotationError::UnknownSymbol(c))?;
                    options.push(vec![color]);
                    i += 1;
                }
            }
        }

        if options.is_empty() {
            return Err(NotationError::Empty(input.to_string()));
        }
        Ok(ManaProduction { options })
    }

    pub fn options(&self) -> &[Vec<Color>] {
        &self.options
    }

    /// Union of every option's colors
    pub fn all_colors(&self) -> ColorSet {
        let mut set = ColorSet::new();
        for option in &self.options {
            for &color in option {
                set.insert(color);
            }
        }
        set
    }

    /// All colors in first-seen order, without duplicates
    pub fn colors_in_order(&self) -> Vec<Color> {
        let mut seen = ColorSet::new();
        let mut ordered = Vec::new();
        for option in &self.options {
            for &color in option {
                if !seen.contains(color) {
                    seen.insert(color);
                    ordered.push(color);
                }
            }
        }
        ordered
    }

    pub fn has_color(&self, color: Color) -> bool {
        self.all_colors().contains(color)
    }
}

fn parse_choice(content: &str) -> Result<Vec<Color>, NotationError> {
    let mut colors = Vec::new();
    for part in content.split('/') {
        let mut part_chars = part.chars();
        let (first, rest) = (part_chars.next(), part_chars.next());
        match (first, rest) {
            (Some(c), None) => {
                colors.push(Color::from_char(c).ok_or(NotationError::UnknownSymbol(c))?)
            }
            _ => return Err(NotationError::MalformedGroup(content.to_string())),
        }
    }
    Ok(colors)
}

impl FromStr for ManaProduction {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ManaProduction::parse(s)
    }
}
