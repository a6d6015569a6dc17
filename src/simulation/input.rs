use crate::card::{Cycler, Land, LandKind, ManaCost, ManaProduction, Rock};
use crate::simulation::engine::{DeckSpec, SimSettings};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid land at line {line}: {reason}")]
    Land { line: usize, reason: String },
    #[error("invalid spell at line {line}: {reason}")]
    Spell { line: usize, reason: String },
    #[error("invalid cycler at line {line}: {reason}")]
    Cycler { line: usize, reason: String },
    #[error("invalid rock at line {line}: {reason}")]
    Rock { line: usize, reason: String },
    #[error("invalid setting at line {line}: {reason}")]
    Setting { line: usize, reason: String },
    #[error("'play' and 'draw' must be opposite values")]
    PlayDrawConflict,
}

#[derive(Debug, Default)]
struct RawSettings {
    cycles: Option<usize>,
    deck_size: Option<usize>,
    play: Option<bool>,
    draw: Option<bool>,
}

impl RawSettings {
    /// If only one of play/draw is given the other is its negation;
    /// if both are given they must disagree.
    fn resolve(self) -> Result<SimSettings, InputError> {
        let on_play = match (self.play, self.draw) {
            (Some(play), Some(draw)) if play == draw => return Err(InputError::PlayDrawConflict),
            (Some(play), _) => play,
            (None, Some(draw)) => !draw,
            (None, None) => SimSettings::default().on_play,
        };
        let defaults = SimSettings::default();
        Ok(SimSettings {
            cycles: self.cycles.unwrap_or(defaults.cycles),
            deck_size: self.deck_size.unwrap_or(defaults.deck_size),
            on_play,
            max_turn: defaults.max_turn,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Lands,
    Spells,
    Cyclers,
    Rocks,
    Settings,
}

impl Section {
    fn from_header(line: &str) -> Option<Section> {
        match line.to_uppercase().as_str() {
            "LANDS" => Some(Section::Lands),
            "SPELLS" => Some(Section::Spells),
            "CYCLERS" => Some(Section::Cyclers),
            "ROCKS" => Some(Section::Rocks),
            "SETTINGS" => Some(Section::Settings),
            _ => None,
        }
    }

    fn by_paragraph(index: usize) -> Option<Section> {
        match index {
            0 => Some(Section::Lands),
            1 => Some(Section::Spells),
            2 => Some(Section::Cyclers),
            3 => Some(Section::Rocks),
            4 => Some(Section::Settings),
            _ => None,
        }
    }
}

/// Parse an input file describing the deck and simulation settings.
///
/// Sections are introduced by `LANDS` / `SPELLS` / `CYCLERS` / `ROCKS`
/// / `SETTINGS` headers (case-insensitive). A file without headers is
/// read as blank-line-separated paragraphs in that same order.
/// Structural problems (deck too small, no lands, no spells) are
/// reported later by `SimSettings::validate`, before any trial runs.
pub fn parse_input(content: &str) -> Result<(DeckSpec, SimSettings), InputError> {
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .collect();

    let has_headers = lines
        .iter()
        .any(|(_, line)| Section::from_header(line).is_some());

    let mut deck = DeckSpec::default();
    let mut raw = RawSettings::default();

    if has_headers {
        let mut section = None;
        for &(line_num, line) in &lines {
            if line.is_empty() {
                continue;
            }
            if let Some(next) = Section::from_header(line) {
                section = Some(next);
                continue;
            }
            if let Some(section) = section {
                parse_line(section, line, line_num, &mut deck, &mut raw)?;
            }
        }
    } else {
        let mut paragraph = 0;
        let mut in_paragraph = false;
        for &(line_num, line) in &lines {
            if line.is_empty() {
                if in_paragraph {
                    paragraph += 1;
                    in_paragraph = false;
                }
                continue;
            }
            in_paragraph = true;
            if let Some(section) = Section::by_paragraph(paragraph) {
                parse_line(section, line, line_num, &mut deck, &mut raw)?;
            }
        }
    }

    Ok((deck, raw.resolve()?))
}

/// Read and parse an input file from disk
pub fn parse_input_file(path: &str) -> Result<(DeckSpec, SimSettings), InputError> {
    let content = std::fs::read_to_string(path)?;
    parse_input(&content)
}

fn parse_line(
    section: Section,
    line: &str,
    line_num: usize,
    deck: &mut DeckSpec,
    raw: &mut RawSettings,
) -> Result<(), InputError> {
    match section {
        Section::Lands => parse_land_line(line, line_num, &mut deck.lands),
        Section::Spells => parse_spell_line(line, line_num, &mut deck.spells),
        Section::Cyclers => parse_cycler_line(line, line_num, &mut deck.cyclers),
        Section::Rocks => parse_rock_line(line, line_num, &mut deck.rocks),
        Section::Settings => parse_setting_line(line, line_num, raw),
    }
}

fn parse_land_line(line: &str, line_num: usize, lands: &mut Vec<Land>) -> Result<(), InputError> {
    let err = |reason: String| InputError::Land {
        line: line_num,
        reason,
    };

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(err("expected '<kind> <production> <count>'".to_string()));
    }

    let kind = LandKind::parse(&parts[0].to_lowercase())
        .ok_or_else(|| err(format!("unknown land kind '{}'", parts[0])))?;
    let production = ManaProduction::parse(parts[1]).map_err(|e| err(e.to_string()))?;
    let count: usize = parts[2]
        .parse()
        .map_err(|_| err(format!("'{}' is not a valid count", parts[2])))?;

    let land = Land::new(kind, production).map_err(|e| err(e.to_string()))?;
    for _ in 0..count {
        lands.push(land.clone());
    }
    Ok(())
}

fn parse_spell_line(
    line: &str,
    line_num: usize,
    spells: &mut Vec<ManaCost>,
) -> Result<(), InputError> {
    let cost = ManaCost::parse(line).map_err(|e| InputError::Spell {
        line: line_num,
        reason: e.to_string(),
    })?;
    spells.push(cost);
    Ok(())
}

fn parse_cycler_line(
    line: &str,
    line_num: usize,
    cyclers: &mut Vec<Cycler>,
) -> Result<(), InputError> {
    let err = |reason: String| InputError::Cycler {
        line: line_num,
        reason,
    };

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(err(
            "expected '<production> <threshold> <count>'".to_string()
        ));
    }

    let production = ManaProduction::parse(parts[0]).map_err(|e| err(e.to_string()))?;
    let threshold: u32 = parts[1]
        .parse()
        .map_err(|_| err(format!("'{}' is not a valid threshold", parts[1])))?;
    let count: usize = parts[2]
        .parse()
        .map_err(|_| err(format!("'{}' is not a valid count", parts[2])))?;
    if count == 0 {
        return Err(err("count must be a positive integer".to_string()));
    }

    let cycler = Cycler::new(production, threshold).map_err(|e| err(e.to_string()))?;
    for _ in 0..count {
        cyclers.push(cycler.clone());
    }
    Ok(())
}

fn parse_rock_line(line: &str, line_num: usize, rocks: &mut Vec<Rock>) -> Result<(), InputError> {
    let err = |reason: String| InputError::Rock {
        line: line_num,
        reason,
    };

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(err(
            "expected '<cost> <production> <count> [filter]'".to_string(),
        ));
    }

    let cost = ManaCost::parse(parts[0]).map_err(|e| err(e.to_string()))?;
    let production = ManaProduction::parse(parts[1]).map_err(|e| err(e.to_string()))?;
    let count: usize = parts[2]
        .parse()
        .map_err(|_| err(format!("'{}' is not a valid count", parts[2])))?;
    let filter = match parts.get(3) {
        None => false,
        Some(&"filter") => true,
        Some(other) => return Err(err(format!("unexpected token '{}'", other))),
    };

    let rock = Rock::new(cost, production, filter).map_err(|e| err(e.to_string()))?;
    for _ in 0..count {
        rocks.push(rock.clone());
    }
    Ok(())
}

fn parse_setting_line(line: &str, line_num: usize, raw: &mut RawSettings) -> Result<(), InputError> {
    let err = |reason: String| InputError::Setting {
        line: line_num,
        reason,
    };

    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(err("expected '<key> <value>'".to_string()));
    }

    let key = parts[0].to_lowercase();
    let value = parts[1].to_lowercase();
    match key.as_str() {
        "cycles" => {
            let cycles: usize = value
                .parse()
                .map_err(|_| err(format!("'{}' is not a valid integer", value)))?;
            if cycles == 0 {
                return Err(err("cycles must be a positive integer".to_string()));
            }
            raw.cycles = Some(cycles);
        }
        "deck_size" | "decksize" => {
            let size: usize = value
                .parse()
                .map_err(|_| err(format!("'{}' is not a valid integer", value)))?;
            if size == 0 {
                return Err(err("deck_size must be a positive integer".to_string()));
            }
            raw.deck_size = Some(size);
        }
        "play" => raw.play = Some(parse_bool(&value).ok_or_else(|| {
            err(format!("'{}' is not a valid boolean", value))
        })?),
        "draw" => raw.draw = Some(parse_bool(&value).ok_or_else(|| {
            err(format!("'{}' is not a valid boolean", value))
        })?),
        _ => return Err(err(format!("unknown setting '{}'", parts[0]))),
    }
    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "t" | "1" | "yes" | "y" => Some(true),
        "false" | "f" | "0" | "no" | "n" => Some(false),
        _ => None,
    }
}
