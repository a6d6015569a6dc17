pub mod binding;
pub mod engine;
pub mod input;
pub mod mulligan;
pub mod turns;

pub use engine::{
    run_simulation, ConfigError, DeckSpec, NoopObserver, SimObserver, SimSettings, SpellOutcome,
};
pub use input::{parse_input, parse_input_file, InputError};
