pub mod lands;
pub mod mana;
pub mod state;

pub use state::{Card, LandInPlay, RockInPlay, TrialState, UnitOwner};
