pub mod cost;
pub mod production;
pub mod types;

pub use cost::{HybridCost, ManaCost};
pub use production::ManaProduction;
pub use types::{CardError, Color, ColorSet, Cycler, Land, LandKind, NotationError, Rock};
