//! Domain models for the Crop Risk Advisory Platform

mod risk;
mod stage;
mod weather;

pub use risk::*;
pub use stage::*;
pub use weather::*;
