//! Business logic services for the Crop Risk Advisory Platform

pub mod forecast;
pub mod risk;

pub use forecast::ForecastService;
pub use risk::RiskService;
