pub mod traits;

// API provider implementations
pub mod energy_api;
