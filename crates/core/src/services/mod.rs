pub mod chart_service;
pub mod fetch_service;
pub mod net_load_service;
pub mod ramp_service;
