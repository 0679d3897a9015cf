pub mod chart;
pub mod datapoint;
pub mod display_mode;
pub mod feed;
pub mod ramp;
pub mod series;
pub mod settings;
pub mod view_state;
