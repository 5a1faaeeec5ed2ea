pub mod app_state;
pub mod coordinate;
pub mod speed_limit;
