pub mod boundaries;
pub mod heat_buffer;
pub mod heat_pump_asset;
pub mod house;
pub mod units;
