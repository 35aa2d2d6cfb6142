pub mod category;
pub mod station;
pub mod station_index;
