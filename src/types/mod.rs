pub mod fix;
pub mod region;
