pub mod activity;
pub mod aggregate;
pub mod distance;
pub mod geofence;
pub mod group;
