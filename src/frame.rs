pub mod composite;
pub mod core;
