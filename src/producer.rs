pub mod color;
pub mod core;
pub mod decode;
pub mod file;
pub mod transition;
