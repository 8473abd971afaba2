pub mod device;
pub mod texture;
