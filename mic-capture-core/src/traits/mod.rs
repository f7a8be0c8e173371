pub mod encoder;
pub mod peripheral;
pub mod sink;
