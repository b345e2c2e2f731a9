pub mod asset;
pub mod signal;
