pub mod config;
pub mod drivers;
pub mod input;
pub mod replay;
