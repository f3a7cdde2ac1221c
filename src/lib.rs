pub mod apportion;
pub mod configuration;
pub mod defs;
pub mod errors;
pub mod kmd;
pub mod model;
pub mod output;
