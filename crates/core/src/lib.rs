#![forbid(unsafe_code)]

pub mod model;
pub mod prediction;
pub mod time;

pub use time::Clock;
