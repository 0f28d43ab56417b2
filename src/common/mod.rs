// Common utilities and constants shared across modules

pub mod constants;
pub mod utils;
