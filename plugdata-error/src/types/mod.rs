pub mod data_error;

pub use data_error::*;
