// Drive inventory and S.M.A.R.T. health scoring

pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod scanner;
pub mod smart;

pub use error::{Result, ScanError};
