pub mod bluetooth;
pub mod capture;
pub mod config;
pub mod error;
pub mod gatt;
pub mod models;
pub mod sensor;
pub mod utils;

pub use error::{Error, Result};
