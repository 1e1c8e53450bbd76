pub mod config;
pub mod error;
pub mod indicators;
pub mod market;
pub mod notify;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use indicators::IndicatorEngine;
pub use market::MarketData;
pub use notify::Notifier;
pub use types::*;
