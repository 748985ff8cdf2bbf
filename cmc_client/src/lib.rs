// @file: cmc_client/src/lib.rs
// @description: Exposes the modular architecture for integration testing and external usage.
// @author: LAS.

pub mod core;
pub mod connectors;
pub mod tests;
pub mod utils;

pub use crate::connectors::coinmarketcap::CoinMarketCapClient;
pub use crate::connectors::transport::HttpSession;
pub use crate::core::errors::RemoteDataError;
pub use crate::core::models::{Credentials, Fetched, SortField, TimePeriod};
pub use crate::core::table::Table;
pub use crate::utils::config::{AppConfig, ClientConfig};
