// @file: cmc_client/src/connectors/coinmarketcap/mod.rs
// @description: CoinMarketCap REST connector.
// @author: LAS.

pub mod client;
pub mod operations;

pub use client::CoinMarketCapClient;
