// @file: cmc_client/src/connectors/mod.rs
// @description: Remote data connectors and the HTTP transport they share.
// @author: LAS.

pub mod coinmarketcap;
pub mod transport;
