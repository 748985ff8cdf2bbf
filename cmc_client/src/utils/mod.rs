// @file: cmc_client/src/utils/mod.rs
// @description: Configuration helpers.
// @author: LAS.

pub mod config;
