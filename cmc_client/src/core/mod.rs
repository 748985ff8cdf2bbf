// @file: cmc_client/src/core/mod.rs
// @description: Exports domain logic and data structures.
// @author: LAS.

pub mod errors;
pub mod interfaces;
pub mod models;
pub mod table;
