// @file: cmc_client/src/core/interfaces.rs
// @description: Traits at the two seams of the client: the HTTP session and the operation catalogue.
// @author: LAS.

use crate::core::errors::{RemoteDataError, TransportFault};
use crate::core::models::{ApiRequest, RawResponse};
use async_trait::async_trait;
use serde_json::Value;

//
// TRAIT DEFINITIONS
//

#[async_trait]
pub trait Transport: Send + Sync {
    // #1. Perform one GET and hand back status, reason and body untouched.
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, TransportFault>;
}

/// One logical endpoint: where it lives, what it sends, how its payload is read.
pub trait MarketOperation {
    type Output;

    // #1. Name used in logs and error context.
    fn name(&self) -> &'static str;

    // #2. Path below the base URL.
    fn endpoint(&self) -> &'static str;

    // #3. Query parameters in send order. Unset optionals are left out.
    fn params(&self) -> Vec<(String, String)>;

    // #4. Shape the `Success` payload.
    fn parse(&self, payload: Value) -> Result<Self::Output, RemoteDataError>;
}
