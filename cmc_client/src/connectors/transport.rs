// @file: cmc_client/src/connectors/transport.rs
// @description: reqwest-backed session plus the adapter that normalizes transport faults.
// @author: LAS.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use log::error;
use crate::core::errors::{RemoteDataError, TransportFault};
use crate::core::interfaces::Transport;
use crate::core::models::{ApiRequest, Credentials, RawResponse};


//
// HTTP SESSION
//

/// Reusable HTTP session. Build one and pass it to a batch of calls to share
/// its connection pool; drop it when the batch is done.
#[derive(Clone)]
pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    pub fn new(timeout: Duration) -> Result<Self, TransportFault> {
        let client: Client = Client::builder().timeout(timeout).build()?;
        Ok(HttpSession { client })
    }

    pub fn from_client(client: Client) -> Self {
        HttpSession { client }
    }
}

#[async_trait]
impl Transport for HttpSession {
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, TransportFault> {
        // #1. Assemble the GET
        let mut builder = self.client.get(&request.url).query(&request.params);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        // #2. Execute and read the body as text; JSON decoding happens later
        let response = builder.send().await?;
        let status = response.status();
        let reason: String = status.canonical_reason().unwrap_or("").to_string();
        let body: String = response.text().await?;

        Ok(RawResponse {
            status: status.as_u16(),
            reason,
            body,
        })
    }
}


//
// FAULT ADAPTER
//

// Runs the request and turns any transport fault into RemoteDataError::Transport,
// carrying the operation name and the (redacted) parameters. Never retries.
pub async fn guarded_get(
    transport: &dyn Transport,
    operation: &'static str,
    request: &ApiRequest,
    credentials: &Credentials,
) -> Result<RawResponse, RemoteDataError> {
    transport.get(request).await.map_err(|fault| {
        let params: String = request.params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let err = RemoteDataError::Transport {
            operation,
            params: credentials.redact(&params),
            message: credentials.redact(&fault.0),
        };
        error!("{}", err);
        err
    })
}
