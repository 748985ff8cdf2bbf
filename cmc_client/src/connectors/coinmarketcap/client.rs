// @file: cmc_client/src/connectors/coinmarketcap/client.rs
// @description: Builds requests, executes them once, and classifies the HTTP outcome.
// @author: LAS.

use std::sync::Arc;
use log::{debug, error, info, warn};
use serde_json::{Map, Value};
use url::Url;
use crate::connectors::coinmarketcap::operations::{
    HistoricalGlobalMetrics, HistoricalOhlcv, LatestGlobalMetrics, LatestListings, LatestOhlcv,
};
use crate::connectors::transport::{guarded_get, HttpSession};
use crate::core::errors::RemoteDataError;
use crate::core::interfaces::{MarketOperation, Transport};
use crate::core::models::{
    ApiRequest, Credentials, Fetched, RawResponse, ResponseOutcome, SortField,
    API_KEY_HEADER, HIDDEN_API_KEY,
};
use crate::core::table::Table;
use crate::utils::config::ClientConfig;


//
// CLIENT STRUCT
//

#[derive(Clone)]
pub struct CoinMarketCapClient {
    config: ClientConfig,
    session: Option<Arc<dyn Transport>>,
}

impl CoinMarketCapClient {
    //
    // INITIALIZATION
    //

    pub fn new(config: ClientConfig) -> Self {
        CoinMarketCapClient { config, session: None }
    }

    // Share one session across every call made through this client.
    pub fn with_session(mut self, session: Arc<dyn Transport>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }


    //
    // OPERATIONS
    //

    pub async fn latest_listings(
        &self,
        sort_by: impl Into<SortField>,
        top_n: u32,
    ) -> Result<Fetched<Table>, RemoteDataError> {
        let op = LatestListings { sort_by: sort_by.into(), top_n };
        self.execute(&op).await
    }

    pub async fn historical_global_metrics(&self) -> Result<Fetched<Table>, RemoteDataError> {
        self.execute(&HistoricalGlobalMetrics).await
    }

    pub async fn latest_global_metrics(&self) -> Result<Fetched<Table>, RemoteDataError> {
        self.execute(&LatestGlobalMetrics).await
    }

    pub async fn historical_ohlcv(&self, op: &HistoricalOhlcv) -> Result<Fetched<Table>, RemoteDataError> {
        self.execute(op).await
    }

    pub async fn latest_ohlcv(&self, symbols: &[&str]) -> Result<Fetched<Map<String, Value>>, RemoteDataError> {
        self.execute(&LatestOhlcv::new(symbols.iter().copied())).await
    }


    //
    // GENERIC EXECUTION
    //

    pub async fn execute<O: MarketOperation>(&self, op: &O) -> Result<Fetched<O::Output>, RemoteDataError> {
        self.execute_with(op, None, None).await
    }

    // `credentials` and `session` override the client's own for this call only.
    pub async fn execute_with<O: MarketOperation>(
        &self,
        op: &O,
        credentials: Option<&Credentials>,
        session: Option<&dyn Transport>,
    ) -> Result<Fetched<O::Output>, RemoteDataError> {
        let credentials: &Credentials = credentials.unwrap_or(&self.config.credentials);

        // #1. Build
        let request: ApiRequest = build_request(&self.config.base_url, op, credentials);
        debug!("{} -> {}", op.name(), redacted_url(&request, credentials));

        // #2. Acquire a session: caller's, client's, or a fresh one for this call
        let fresh: HttpSession;
        let transport: &dyn Transport = match (session, &self.session) {
            (Some(s), _) => s,
            (None, Some(s)) => s.as_ref(),
            (None, None) => {
                fresh = HttpSession::new(self.config.timeout).map_err(|fault| RemoteDataError::Transport {
                    operation: op.name(),
                    params: String::new(),
                    message: fault.0,
                })?;
                &fresh
            }
        };

        // #3. Execute once, then classify
        let response: RawResponse = guarded_get(transport, op.name(), &request, credentials).await?;
        let outcome = classify(response, self.config.unauthorized_status, &request, credentials, op.name())?;

        match outcome {
            ResponseOutcome::Success(payload) => {
                let output = op.parse(payload).map_err(|e| {
                    error!("{}", e);
                    e
                })?;
                info!("{} succeeded", op.name());
                Ok(Fetched::Data(output))
            }
            ResponseOutcome::Unauthorized => {
                warn!("API key restricted, try upgrading your API key: {}", op.name());
                Ok(Fetched::Unauthorized)
            }
            ResponseOutcome::Failure { status, reason, url } => {
                let err = RemoteDataError::Status { status, reason, url };
                error!("{} failed: {}", op.name(), err);
                Err(err)
            }
        }
    }
}


//
// REQUEST BUILDER
//

pub fn build_request<O: MarketOperation + ?Sized>(base_url: &str, op: &O, credentials: &Credentials) -> ApiRequest {
    ApiRequest {
        url: format!("{}{}", base_url, op.endpoint()),
        params: op.params(),
        headers: vec![
            ("Accepts".to_string(), "application/json".to_string()),
            (API_KEY_HEADER.to_string(), credentials.api_key().to_string()),
        ],
    }
}

// Full URL with parameters plus a placeholder token; the real key never appears.
pub fn redacted_url(request: &ApiRequest, credentials: &Credentials) -> String {
    let mut params: Vec<(&str, &str)> = request.params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    params.push(("api_token", HIDDEN_API_KEY));

    let full: String = match Url::parse_with_params(&request.url, &params) {
        Ok(url) => url.to_string(),
        Err(_) => {
            let query: Vec<String> = params.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            format!("{}?{}", request.url, query.join("&"))
        }
    };

    credentials.redact(&full)
}


//
// RESPONSE CLASSIFIER
//

pub fn classify(
    response: RawResponse,
    unauthorized_status: u16,
    request: &ApiRequest,
    credentials: &Credentials,
    operation: &'static str,
) -> Result<ResponseOutcome, RemoteDataError> {
    match response.status {
        200 => {
            let payload: Value = serde_json::from_str(&response.body).map_err(|e| RemoteDataError::Decode {
                operation,
                message: e.to_string(),
            })?;
            Ok(ResponseOutcome::Success(payload))
        }
        s if s == unauthorized_status => Ok(ResponseOutcome::Unauthorized),
        status => Ok(ResponseOutcome::Failure {
            status,
            reason: credentials.redact(&response.reason),
            url: redacted_url(request, credentials),
        }),
    }
}
