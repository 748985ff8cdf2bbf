// @file: cmc_client/src/core/models.rs
// @description: Request/response data structures shared by every market-data operation.
// @author: LAS.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;


//
// CONSTANTS
//

pub const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";
pub const HIDDEN_API_KEY: &str = "YOUR_HIDDEN_API";
pub const CONVERT_CURRENCY: &str = "USD";
pub const MIN_REDACT_LEN: usize = 8;


//
// CREDENTIALS
//

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Credentials { api_key: api_key.into() }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    // Replaces every occurrence of the key in free text with the placeholder.
    // Keys shorter than MIN_REDACT_LEN would match ordinary words, so they are left alone.
    pub fn redact(&self, text: &str) -> String {
        if self.api_key.len() < MIN_REDACT_LEN {
            return text.to_string();
        }
        text.replace(&self.api_key, HIDDEN_API_KEY)
    }
}

// Never print the key, not even in debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials").field("api_key", &HIDDEN_API_KEY).finish()
    }
}


//
// REQUEST
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}


//
// RESPONSE
//

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

// Classification of one HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    Success(Value),
    Unauthorized,
    Failure {
        status: u16,
        reason: String,
        url: String,
    },
}

/// What a caller gets back from any operation that did not raise.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Data(T),
    Unauthorized,
}

impl<T> Fetched<T> {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Fetched::Unauthorized)
    }

    pub fn data(self) -> Option<T> {
        match self {
            Fetched::Data(d) => Some(d),
            Fetched::Unauthorized => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        match self {
            Fetched::Data(d) => Fetched::Data(f(d)),
            Fetched::Unauthorized => Fetched::Unauthorized,
        }
    }
}


//
// OPERATION PARAMETERS
//

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Daily,
    #[default]
    Hourly,
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Daily => "daily",
            TimePeriod::Hourly => "hourly",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Listing sort keys. Anything else passes through untouched via `Other`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    MarketCap,
    Volume7d,
    Volume30d,
    PercentChange7d,
    Other(String),
}

impl SortField {
    pub fn as_str(&self) -> &str {
        match self {
            SortField::MarketCap => "market_cap",
            SortField::Volume7d => "volume_7d",
            SortField::Volume30d => "volume_30d",
            SortField::PercentChange7d => "percent_change_7d",
            SortField::Other(s) => s,
        }
    }
}

impl From<&str> for SortField {
    fn from(s: &str) -> Self {
        match s {
            "market_cap" => SortField::MarketCap,
            "volume_7d" => SortField::Volume7d,
            "volume_30d" => SortField::Volume30d,
            "percent_change_7d" => SortField::PercentChange7d,
            other => SortField::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
