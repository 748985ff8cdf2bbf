// @file: cmc_client/src/connectors/coinmarketcap/operations.rs
// @description: The CoinMarketCap endpoint catalogue: path, query parameters and payload shape per operation.
// @author: LAS.

use serde_json::{Map, Value};
use crate::core::errors::RemoteDataError;
use crate::core::interfaces::MarketOperation;
use crate::core::models::{SortField, TimePeriod, CONVERT_CURRENCY};
use crate::core::table::{flatten_object, Table, KEY_SEPARATOR};


//
// ENDPOINTS
//

pub const LISTINGS_LATEST_PATH: &str = "/v1/cryptocurrency/listings/latest";
pub const GLOBAL_METRICS_HISTORICAL_PATH: &str = "/v1/global-metrics/quotes/historical";
pub const OHLCV_HISTORICAL_PATH: &str = "/v2/cryptocurrency/ohlcv/historical";
pub const OHLCV_LATEST_PATH: &str = "/v2/cryptocurrency/ohlcv/latest";

// Fixed window for the global-metrics history; callers cannot widen it yet.
const GLOBAL_HISTORY_INTERVAL: &str = "1d";
const GLOBAL_HISTORY_COUNT: &str = "30";

pub const DEFAULT_TOP_N: u32 = 500;
pub const DEFAULT_OHLCV_INTERVAL: &str = "1h";


//
// LISTINGS
//

#[derive(Debug, Clone, PartialEq)]
pub struct LatestListings {
    pub sort_by: SortField,
    pub top_n: u32,
}

impl Default for LatestListings {
    fn default() -> Self {
        LatestListings {
            sort_by: SortField::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl MarketOperation for LatestListings {
    type Output = Table;

    fn name(&self) -> &'static str {
        "latest_listings"
    }

    fn endpoint(&self) -> &'static str {
        LISTINGS_LATEST_PATH
    }

    fn params(&self) -> Vec<(String, String)> {
        vec![
            pair("convert", CONVERT_CURRENCY),
            pair("limit", &self.top_n.to_string()),
            pair("sort", self.sort_by.as_str()),
        ]
    }

    fn parse(&self, payload: Value) -> Result<Table, RemoteDataError> {
        let data = field(&payload, "data", self.name())?;
        records_table(data, "data", self.name())
    }
}


//
// GLOBAL METRICS
//

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoricalGlobalMetrics;

impl MarketOperation for HistoricalGlobalMetrics {
    type Output = Table;

    fn name(&self) -> &'static str {
        "historical_global_metrics"
    }

    fn endpoint(&self) -> &'static str {
        GLOBAL_METRICS_HISTORICAL_PATH
    }

    fn params(&self) -> Vec<(String, String)> {
        vec![
            pair("interval", GLOBAL_HISTORY_INTERVAL),
            pair("convert", CONVERT_CURRENCY),
            pair("count", GLOBAL_HISTORY_COUNT),
        ]
    }

    fn parse(&self, payload: Value) -> Result<Table, RemoteDataError> {
        quotes_table(&payload, self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatestGlobalMetrics;

impl MarketOperation for LatestGlobalMetrics {
    type Output = Table;

    fn name(&self) -> &'static str {
        "latest_global_metrics"
    }

    // NOTE: deliberately the historical path, the same one HistoricalGlobalMetrics
    // hits. Kept as deployed until the intended endpoint is confirmed.
    fn endpoint(&self) -> &'static str {
        GLOBAL_METRICS_HISTORICAL_PATH
    }

    fn params(&self) -> Vec<(String, String)> {
        vec![pair("convert", CONVERT_CURRENCY)]
    }

    fn parse(&self, payload: Value) -> Result<Table, RemoteDataError> {
        quotes_table(&payload, self.name())
    }
}


//
// OHLCV
//

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalOhlcv {
    pub symbols: Vec<String>,
    pub time_period: TimePeriod,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
    pub interval: String,
}

impl HistoricalOhlcv {
    pub fn new<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        HistoricalOhlcv {
            symbols: symbols.into_iter().map(Into::into).collect(),
            time_period: TimePeriod::default(),
            time_start: None,
            time_end: None,
            interval: DEFAULT_OHLCV_INTERVAL.to_string(),
        }
    }

    pub fn time_period(mut self, period: TimePeriod) -> Self {
        self.time_period = period;
        self
    }

    pub fn range(mut self, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.time_start = Some(start.into());
        self.time_end = Some(end.into());
        self
    }

    pub fn interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }
}

impl MarketOperation for HistoricalOhlcv {
    type Output = Table;

    fn name(&self) -> &'static str {
        "historical_ohlcv"
    }

    fn endpoint(&self) -> &'static str {
        OHLCV_HISTORICAL_PATH
    }

    fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            pair("convert", CONVERT_CURRENCY),
            pair("symbol", &self.symbols.join(",")),
            pair("time_period", self.time_period.as_str()),
        ];
        if let Some(start) = &self.time_start {
            params.push(pair("time_start", start));
        }
        if let Some(end) = &self.time_end {
            params.push(pair("time_end", end));
        }
        params.push(pair("interval", &self.interval));
        params
    }

    fn parse(&self, payload: Value) -> Result<Table, RemoteDataError> {
        let data = field(&payload, "data", self.name())?;

        // #1. Walk symbols in the caller's order, not the payload's
        let mut table = Table::new();
        for symbol in &self.symbols {
            let entry = data.get(symbol).ok_or_else(|| {
                RemoteDataError::shape(self.name(), format!("symbol {} missing from data", symbol))
            })?;

            // #2. v2 answers either one record or a list of records per symbol.
            // Only listed records keep a null row when their quotes are empty.
            match entry {
                Value::Array(items) => {
                    for record in items {
                        table = table.concat(explode_quotes(record, symbol, true, self.name())?);
                    }
                }
                record => {
                    table = table.concat(explode_quotes(record, symbol, false, self.name())?);
                }
            }
        }

        Ok(table)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestOhlcv {
    pub symbols: Vec<String>,
}

impl LatestOhlcv {
    pub fn new<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        LatestOhlcv {
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

impl MarketOperation for LatestOhlcv {
    // Left unflattened: symbol -> latest quote structure, as returned.
    type Output = Map<String, Value>;

    fn name(&self) -> &'static str {
        "latest_ohlcv"
    }

    fn endpoint(&self) -> &'static str {
        OHLCV_LATEST_PATH
    }

    fn params(&self) -> Vec<(String, String)> {
        vec![
            pair("convert", CONVERT_CURRENCY),
            pair("symbol", &self.symbols.join(",")),
        ]
    }

    fn parse(&self, payload: Value) -> Result<Map<String, Value>, RemoteDataError> {
        match payload {
            Value::Object(mut root) => match root.remove("data") {
                Some(Value::Object(data)) => Ok(data),
                Some(_) => Err(RemoteDataError::shape(self.name(), "data is not an object")),
                None => Err(RemoteDataError::shape(self.name(), "missing data")),
            },
            _ => Err(RemoteDataError::shape(self.name(), "payload is not an object")),
        }
    }
}


//
// INTERNAL HELPERS
//

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

fn field<'a>(value: &'a Value, key: &str, operation: &'static str) -> Result<&'a Value, RemoteDataError> {
    value.get(key).ok_or_else(|| RemoteDataError::shape(operation, format!("missing {}", key)))
}

fn records_table(records: &Value, path: &str, operation: &'static str) -> Result<Table, RemoteDataError> {
    let list = records.as_array().ok_or_else(|| {
        RemoteDataError::shape(operation, format!("{} is not a list", path))
    })?;

    Table::from_records(list).map_err(|idx| {
        RemoteDataError::shape(operation, format!("{}[{}] is not an object", path, idx))
    })
}

fn quotes_table(payload: &Value, operation: &'static str) -> Result<Table, RemoteDataError> {
    let data = field(payload, "data", operation)?;
    let quotes = field(data, "quotes", operation)?;
    records_table(quotes, "data.quotes", operation)
}

// One row per element of `record.quotes`, each row carrying the record's other
// fields. An empty quotes list yields nothing, or one row with `quotes` null
// when `keep_empty` is set.
fn explode_quotes(
    record: &Value,
    symbol: &str,
    keep_empty: bool,
    operation: &'static str,
) -> Result<Table, RemoteDataError> {
    let obj = record.as_object().ok_or_else(|| {
        RemoteDataError::shape(operation, format!("data.{} is not an object", symbol))
    })?;

    let quotes: Vec<Value> = match obj.get("quotes") {
        Some(Value::Array(items)) if items.is_empty() && keep_empty => vec![Value::Null],
        Some(Value::Array(items)) => items.clone(),
        _ => return Err(RemoteDataError::shape(operation, format!("data.{}.quotes is not a list", symbol))),
    };

    let mut table = Table::new();
    for quote in quotes {
        let mut row_source: Map<String, Value> = obj.clone();
        row_source.insert("quotes".to_string(), quote);
        table.push_row(flatten_object(&row_source, KEY_SEPARATOR));
    }

    Ok(table)
}
