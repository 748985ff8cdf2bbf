// @file: cmc_client/src/main.rs
// @description: Command-line entry point: fetch one market-data operation and print it as JSON lines.
// @author: LAS.

use cmc_client::connectors::coinmarketcap::operations::{HistoricalOhlcv, DEFAULT_TOP_N};
use cmc_client::{AppConfig, CoinMarketCapClient, Fetched, HttpSession, Table};
use log::{error, info};
use std::process::ExitCode;
use std::sync::Arc;

const USAGE: &str = "usage: cmc_client <listings [sort] [top_n] | global | global-history | ohlcv SYM.. | ohlcv-latest SYM..>";

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Load configuration before the logger so the configured level applies
    let app_config: AppConfig = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(app_config.log_level.as_str()),
    )
    .init();

    let client_config = match app_config.client_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // 2. One session for the whole run
    let session = match HttpSession::new(client_config.timeout) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to build HTTP session: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let client = CoinMarketCapClient::new(client_config).with_session(Arc::new(session));

    // 3. Dispatch
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };
    let rest: Vec<&str> = args[1..].iter().map(String::as_str).collect();

    info!(">>> Fetching {} <<<", command);

    let result = match command.as_str() {
        "listings" => {
            let sort = rest.first().copied().unwrap_or("market_cap");
            let top_n: u32 = rest.get(1).and_then(|n| n.parse().ok()).unwrap_or(DEFAULT_TOP_N);
            client.latest_listings(sort, top_n).await.map(|f| f.map(print_table))
        }
        "global" => client.latest_global_metrics().await.map(|f| f.map(print_table)),
        "global-history" => client.historical_global_metrics().await.map(|f| f.map(print_table)),
        "ohlcv" if !rest.is_empty() => {
            let op = HistoricalOhlcv::new(rest.iter().copied());
            client.historical_ohlcv(&op).await.map(|f| f.map(print_table))
        }
        "ohlcv-latest" if !rest.is_empty() => client.latest_ohlcv(&rest).await.map(|f| {
            f.map(|data| {
                for (symbol, quote) in data {
                    println!("{}\t{}", symbol, quote);
                }
            })
        }),
        _ => {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(Fetched::Data(())) => ExitCode::SUCCESS,
        Ok(Fetched::Unauthorized) => ExitCode::from(2),
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_table(table: Table) {
    for row in table.rows() {
        match serde_json::to_string(row) {
            Ok(line) => println!("{}", line),
            Err(e) => error!("Failed to encode row: {}", e),
        }
    }
    info!("{} rows, {} columns", table.len(), table.columns().len());
}
