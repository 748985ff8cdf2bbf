// @file: cmc_client/src/tests/response_classifier.rs
// @description: Integration tests for the three-way outcome (data / unauthorized / error) through the client.
// @author: LAS.

#[cfg(test)]
mod response_classifier_tests {
    use crate::connectors::coinmarketcap::client::{classify, redacted_url, build_request};
    use crate::connectors::coinmarketcap::operations::{LatestListings, LatestOhlcv};
    use crate::connectors::coinmarketcap::CoinMarketCapClient;
    use crate::core::errors::RemoteDataError;
    use crate::core::interfaces::Transport;
    use crate::core::models::{Credentials, Fetched, RawResponse, ResponseOutcome, API_KEY_HEADER, HIDDEN_API_KEY};
    use crate::tests::scripted_transport::ScriptedTransport;
    use crate::utils::config::ClientConfig;
    use std::sync::Arc;

    const KEY: &str = "real-key-0b1c2d";

    //
    // HELPERS
    //

    fn client_with(transport: Arc<ScriptedTransport>) -> CoinMarketCapClient {
        let mut config = ClientConfig::new(KEY);
        config.base_url = "https://api.test".to_string();
        CoinMarketCapClient::new(config).with_session(transport)
    }

    //
    // SCENARIOS
    //

    #[tokio::test]
    async fn ok_response_is_data() {
        let transport = Arc::new(ScriptedTransport::ok(r#"{"data": [{"id": 1, "symbol": "BTC"}]}"#));
        let client = client_with(transport.clone());

        let result = client.latest_listings("market_cap", 1).await.unwrap();

        let table = result.data().expect("expected data");
        assert_eq!(table.len(), 1);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn unauthorized_status_is_soft_failure() {
        let transport = Arc::new(ScriptedTransport::respond(403, "Forbidden", r#"{"status": {}}"#));
        let client = client_with(transport.clone());

        let result = client.historical_global_metrics().await;

        assert!(matches!(result, Ok(Fetched::Unauthorized)));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn unauthorized_code_is_configurable() {
        let transport = Arc::new(ScriptedTransport::respond(401, "Unauthorized", ""));
        let mut config = ClientConfig::new(KEY);
        config.unauthorized_status = 401;
        let client = CoinMarketCapClient::new(config).with_session(transport);

        let result = client.latest_ohlcv(&["BTC"]).await.unwrap();
        assert!(result.is_unauthorized());
    }

    #[tokio::test]
    async fn server_error_raises_with_redacted_url() {
        let transport = Arc::new(ScriptedTransport::respond(500, "Internal Server Error", "oops"));
        let client = client_with(transport);

        let err = client.latest_listings("volume_30d", 10).await.unwrap_err();
        let message = err.to_string();

        assert_eq!(err.status(), Some(500));
        assert!(message.contains("500"));
        assert!(message.contains("Internal Server Error"));
        assert!(message.contains("https://api.test/v1/cryptocurrency/listings/latest?"));
        assert!(message.contains("sort=volume_30d"));
        assert!(message.contains(HIDDEN_API_KEY));
        assert!(!message.contains(KEY), "API key leaked: {}", message);
    }

    #[tokio::test]
    async fn other_4xx_is_not_the_soft_path() {
        let transport = Arc::new(ScriptedTransport::respond(429, "Too Many Requests", ""));
        let client = client_with(transport);

        let err = client.latest_global_metrics().await.unwrap_err();
        assert!(matches!(err, RemoteDataError::Status { status: 429, .. }));
    }

    #[tokio::test]
    async fn transport_fault_becomes_remote_data_error() {
        let transport = Arc::new(ScriptedTransport::fail(&format!("connection reset while sending {}", KEY)));
        let client = client_with(transport);

        let err = client.latest_listings("market_cap", 5).await.unwrap_err();

        match &err {
            RemoteDataError::Transport { operation, params, message } => {
                assert_eq!(*operation, "latest_listings");
                assert!(params.contains("limit=5"));
                assert!(message.contains("connection reset"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(!err.to_string().contains(KEY));
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let transport = Arc::new(ScriptedTransport::ok("<html>not json</html>"));
        let client = client_with(transport);

        let err = client.latest_listings("market_cap", 5).await.unwrap_err();
        assert!(matches!(err, RemoteDataError::Decode { operation: "latest_listings", .. }));
    }

    #[tokio::test]
    async fn per_call_overrides_take_precedence() {
        let client_session = Arc::new(ScriptedTransport::respond(500, "Internal Server Error", ""));
        let call_session = ScriptedTransport::ok(r#"{"data": {"BTC": {"quotes": []}}}"#);
        let client = client_with(client_session.clone());
        let other_key = Credentials::new("other-key");

        let result = client
            .execute_with(&LatestOhlcv::new(["BTC"]), Some(&other_key), Some(&call_session as &dyn Transport))
            .await
            .unwrap();

        assert!(result.data().is_some());
        assert_eq!(client_session.request_count(), 0);
        let sent = call_session.requests.lock().unwrap();
        assert_eq!(sent[0].header(API_KEY_HEADER), Some("other-key"));
    }

    //
    // PURE CLASSIFIER
    //

    #[test]
    fn classify_maps_status_codes() {
        let key = Credentials::new(KEY);
        let request = build_request("https://api.test", &LatestListings::default(), &key);
        let response = |status: u16, body: &str| RawResponse {
            status,
            reason: "r".to_string(),
            body: body.to_string(),
        };

        let ok = classify(response(200, r#"{"data": []}"#), 403, &request, &key, "t").unwrap();
        assert!(matches!(ok, ResponseOutcome::Success(_)));

        let denied = classify(response(403, ""), 403, &request, &key, "t").unwrap();
        assert_eq!(denied, ResponseOutcome::Unauthorized);

        let failed = classify(response(502, ""), 403, &request, &key, "t").unwrap();
        assert!(matches!(failed, ResponseOutcome::Failure { status: 502, .. }));
    }

    #[test]
    fn redacted_url_never_contains_key() {
        let key = Credentials::new(KEY);
        let mut request = build_request("https://api.test", &LatestListings::default(), &key);
        request.params.push(("note".to_string(), KEY.to_string()));

        let url = redacted_url(&request, &key);

        assert!(url.starts_with("https://api.test/v1/cryptocurrency/listings/latest?convert=USD&limit=500&sort=market_cap"));
        assert!(url.ends_with("api_token=YOUR_HIDDEN_API"));
        assert!(!url.contains(KEY));
    }

    #[test]
    fn short_key_does_not_garble_error_text() {
        let key = Credentials::new("USD");
        let request = build_request("https://api.test", &LatestListings::default(), &key);

        let url = redacted_url(&request, &key);

        assert!(url.contains("convert=USD&limit=500"));
        assert!(url.ends_with("api_token=YOUR_HIDDEN_API"));
        assert_eq!(key.redact("convert=USD"), "convert=USD");
        assert_eq!(Credentials::new(KEY).redact(&format!("key={}", KEY)), "key=YOUR_HIDDEN_API");
    }
}
