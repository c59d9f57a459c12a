//! HTTP recognizer tests against a mock NLU endpoint

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ConciergeBot::config::RecognizerConfig;
use ConciergeBot::recognizer::{HttpRecognizer, Intent, Recognizer};
use ConciergeBot::utils::errors::{ConciergeError, RecognizerError};

fn config_for(server: &MockServer) -> RecognizerConfig {
    RecognizerConfig {
        nlu_url: format!("{}/recognize", server.uri()),
        timeout_seconds: 2,
        arbitration: Default::default(),
    }
}

#[tokio::test]
async fn maps_nlu_response_to_recognition() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recognize"))
        .and(query_param("q", "book a table downtown"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "topScoringIntent": {"intent": "BookTable", "score": 0.92},
            "entities": [
                {"type": "location", "entity": "downtown"}
            ]
        })))
        .mount(&server)
        .await;

    let recognizer = HttpRecognizer::new(config_for(&server)).unwrap();
    let recognition = recognizer.recognize("book a table downtown").await.unwrap();

    assert_eq!(recognition.intent, Intent::BookTable);
    assert_eq!(recognition.score, 0.92);
    assert_eq!(recognition.entity("location").unwrap().value, "downtown");
}

#[tokio::test]
async fn unknown_intent_name_maps_to_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "topScoringIntent": {"intent": "OrderPizza", "score": 0.99}
        })))
        .mount(&server)
        .await;

    let recognizer = HttpRecognizer::new(config_for(&server)).unwrap();
    let recognition = recognizer.recognize("large pepperoni please").await.unwrap();

    assert_eq!(recognition.intent, Intent::None);
    assert!(recognition.entities.is_empty());
}

#[tokio::test]
async fn out_of_range_score_is_clamped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "topScoringIntent": {"intent": "Cancel", "score": 1.7}
        })))
        .mount(&server)
        .await;

    let recognizer = HttpRecognizer::new(config_for(&server)).unwrap();
    let recognition = recognizer.recognize("cancel").await.unwrap();

    assert_eq!(recognition.score, 1.0);
}

#[tokio::test]
async fn server_error_is_reported_as_request_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
        .mount(&server)
        .await;

    let recognizer = HttpRecognizer::new(config_for(&server)).unwrap();
    let error = recognizer.recognize("hello").await.unwrap_err();

    match error {
        ConciergeError::Recognizer(RecognizerError::RequestFailed(message)) => {
            assert!(message.contains("503"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_an_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let recognizer = HttpRecognizer::new(config_for(&server)).unwrap();
    let error = recognizer.recognize("hello").await.unwrap_err();

    assert!(matches!(
        error,
        ConciergeError::Recognizer(RecognizerError::InvalidResponse(_))
    ));
}
