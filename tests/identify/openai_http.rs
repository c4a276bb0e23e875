use crate::fixtures::{PEACE_LILY_CONTENT, VALID_KEY, config_for, envelope, sample_png};
use plantsnap::{DecodeError, IdentifyError, OpenAiIdentifier, PlantIdentifier, PlantResult};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn decodes_successful_identification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", format!("Bearer {VALID_KEY}").as_str()))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(PEACE_LILY_CONTENT)))
        .expect(1)
        .mount(&server)
        .await;

    let identifier = OpenAiIdentifier::new(&config_for(&server.uri()));
    let result = identifier.identify(&sample_png(), VALID_KEY).await.unwrap();

    assert_eq!(
        result,
        PlantResult {
            common_name: "Peace Lily".into(),
            scientific_name: "Spathiphyllum".into(),
            confidence: 0.95,
            care: vec!["Keep soil moist".into(), "Bright indirect light".into()],
            notes: None,
        }
    );
}

#[tokio::test]
async fn sends_documented_request_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(PEACE_LILY_CONTENT)))
        .mount(&server)
        .await;

    let identifier = OpenAiIdentifier::new(&config_for(&server.uri()));
    identifier.identify(&sample_png(), VALID_KEY).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = requests[0].body_json().unwrap();

    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["max_tokens"], 500);
    assert_eq!(body["temperature"], 0.0);

    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert!(messages[0]["content"].as_str().unwrap().contains("strict JSON"));

    let parts = messages[1]["content"].as_array().unwrap();
    assert_eq!(parts[0]["type"], "image_url");
    assert!(
        parts[0]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/jpeg;base64,/9j/")
    );
    assert_eq!(parts[1]["type"], "text");
    assert!(parts[1]["text"].as_str().unwrap().contains("\"maxItems\":2"));
}

#[tokio::test]
async fn unauthorized_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string(
            r#"{"error":{"message":"Incorrect API key provided: sk-xxxx***xxxx.","type":"invalid_request_error"}}"#,
        ))
        .mount(&server)
        .await;

    let identifier = OpenAiIdentifier::new(&config_for(&server.uri()));
    let err = identifier
        .identify(&sample_png(), VALID_KEY)
        .await
        .unwrap_err();

    match err {
        IdentifyError::Transport { status, message } => {
            assert_eq!(status, Some(401));
            assert!(!message.contains("sk-xxxx"), "key echo must be scrubbed: {message}");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let identifier = OpenAiIdentifier::new(&config_for(&server.uri()));
    let err = identifier
        .identify(&sample_png(), VALID_KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, IdentifyError::Transport { status: Some(503), .. }));
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    // Bind then release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let identifier = OpenAiIdentifier::new(&config_for(&uri));
    let err = identifier
        .identify(&sample_png(), VALID_KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, IdentifyError::Transport { status: None, .. }));
}

#[tokio::test]
async fn prose_content_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope("This looks like a peace lily to me!")),
        )
        .mount(&server)
        .await;

    let identifier = OpenAiIdentifier::new(&config_for(&server.uri()));
    let err = identifier
        .identify(&sample_png(), VALID_KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, IdentifyError::Decode(DecodeError::Content(_))));
}

#[tokio::test]
async fn non_json_body_is_envelope_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let identifier = OpenAiIdentifier::new(&config_for(&server.uri()));
    let err = identifier
        .identify(&sample_png(), VALID_KEY)
        .await
        .unwrap_err();

    assert!(matches!(err, IdentifyError::Decode(DecodeError::Envelope(_))));
}
