use plantsnap::Config;
use serde_json::json;

pub const VALID_KEY: &str = "sk-xxxxxxxxxxxxxxxxxxxxxxxxx";

pub fn sample_png() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(16, 16, image::Rgb([46, 125, 50]));
    let mut cursor = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut cursor, image::ImageFormat::Png)
        .expect("png encoding should succeed");
    cursor.into_inner()
}

/// Chat completion envelope whose first choice carries `content` verbatim.
pub fn envelope(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

pub const PEACE_LILY_CONTENT: &str = r#"{"commonName":"Peace Lily","scientificName":"Spathiphyllum","confidence":0.95,"care":["Keep soil moist","Bright indirect light"]}"#;

pub fn config_for(server_uri: &str) -> Config {
    // Same TLS provider the binary installs; a second install is a no-op error.
    let _ = rustls::crypto::ring::default_provider().install_default();
    Config {
        api_url: format!("{server_uri}/v1/chat/completions"),
        request_timeout_secs: 5,
        demo_delay_ms: 0,
        ..Config::default()
    }
}
