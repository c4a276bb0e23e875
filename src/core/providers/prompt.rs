use serde_json::{Value, json};

pub const SYSTEM_PROMPT: &str = "You are a plant identifier. Given one photo, return ONLY strict JSON \
matching the provided schema. If uncertain, set both names to 'unknown' and confidence \u{2264} 0.3. \
Keep care to two short, non-duplicative tips. No extra text.";

/// JSON schema the model is asked to follow. Mirrors `PlantResult`.
pub fn result_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "commonName": { "type": "string" },
            "scientificName": { "type": "string" },
            "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
            "care": { "type": "array", "items": { "type": "string" }, "maxItems": 2 },
            "notes": { "type": "string" }
        },
        "required": ["commonName", "scientificName", "confidence", "care"]
    })
}

/// Text part of the user message.
pub fn schema_instruction() -> String {
    format!("Schema: {}", result_schema())
}
