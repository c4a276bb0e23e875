pub mod http_client;
pub mod jpeg;
pub mod openai;
mod openai_types;
pub mod prompt;
pub mod scrub;
pub mod traits;

pub use http_client::build_identify_client;
pub use openai::OpenAiIdentifier;
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
pub use traits::PlantIdentifier;
