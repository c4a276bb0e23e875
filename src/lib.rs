#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod config;
pub mod core;
pub mod error;
pub mod security;

pub use crate::config::Config;
pub use crate::core::identify::{IdentifyEvent, IdentifyPhase, IdentifySession};
pub use crate::core::providers::{OpenAiIdentifier, PlantIdentifier};
pub use crate::core::result::PlantResult;
pub use crate::core::session::SessionState;
pub use error::{
    DecodeError, IdentifyError, PlantSnapError, SecretStoreError, ValidationError,
};
pub use security::{FileSecretStore, MemorySecretStore, SecretStore};
