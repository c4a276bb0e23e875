use crate::core::result::PlantResult;
use crate::error::IdentifyError;
use async_trait::async_trait;

/// Turns one image into one identification result.
///
/// Implementations report failures as typed errors and never substitute a
/// fallback result; that policy belongs to the caller.
#[async_trait]
pub trait PlantIdentifier: Send + Sync {
    async fn identify(&self, image: &[u8], api_key: &str) -> Result<PlantResult, IdentifyError>;

    fn name(&self) -> &str;
}
