//! One identification screen's worth of state.
//!
//! An [`IdentifySession`] owns the selected image, the last result, the
//! loading flag and the demo switch. Each attempt moves through
//! `Idle -> Loading -> {Success, Fallback}`; a live failure of any kind is
//! replaced by [`PlantResult::unknown`], so callers always get a result.

use crate::core::providers::PlantIdentifier;
use crate::core::result::PlantResult;
use crate::core::session::SessionState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum IdentifyPhase {
    Idle,
    Loading,
    Success,
    Fallback,
}

/// State changes published to observers.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifyEvent {
    ImageSelected,
    LoadingChanged(bool),
    ResultReady(PlantResult),
    DemoModeChanged(bool),
}

pub struct IdentifySession {
    identifier: Arc<dyn PlantIdentifier>,
    demo_delay: Duration,
    image: Option<Vec<u8>>,
    result: Option<PlantResult>,
    is_loading: bool,
    demo_mode: bool,
    phase: IdentifyPhase,
    events: broadcast::Sender<IdentifyEvent>,
}

/// Holds `is_loading` high for its lifetime and lowers it on drop, on every
/// exit path including unwinding.
struct LoadingGuard<'a> {
    flag: &'a mut bool,
    events: &'a broadcast::Sender<IdentifyEvent>,
}

impl<'a> LoadingGuard<'a> {
    fn engage(flag: &'a mut bool, events: &'a broadcast::Sender<IdentifyEvent>) -> Self {
        *flag = true;
        let _ = events.send(IdentifyEvent::LoadingChanged(true));
        Self { flag, events }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        *self.flag = false;
        let _ = self.events.send(IdentifyEvent::LoadingChanged(false));
    }
}

impl IdentifySession {
    pub fn new(identifier: Arc<dyn PlantIdentifier>, demo_delay: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            identifier,
            demo_delay,
            image: None,
            result: None,
            is_loading: false,
            demo_mode: false,
            phase: IdentifyPhase::Idle,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IdentifyEvent> {
        self.events.subscribe()
    }

    pub fn image(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }

    pub fn result(&self) -> Option<&PlantResult> {
        self.result.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    pub fn phase(&self) -> IdentifyPhase {
        self.phase
    }

    /// Select a new image and forget the previous result.
    pub fn set_image(&mut self, image: Vec<u8>) {
        self.image = Some(image);
        self.result = None;
        self.phase = IdentifyPhase::Idle;
        self.emit(IdentifyEvent::ImageSelected);
    }

    pub fn set_demo_mode(&mut self, enabled: bool) {
        if self.demo_mode != enabled {
            self.demo_mode = enabled;
            self.emit(IdentifyEvent::DemoModeChanged(enabled));
        }
    }

    /// Identify the selected image.
    ///
    /// Returns `None` without doing anything when no image is selected or the
    /// session has no API key. Otherwise the stored result is returned: the
    /// fixed demo result in demo mode, the identifier's answer on success, or
    /// the "unknown" fallback on any failure.
    pub async fn identify(&mut self, session: &SessionState) -> Option<&PlantResult> {
        let Some(api_key) = session.api_key() else {
            tracing::debug!("identify skipped: no API key");
            return None;
        };
        let Some(image) = self.image.as_deref() else {
            tracing::debug!("identify skipped: no image selected");
            return None;
        };

        if self.demo_mode {
            tokio::time::sleep(self.demo_delay).await;
            let demo = PlantResult::demo();
            self.phase = IdentifyPhase::Success;
            self.result = Some(demo.clone());
            let _ = self.events.send(IdentifyEvent::ResultReady(demo));
            tracing::info!("demo result served");
            return self.result.as_ref();
        }

        self.phase = IdentifyPhase::Loading;
        tracing::info!(
            provider = self.identifier.name(),
            phase = %self.phase,
            "identifying plant"
        );

        let guard = LoadingGuard::engage(&mut self.is_loading, &self.events);
        let outcome = self.identifier.identify(image, api_key).await;

        let result = match outcome {
            Ok(result) => {
                self.phase = IdentifyPhase::Success;
                result
            }
            Err(error) => {
                self.phase = IdentifyPhase::Fallback;
                tracing::warn!(kind = error.kind(), %error, "identification failed; using fallback");
                PlantResult::unknown()
            }
        };
        self.result = Some(result.clone());
        let _ = guard.events.send(IdentifyEvent::ResultReady(result));
        drop(guard);

        tracing::info!(phase = %self.phase, "identification finished");
        self.result.as_ref()
    }

    fn emit(&self, event: IdentifyEvent) {
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}
