/// Collaborators of the screen
///
/// - `api.rs` - HTTP client for the records API
/// - `location.rs` - one-shot position fix
/// - `camera.rs` - still image capture and JPEG encoding
///
/// Each collaborator sits behind a trait so the screen's effects can be
/// executed against fakes in tests.

pub mod api;
pub mod camera;
pub mod location;

use std::future::Future;
use thiserror::Error;

use crate::config::Config;
use crate::state::data::{Coordinates, NewRecord, Record};
use crate::state::screen::{CaptureOutcome, Failure, FailureKind, LocationOutcome};
use crate::state::{Effect, Message};

pub use api::{ApiError, HttpRecordsApi};
pub use camera::{CaptureError, PickerCamera};
pub use location::{DesktopLocation, LocationError};

/// Answer to a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Options for a single still capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Crop to a centred 4:3 frame
    pub allow_editing: bool,
    /// JPEG quality factor in (0, 1]
    pub quality: f32,
    /// Return the image as base64 instead of a file URI
    pub want_base64: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            allow_editing: true,
            quality: 0.5,
            want_base64: true,
        }
    }
}

/// What the camera produced
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    Cancelled,
    Uri(String),
    /// Base64 JPEG payload, without the `data:` prefix
    Base64(String),
}

/// The remote records API
pub trait RecordsApi: Send + Sync + 'static {
    /// `GET /api/places`
    fn list(&self) -> impl Future<Output = Result<Vec<Record>, ApiError>> + Send;

    /// `POST /api/places`, returning the created record
    fn create(&self, new: &NewRecord) -> impl Future<Output = Result<Record, ApiError>> + Send;
}

pub trait LocationProvider: Send + Sync + 'static {
    fn request_permission(&self) -> impl Future<Output = Permission> + Send;

    fn current_position(&self) -> impl Future<Output = Result<Coordinates, LocationError>> + Send;
}

pub trait CameraProvider: Send + Sync + 'static {
    fn request_permission(&self) -> impl Future<Output = Permission> + Send;

    fn launch(&self, options: CaptureOptions) -> impl Future<Output = Result<Capture, CaptureError>> + Send;
}

impl From<ApiError> for Failure {
    fn from(err: ApiError) -> Self {
        let kind = match err {
            ApiError::Transport(_) | ApiError::InvalidUrl(_) => FailureKind::Connection,
            ApiError::Rejected { .. } | ApiError::Decode(_) => FailureKind::Rejected,
        };
        Failure {
            kind,
            detail: err.to_string(),
        }
    }
}

/// Failure to build the desktop collaborators at startup
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Location(#[from] LocationError),
}

/// The three collaborators, shared with background tasks
pub struct Services<A, L, C> {
    pub api: A,
    pub location: L,
    pub camera: C,
}

/// Collaborators used by the desktop application
pub type DesktopServices = Services<HttpRecordsApi, DesktopLocation, PickerCamera>;

impl DesktopServices {
    /// Build the desktop collaborators from the configuration
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        Ok(Services {
            api: HttpRecordsApi::new(&config.api)?,
            location: DesktopLocation::from_config(&config.location)?,
            camera: PickerCamera::from_config(&config.camera),
        })
    }
}

impl<A, L, C> Services<A, L, C>
where
    A: RecordsApi,
    L: LocationProvider,
    C: CameraProvider,
{
    /// Execute an effect and report its outcome as a message
    pub async fn run(&self, effect: Effect) -> Message {
        match effect {
            Effect::FetchRecords => {
                let result = self.api.list().await;
                if let Err(err) = &result {
                    tracing::warn!(error = %err, "failed to load records");
                }
                Message::RecordsLoaded(result.map_err(Failure::from))
            }
            Effect::AcquireLocation => Message::LocationResolved(self.locate().await),
            Effect::CapturePhoto(options) => Message::PhotoCaptured(self.capture(options).await),
            Effect::Submit(new) => {
                let result = self.api.create(&new).await;
                if let Err(err) = &result {
                    tracing::warn!(error = %err, "failed to submit record");
                }
                Message::Submitted(result.map_err(Failure::from))
            }
        }
    }

    async fn locate(&self) -> LocationOutcome {
        if self.location.request_permission().await == Permission::Denied {
            tracing::info!("location permission denied");
            return LocationOutcome::Denied;
        }

        match self.location.current_position().await {
            Ok(coordinates) => {
                tracing::debug!(?coordinates, "position fix");
                LocationOutcome::Fixed(coordinates)
            }
            Err(err) => {
                tracing::warn!(error = %err, "position fix failed");
                LocationOutcome::Failed(err.to_string())
            }
        }
    }

    async fn capture(&self, options: CaptureOptions) -> CaptureOutcome {
        if self.camera.request_permission().await == Permission::Denied {
            tracing::info!("camera permission denied");
            return CaptureOutcome::Denied;
        }

        match self.camera.launch(options).await {
            Ok(capture) => CaptureOutcome::Captured(capture),
            Err(err) => {
                tracing::warn!(error = %err, "capture failed");
                CaptureOutcome::Failed(err.to_string())
            }
        }
    }
}
