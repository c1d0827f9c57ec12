/// Desktop location provider
///
/// Desktops rarely have a GPS, so a fix comes either from fixed
/// coordinates in the config or from a one-shot HTTP lookup (IP
/// geolocation). Turning the provider off in the config is how the user
/// "denies" the permission.

use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::{LocationProvider, Permission};
use crate::config::{LocationConfig, LocationMode};
use crate::state::data::Coordinates;

/// Lookups are one-shot; don't let a dead endpoint hang the button forever
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location lookup failed: {0}")]
    Lookup(#[from] reqwest::Error),
    #[error("location service answered with status {0}")]
    Status(u16),
    #[error("location service sent no coordinates: {0}")]
    BadResponse(#[from] serde_json::Error),
    #[error("invalid location lookup URL {0:?}")]
    InvalidUrl(String),
}

/// Lookup response; accepts both `latitude`/`longitude` and `lat`/`lon`
#[derive(Debug, Deserialize)]
struct LookupFix {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lon")]
    longitude: f64,
}

#[derive(Debug, Clone)]
enum Source {
    Fixed(Coordinates),
    Lookup { client: Client, url: Url },
}

#[derive(Debug, Clone)]
pub struct DesktopLocation {
    enabled: bool,
    source: Source,
}

impl DesktopLocation {
    pub fn from_config(config: &LocationConfig) -> Result<Self, LocationError> {
        let source = match config.mode {
            LocationMode::Fixed => Source::Fixed(Coordinates {
                latitude: config.latitude,
                longitude: config.longitude,
            }),
            LocationMode::Lookup => Source::Lookup {
                client: Client::builder().timeout(LOOKUP_TIMEOUT).build()?,
                url: Url::parse(&config.lookup_url)
                    .map_err(|_| LocationError::InvalidUrl(config.lookup_url.clone()))?,
            },
        };

        Ok(Self {
            enabled: config.enabled,
            source,
        })
    }
}

impl LocationProvider for DesktopLocation {
    async fn request_permission(&self) -> Permission {
        if self.enabled {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        match &self.source {
            Source::Fixed(coordinates) => Ok(*coordinates),
            Source::Lookup { client, url } => {
                tracing::debug!(%url, "location lookup");
                let response = client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LocationError::Status(status.as_u16()));
                }

                let body = response.bytes().await?;
                let fix: LookupFix = serde_json::from_slice(&body)?;
                Ok(Coordinates {
                    latitude: fix.latitude,
                    longitude: fix.longitude,
                })
            }
        }
    }
}
