//! Location permission and acquisition flows.
//!
//! The flows are written against [`LocationPlatform`] so they can run over
//! the shell (see `capabilities::location`) or over an in-memory double.
//! Every failure comes back as a [`LocationError`]; nothing here panics or
//! retries beyond the service-enable loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::config::RetryPolicy;
use crate::model::LocationFix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    DeniedForever,
}

/// Proof that the permission gate passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGranted;

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationError {
    #[error("location service is disabled")]
    ServiceDisabled,
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location permission permanently denied")]
    PermissionDeniedForever,
    #[error("location fix unavailable: {0}")]
    FixUnavailable(String),
}

/// Platform location service as seen from the core.
#[async_trait]
pub trait LocationPlatform: Send + Sync {
    async fn is_service_enabled(&self) -> bool;

    /// Shows the system prompt asking the user to turn location on.
    async fn request_service(&self);

    async fn permission_status(&self) -> PermissionStatus;

    async fn request_permission(&self) -> PermissionStatus;

    async fn open_app_settings(&self);

    async fn current_fix(&self) -> Result<LocationFix, String>;

    async fn pause(&self, duration: Duration);
}

/// Gate run once at mount. May show system UI as a side effect.
#[instrument(skip(platform))]
pub async fn check_permission<P>(platform: &P) -> Result<PermissionGranted, LocationError>
where
    P: LocationPlatform + ?Sized,
{
    if !platform.is_service_enabled().await {
        info!("location service disabled, prompting user");
        platform.request_service().await;
        return Err(LocationError::ServiceDisabled);
    }

    let mut status = platform.permission_status().await;
    if status == PermissionStatus::Denied {
        debug!("permission denied, requesting once");
        status = platform.request_permission().await;
    }

    match status {
        PermissionStatus::Granted => Ok(PermissionGranted),
        PermissionStatus::Denied => Err(LocationError::PermissionDenied),
        PermissionStatus::DeniedForever => {
            info!("permission permanently denied, opening app settings");
            platform.open_app_settings().await;
            Err(LocationError::PermissionDeniedForever)
        }
    }
}

/// One-shot fix. A service that stays disabled through every attempt is
/// logged and the permission step still runs.
#[instrument(skip(platform))]
pub async fn acquire_fix<P>(platform: &P, policy: &RetryPolicy) -> Result<LocationFix, LocationError>
where
    P: LocationPlatform + ?Sized,
{
    let attempts = policy.attempts.max(1);
    let mut enabled = false;

    for attempt in 1..=attempts {
        if platform.is_service_enabled().await {
            enabled = true;
            break;
        }
        debug!(attempt, attempts, "location service disabled");
        if attempt < attempts {
            platform.pause(policy.delay()).await;
        }
    }

    if !enabled {
        warn!(attempts, "location service still disabled, continuing");
    }

    let mut status = platform.permission_status().await;
    if status != PermissionStatus::Granted {
        status = platform.request_permission().await;
    }
    if status != PermissionStatus::Granted {
        warn!(?status, "no permission for a location fix");
        return Err(LocationError::FixUnavailable(format!(
            "permission {status:?}"
        )));
    }

    platform.current_fix().await.map_err(|reason| {
        warn!(%reason, "platform could not provide a fix");
        LocationError::FixUnavailable(reason)
    })
}
