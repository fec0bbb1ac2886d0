use async_trait::async_trait;
use crux_core::capability::{Capability, CapabilityContext, Operation};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::location::{
    self, LocationError, LocationPlatform, PermissionGranted, PermissionStatus,
};
use crate::model::LocationFix;

/// Requests the core sends to the platform location service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum LocationOperation {
    IsServiceEnabled,
    RequestService,
    CheckPermission,
    RequestPermission,
    OpenAppSettings,
    CurrentFix,
    Pause { millis: u64 },
    /// Streams `LocationOutput::Fix` until `StopWatching`.
    Watch,
    StopWatching,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LocationOutput {
    ServiceEnabled(bool),
    Permission(PermissionStatus),
    Fix(LocationFix),
    Failed { reason: String },
    Done,
}

impl Operation for LocationOperation {
    type Output = LocationOutput;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(pub u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Live-location stream owned by the model.
///
/// Dropping the handle tells the shell to stop watching and silences the
/// forwarding task, so no update reaches the app afterwards.
pub struct LocationSubscription {
    id: SubscriptionId,
    cancelled: Arc<AtomicBool>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl LocationSubscription {
    fn new(id: SubscriptionId, cancelled: Arc<AtomicBool>, release: Box<dyn FnOnce() + Send>) -> Self {
        Self {
            id,
            cancelled,
            release: Some(release),
        }
    }

    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Drop for LocationSubscription {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        if let Some(release) = self.release.take() {
            debug!(subscription = %self.id, "releasing location subscription");
            release();
        }
    }
}

impl fmt::Debug for LocationSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationSubscription")
            .field("id", &self.id)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

pub struct Location<Ev> {
    context: CapabilityContext<LocationOperation, Ev>,
}

impl<Ev> Clone for Location<Ev> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
        }
    }
}

impl<Ev> Capability<Ev> for Location<Ev> {
    type Operation = LocationOperation;
    type MappedSelf<MappedEv> = Location<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Location::new(self.context.map_event(f))
    }
}

impl<Ev> Location<Ev> {
    pub fn new(context: CapabilityContext<LocationOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Location<Ev>
where
    Ev: Send + 'static,
{
    pub fn check_permission<F>(&self, callback: F)
    where
        F: FnOnce(Result<PermissionGranted, LocationError>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let outcome = location::check_permission(&ctx).await;
            ctx.update_app(callback(outcome));
        });
    }

    pub fn acquire_fix<F>(&self, policy: RetryPolicy, callback: F)
    where
        F: FnOnce(Result<LocationFix, LocationError>) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let outcome = location::acquire_fix(&ctx, &policy).await;
            ctx.update_app(callback(outcome));
        });
    }

    /// Opens the continuous fix stream. Keep the returned handle alive for as
    /// long as updates are wanted.
    pub fn watch<F>(&self, id: SubscriptionId, on_update: F) -> LocationSubscription
    where
        F: Fn(LocationFix) -> Ev + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&cancelled);
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let mut stream = std::pin::pin!(ctx.stream_from_shell(LocationOperation::Watch));
            while let Some(output) = stream.next().await {
                if flag.load(Ordering::Acquire) {
                    debug!(subscription = %id, "subscription released, dropping update");
                    break;
                }
                match output {
                    LocationOutput::Fix(fix) => ctx.update_app(on_update(fix)),
                    LocationOutput::Failed { reason } => {
                        warn!(subscription = %id, %reason, "location stream error");
                    }
                    other => debug!(subscription = %id, ?other, "ignoring stream output"),
                }
            }
        });

        let stop = self.context.clone();
        LocationSubscription::new(
            id,
            cancelled,
            Box::new(move || {
                let ctx = stop.clone();
                stop.spawn(async move {
                    ctx.notify_shell(LocationOperation::StopWatching).await;
                });
            }),
        )
    }
}

#[async_trait]
impl<Ev> LocationPlatform for CapabilityContext<LocationOperation, Ev>
where
    Ev: Send + 'static,
{
    async fn is_service_enabled(&self) -> bool {
        match self.request_from_shell(LocationOperation::IsServiceEnabled).await {
            LocationOutput::ServiceEnabled(enabled) => enabled,
            other => {
                warn!(?other, "unexpected reply to service check");
                false
            }
        }
    }

    async fn request_service(&self) {
        self.request_from_shell(LocationOperation::RequestService).await;
    }

    async fn permission_status(&self) -> PermissionStatus {
        permission_from(self.request_from_shell(LocationOperation::CheckPermission).await)
    }

    async fn request_permission(&self) -> PermissionStatus {
        permission_from(self.request_from_shell(LocationOperation::RequestPermission).await)
    }

    async fn open_app_settings(&self) {
        self.request_from_shell(LocationOperation::OpenAppSettings).await;
    }

    async fn current_fix(&self) -> Result<LocationFix, String> {
        match self.request_from_shell(LocationOperation::CurrentFix).await {
            LocationOutput::Fix(fix) => Ok(fix),
            LocationOutput::Failed { reason } => Err(reason),
            other => Err(format!("unexpected reply {other:?}")),
        }
    }

    async fn pause(&self, duration: Duration) {
        let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.request_from_shell(LocationOperation::Pause { millis }).await;
    }
}

fn permission_from(output: LocationOutput) -> PermissionStatus {
    match output {
        LocationOutput::Permission(status) => status,
        other => {
            warn!(?other, "unexpected reply to permission query");
            PermissionStatus::Denied
        }
    }
}
