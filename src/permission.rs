use anyhow::Result;
use futures::future::BoxFuture;

use crate::track::TrackDescriptor;

/// Context handed to a permission authority alongside the track, so an
/// interactive authority can render a meaningful prompt.
#[derive(Debug, Clone)]
pub struct PermissionContext {
    /// Id of the session asking for permission.
    pub session_id: String,
    /// Human-readable destination summary.
    pub destination: String,
}

/// Async gate consulted before recording may begin.
///
/// The authority may do arbitrarily long interactive work (e.g. prompting a
/// user). Returning `Ok(false)` is a denial, not an error; `Err` means the
/// request itself failed and is surfaced to the `start` caller.
#[async_trait::async_trait]
pub trait PermissionAuthority: Send + Sync {
    async fn request(&self, ctx: &PermissionContext, track: &TrackDescriptor) -> Result<bool>;
}

/// Authority that grants every request. Sessions built without an authority
/// behave as if this one were installed.
pub struct AllowAll;

#[async_trait::async_trait]
impl PermissionAuthority for AllowAll {
    async fn request(&self, _ctx: &PermissionContext, _track: &TrackDescriptor) -> Result<bool> {
        Ok(true)
    }
}

/// Adapter that lets an async closure serve as a `PermissionAuthority`.
pub struct PermissionFn<F>(F);

impl<F> PermissionFn<F>
where
    F: Fn(PermissionContext, TrackDescriptor) -> BoxFuture<'static, Result<bool>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait::async_trait]
impl<F> PermissionAuthority for PermissionFn<F>
where
    F: Fn(PermissionContext, TrackDescriptor) -> BoxFuture<'static, Result<bool>> + Send + Sync,
{
    async fn request(&self, ctx: &PermissionContext, track: &TrackDescriptor) -> Result<bool> {
        (self.0)(ctx.clone(), track.clone()).await
    }
}
