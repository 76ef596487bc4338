// ── Update observers ──
//
// One polymorphic capability with two concrete forms, so the dispatch
// loop never inspects callables at run time. Observers run sequentially
// in registration order; a deferred observer is awaited before the next
// one fires, which keeps ordering guarantees intact for its siblings.

use std::fmt;

use futures_util::future::BoxFuture;

use crate::device::Device;

type ImmediateFn = Box<dyn Fn(&Device) + Send + Sync>;
type DeferredFn = Box<dyn for<'a> Fn(&'a Device) -> BoxFuture<'a, ()> + Send + Sync>;

/// A consumer callback invoked after every device refresh.
pub enum UpdateObserver {
    /// Runs synchronously on the refresh path.
    Immediate(ImmediateFn),
    /// Returns a future that is awaited on the refresh path.
    Deferred(DeferredFn),
}

impl UpdateObserver {
    /// Wrap a synchronous callback.
    pub fn immediate<F>(callback: F) -> Self
    where
        F: Fn(&Device) + Send + Sync + 'static,
    {
        Self::Immediate(Box::new(callback))
    }

    /// Wrap an asynchronous callback.
    pub fn deferred<F>(callback: F) -> Self
    where
        F: for<'a> Fn(&'a Device) -> BoxFuture<'a, ()> + Send + Sync + 'static,
    {
        Self::Deferred(Box::new(callback))
    }

    pub(crate) async fn notify(&self, device: &Device) {
        match self {
            Self::Immediate(callback) => callback(device),
            Self::Deferred(callback) => callback(device).await,
        }
    }
}

impl fmt::Debug for UpdateObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Immediate(_) => f.write_str("UpdateObserver::Immediate"),
            Self::Deferred(_) => f.write_str("UpdateObserver::Deferred"),
        }
    }
}
