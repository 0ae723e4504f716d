use std::{future::Future, io};

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::lifecycle::ListenerHandle;

/// Close `handle` on SIGINT/SIGTERM.
///
/// The watcher exits on its own when the listener is closed some other way.
pub fn close_on_signal(handle: ListenerHandle) -> JoinHandle<()> {
    close_when(handle, termination())
}

/// Close `handle` once `signal` resolves, unless it is closed first.
pub(crate) fn close_when<F>(handle: ListenerHandle, signal: F) -> JoinHandle<()>
where
    F: Future<Output = io::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            res = signal => {
                match res {
                    Ok(()) => info!("received termination signal; shutting down"),
                    Err(e) => warn!(error = %e, "signal listener failed; shutting down"),
                }
                handle.close_or_warn("signal");
            }
            _ = handle.closed() => {}
        }
    })
}

#[cfg(unix)]
async fn termination() -> io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut term = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res,
        _ = term.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn termination() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}
