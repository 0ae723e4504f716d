use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use triad_core::ListenerHandle;

use crate::error::ServeError;

/// Bind the tier's listener. Failing here is the one error that aborts startup.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ServeError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })
}

/// Serve `router` until `handle` is closed.
///
/// In-flight requests finish before this returns, which is what lets a stop
/// handler answer its caller and still take the listener down.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    handle: ListenerHandle,
) -> Result<(), ServeError> {
    let addr = listener.local_addr()?;
    let shutdown = {
        let handle = handle.clone();
        async move { handle.closed().await }
    };

    let res = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await;

    if !handle.is_closed() {
        handle.close_or_warn("server exit");
    }
    res?;
    info!(%addr, "server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::routing::get;

    use super::*;

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let taken = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = taken.local_addr().unwrap();

        let err = bind(addr).await.unwrap_err();
        assert!(matches!(err, ServeError::Bind { addr: a, .. } if a == addr));
    }

    #[tokio::test]
    async fn serve_returns_once_closed() {
        let listener = bind("127.0.0.1:0".parse().unwrap()).await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = ListenerHandle::new();
        let router = Router::new().route("/", get(|| async { "up" }));

        let server = tokio::spawn(serve(listener, router, handle.clone()));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(tokio::net::TcpStream::connect(addr).await.is_ok());

        handle.close().unwrap();
        tokio::time::timeout(Duration::from_secs(2), server)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert!(tokio::net::TcpStream::connect(addr).await.is_err());
    }
}
