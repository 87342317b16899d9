use super::shutdown::ShutdownCoordinator;
use axum::Router;
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};

/// Wrap application routes with the common HTTP layers.
///
/// Currently this adds request tracing at INFO level; routing and
/// fallbacks stay with the application.
pub fn create_router(routes: Router) -> Router {
    routes.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

/// Serve `router` on an already bound listener until `shutdown` resolves.
///
/// Once `shutdown` resolves the listener stops accepting connections and the
/// call returns after in-flight requests have completed.
pub async fn serve<S>(listener: TcpListener, router: Router, shutdown: S) -> io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    info!("Server starting on {}", listener.local_addr()?);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })
}

/// Production server with coordinated shutdown and cleanup.
///
/// Shutdown order:
/// 1. `coordinator` fires (signal or programmatic)
/// 2. HTTP stops accepting and in-flight requests finish
/// 3. `cleanup` runs, bounded by `shutdown_timeout`
///
/// Cleanup runs only after HTTP has stopped, so it can safely close
/// connections that request handlers use.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use axum_helpers::server::{create_production_app, ShutdownCoordinator};
///
/// let shutdown = ShutdownCoordinator::new();
/// shutdown.listen_for_signals();
///
/// create_production_app(
///     router,
///     &config,
///     shutdown,
///     Duration::from_secs(10),
///     async move { broker.flush().await.ok(); },
/// ).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    coordinator: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(server_config.address()).await?;
    let waiter = coordinator.clone();

    let serve_result = serve(listener, router, async move { waiter.wait().await }).await;

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_serve_answers_until_shutdown() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = create_router(Router::new().route("/ping", get(|| async { "pong" })));

        let coordinator = ShutdownCoordinator::new();
        let waiter = coordinator.clone();
        let server = tokio::spawn(serve(listener, router, async move { waiter.wait().await }));

        let response = raw_get(addr, "/ping").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.ends_with("pong"));

        coordinator.shutdown();
        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server should stop after shutdown")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_production_app_runs_cleanup_after_http_stops() {
        let config = ServerConfig::new("127.0.0.1", 0);
        let coordinator = ShutdownCoordinator::new();
        let cleaned = Arc::new(AtomicBool::new(false));

        let flag = cleaned.clone();
        let shutdown = coordinator.clone();
        let app = tokio::spawn(async move {
            create_production_app(
                Router::new(),
                &config,
                shutdown,
                Duration::from_secs(1),
                async move { flag.store(true, Ordering::SeqCst) },
            )
            .await
        });

        coordinator.shutdown();
        tokio::time::timeout(Duration::from_secs(5), app)
            .await
            .expect("app should stop after shutdown")
            .unwrap()
            .unwrap();

        assert!(cleaned.load(Ordering::SeqCst));
    }
}
