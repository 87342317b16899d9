//! # Axum Helpers
//!
//! Server bootstrap shared by the HTTP services.
//!
//! ## Modules
//!
//! - **[`server`]**: Router layering, health endpoint, graceful shutdown
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum::Router;
//! use axum_helpers::server::{create_production_app, create_router, ShutdownCoordinator};
//! use core_config::server::ServerConfig;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let router = create_router(Router::new());
//!     let shutdown = ShutdownCoordinator::new();
//!     shutdown.listen_for_signals();
//!
//!     create_production_app(
//!         router,
//!         &ServerConfig::default(),
//!         shutdown,
//!         Duration::from_secs(10),
//!         async { /* close connections */ },
//!     )
//!     .await
//! }
//! ```

pub mod server;

// Re-export server types
pub use server::{
    HealthResponse, ShutdownCoordinator, create_production_app, create_router, health_router,
    serve, shutdown_signal,
};
