//! Server infrastructure module.
//!
//! This module provides:
//! - Router layering (HTTP tracing)
//! - Liveness endpoint
//! - Graceful shutdown coordination with post-shutdown cleanup
//!
//! # Example
//!
//! ```ignore
//! use axum_helpers::server::{create_router, health_router};
//! use core_config::app_info;
//!
//! let app = create_router(api_routes).merge(health_router(app_info!()));
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

// Re-export commonly used types and functions
pub use app::{create_production_app, create_router, serve};
pub use health::{HealthResponse, health_router};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
