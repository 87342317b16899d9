//! Products Domain
//!
//! This module provides the product catalog: entity, validation rules,
//! business operations and the bus subject names they are served on.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │     RPC     │  ← Subject names shared by gateway and workers
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation (ProductUsecase)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, commands
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use domain_products::{InMemoryProductRepository, ProductService, ProductUsecase};
//!
//! # async fn example() -> Result<(), domain_products::ProductError> {
//! let service = ProductService::new(InMemoryProductRepository::new());
//! let products = service.get_all().await?;
//! assert!(products.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod repository;
pub mod rpc;
pub mod service;

// Re-export commonly used types
pub use error::{ProductError, ProductResult};
pub use memory::InMemoryProductRepository;
pub use models::{CreateProduct, Product, ProductId, ProductName, StockUpdate};
pub use repository::ProductRepository;
pub use rpc::{Operation, Subjects};
pub use service::{ProductService, ProductUsecase};
