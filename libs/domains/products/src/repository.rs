use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::{CreateProduct, Product};

/// Repository trait for Product persistence
///
/// Implementations report storage failures as `ProductError::Repository`;
/// missing rows are `None`/`false`, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Store a new product and assign its id
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    /// Get a product by ID
    async fn get_by_id(&self, id: u64) -> ProductResult<Option<Product>>;

    /// Get a product by exact name
    async fn get_by_name(&self, name: &str) -> ProductResult<Option<Product>>;

    /// All products, in storage order
    async fn get_all(&self) -> ProductResult<Vec<Product>>;

    /// Replace a stored product
    async fn update(&self, product: Product) -> ProductResult<Product>;

    /// Delete a product by ID, returning whether a row was removed
    async fn delete(&self, id: u64) -> ProductResult<bool>;
}
