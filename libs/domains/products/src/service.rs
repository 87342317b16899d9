//! Product Service - Business logic layer

use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product};
use crate::repository::ProductRepository;

/// Operations the catalog offers to its callers.
///
/// Every failure is a [`ProductError`]; callers use
/// [`ProductError::is_client_fault`] to tell a correctable request from a
/// system failure.
#[async_trait]
pub trait ProductUsecase: Send + Sync {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product>;

    async fn get_by_id(&self, id: u64) -> ProductResult<Product>;

    async fn get_by_name(&self, name: &str) -> ProductResult<Product>;

    async fn get_all(&self) -> ProductResult<Vec<Product>>;

    async fn update(&self, product: Product) -> ProductResult<Product>;

    async fn delete(&self, id: u64) -> ProductResult<()>;

    /// Replace the stock of an existing product
    async fn update_stock(&self, id: u64, stock: f64) -> ProductResult<Product>;
}

/// Product service providing business logic operations
///
/// The service layer handles validation, business rules, and orchestrates
/// repository operations.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }
}

#[async_trait]
impl<R: ProductRepository + 'static> ProductUsecase for ProductService<R> {
    #[instrument(skip(self, input), fields(product_name = %input.name))]
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let input = input.normalized();

        if self.repository.get_by_name(&input.name).await?.is_some() {
            return Err(ProductError::DuplicateName(input.name));
        }

        input.validate()?;

        self.repository.create(input).await
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: u64) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    #[instrument(skip(self))]
    async fn get_by_name(&self, name: &str) -> ProductResult<Product> {
        self.repository
            .get_by_name(name)
            .await?
            .ok_or_else(|| ProductError::NameNotFound(name.to_string()))
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        self.repository.get_all().await
    }

    #[instrument(skip(self, product), fields(product_id = product.id))]
    async fn update(&self, product: Product) -> ProductResult<Product> {
        let product = product.normalized();

        // The name may stay the same, but may not collide with another product
        if let Some(existing) = self.repository.get_by_name(&product.name).await? {
            if existing.id != product.id {
                return Err(ProductError::DuplicateName(product.name));
            }
        }

        product.validate()?;

        if self.repository.get_by_id(product.id).await?.is_none() {
            return Err(ProductError::NotFound(product.id));
        }

        self.repository.update(product).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: u64) -> ProductResult<()> {
        if self.repository.get_by_id(id).await?.is_none() {
            return Err(ProductError::NotFound(id));
        }

        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(ProductError::NotFound(id))
        }
    }

    #[instrument(skip(self))]
    async fn update_stock(&self, id: u64, stock: f64) -> ProductResult<Product> {
        let mut product = self.get_by_id(id).await?;

        if stock < 0.0 {
            return Err(ProductError::NegativeStock(stock));
        }

        product.stock = stock;
        self.update(product).await
    }
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use mockall::predicate::eq;

    fn widget(id: u64) -> Product {
        Product {
            id,
            name: "Widget".to_string(),
            description: String::new(),
            unit: "unit".to_string(),
            price: 9.99,
            stock: 5.0,
            is_active: true,
        }
    }

    fn create_input(name: &str) -> CreateProduct {
        CreateProduct {
            name: name.to_string(),
            description: String::new(),
            unit: "unit".to_string(),
            price: 9.99,
            stock: 0.0,
            is_active: false,
        }
    }

    #[tokio::test]
    async fn test_create_trims_name_before_persisting() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_name().returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .withf(|input| input.name == "Widget")
            .returning(|input| Ok(Product::from_create(1, input)));

        let service = ProductService::new(mock_repo);
        let product = service.create(create_input("  Widget ")).await.unwrap();

        assert_eq!(product.id, 1);
        assert_eq!(product.name, "Widget");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_name()
            .returning(|_| Ok(Some(widget(1))));
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let err = service.create(create_input("Widget")).await.unwrap_err();

        assert!(matches!(err, ProductError::DuplicateName(ref name) if name == "Widget"));
        assert!(err.is_client_fault());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_name().returning(|_| Ok(None));
        mock_repo.expect_create().never();

        let service = ProductService::new(mock_repo);
        let err = service.create(create_input("W")).await.unwrap_err();

        assert!(matches!(err, ProductError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_persistence_outage_is_server_fault() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_name().returning(|_| Ok(None));
        mock_repo
            .expect_create()
            .returning(|_| Err(ProductError::Repository("connection refused".into())));

        let service = ProductService::new(mock_repo);
        let err = service.create(create_input("Widget")).await.unwrap_err();

        assert!(!err.is_client_fault());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(999))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let err = service.get_by_id(999).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound(999)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[tokio::test]
    async fn test_update_allows_keeping_own_name() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_name()
            .returning(|_| Ok(Some(widget(1))));
        mock_repo
            .expect_get_by_id()
            .with(eq(1))
            .returning(|id| Ok(Some(widget(id))));
        mock_repo.expect_update().returning(Ok);

        let service = ProductService::new(mock_repo);
        let mut changed = widget(1);
        changed.price = 12.0;

        let updated = service.update(changed).await.unwrap();
        assert_eq!(updated.price, 12.0);
    }

    #[tokio::test]
    async fn test_update_rejects_name_of_other_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_name()
            .returning(|_| Ok(Some(widget(1))));
        mock_repo.expect_update().never();

        let service = ProductService::new(mock_repo);
        let err = service.update(widget(2)).await.unwrap_err();

        assert!(matches!(err, ProductError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_update_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_name().returning(|_| Ok(None));
        mock_repo.expect_get_by_id().returning(|_| Ok(None));
        mock_repo.expect_update().never();

        let service = ProductService::new(mock_repo);
        let err = service.update(widget(7)).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound(7)));
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_get_by_id().returning(|_| Ok(None));
        mock_repo.expect_delete().never();

        let service = ProductService::new(mock_repo);
        let err = service.delete(3).await.unwrap_err();

        assert!(matches!(err, ProductError::NotFound(3)));
    }

    #[tokio::test]
    async fn test_update_stock_rejects_negative_values() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(Some(widget(id))));
        mock_repo.expect_update().never();

        let service = ProductService::new(mock_repo);
        let err = service.update_stock(1, -3.0).await.unwrap_err();

        assert!(matches!(err, ProductError::NegativeStock(_)));
        assert!(err.is_client_fault());
    }

    #[tokio::test]
    async fn test_update_stock_persists_new_value() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .returning(|id| Ok(Some(widget(id))));
        mock_repo
            .expect_get_by_name()
            .returning(|_| Ok(Some(widget(1))));
        mock_repo
            .expect_update()
            .withf(|product| product.stock == 42.0)
            .returning(Ok);

        let service = ProductService::new(mock_repo);
        let product = service.update_stock(1, 42.0).await.unwrap();

        assert_eq!(product.stock, 42.0);
    }
}
