//! In-memory implementation of ProductRepository

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, Product};
use crate::repository::ProductRepository;

#[derive(Default)]
struct Store {
    next_id: u64,
    products: BTreeMap<u64, Product>,
}

/// Process-local product store
///
/// Ids are assigned sequentially starting at 1 and `get_all` returns
/// products ordered by id. Clones share the same store.
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.products.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, input: CreateProduct) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        store.next_id += 1;
        let product = Product::from_create(store.next_id, input);
        store.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: u64) -> ProductResult<Option<Product>> {
        Ok(self.store.read().await.products.get(&id).cloned())
    }

    async fn get_by_name(&self, name: &str) -> ProductResult<Option<Product>> {
        Ok(self
            .store
            .read()
            .await
            .products
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn get_all(&self) -> ProductResult<Vec<Product>> {
        Ok(self.store.read().await.products.values().cloned().collect())
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let mut store = self.store.write().await;
        match store.products.get_mut(&product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(product)
            }
            None => Err(ProductError::NotFound(product.id)),
        }
    }

    async fn delete(&self, id: u64) -> ProductResult<bool> {
        Ok(self.store.write().await.products.remove(&id).is_some())
    }
}
