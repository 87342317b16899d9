use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Product {
    /// Identifier assigned by the repository
    pub id: u64,
    /// Product name, unique across the catalog
    #[validate(length(min = 2, max = 60))]
    pub name: String,
    /// Long description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[validate(length(max = 250))]
    pub description: String,
    /// Unit of measure (unit, meters, liters, ...)
    #[validate(length(min = 1, max = 32))]
    pub unit: String,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    /// Quantity in stock
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub stock: f64,
    #[serde(default)]
    pub is_active: bool,
}

/// DTO for creating a new product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 2, max = 60))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 250))]
    pub description: String,
    #[validate(length(min = 1, max = 32))]
    pub unit: String,
    #[validate(range(exclusive_min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub stock: f64,
    #[serde(default)]
    pub is_active: bool,
}

/// Lookup by identifier (`{"id": 1}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductId {
    pub id: u64,
}

/// Lookup by name (`{"name": "Widget"}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductName {
    pub name: String,
}

/// Stock replacement (`{"id": 1, "stock": 12.5}`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub id: u64,
    pub stock: f64,
}

impl CreateProduct {
    /// Names are compared and stored without surrounding whitespace
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}

impl Product {
    /// Build the stored entity once the repository has assigned an id
    pub fn from_create(id: u64, input: CreateProduct) -> Self {
        Self {
            id,
            name: input.name,
            description: input.description,
            unit: input.unit,
            price: input.price,
            stock: input.stock,
            is_active: input.is_active,
        }
    }

    /// Names are compared and stored without surrounding whitespace
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self
    }
}
