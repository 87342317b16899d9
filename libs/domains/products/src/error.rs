use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Invalid product data: {0}")]
    Validation(String),

    #[error("Product with id {0} does not exist")]
    NotFound(u64),

    #[error("Product with name '{0}' does not exist")]
    NameNotFound(String),

    #[error("Product with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Stock can't be negative (requested {0})")]
    NegativeStock(f64),

    #[error("Repository error: {0}")]
    Repository(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    /// Whether the caller caused this failure and could correct it.
    ///
    /// Everything except a repository failure is a violated precondition the
    /// caller can check (shape, existence, uniqueness, stock sign). A
    /// repository failure means the system could not complete a valid request.
    pub fn is_client_fault(&self) -> bool {
        !matches!(self, ProductError::Repository(_))
    }
}

impl From<validator::ValidationErrors> for ProductError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProductError::Validation(err.to_string())
    }
}
