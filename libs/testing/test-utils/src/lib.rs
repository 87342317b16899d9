//! Shared test utilities
//!
//! - `TestNats`: NATS container with automatic cleanup (feature: "nats")
//! - `TestDataBuilder`: deterministic, collision-free test data (always available)
//!
//! # NATS Testing
//!
//! Add `features = ["nats"]` to your dev-dependencies:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { workspace = true, features = ["nats"] }
//! ```
//!
//! ```rust,ignore
//! use test_utils::TestNats;
//!
//! #[tokio::test]
//! #[ignore] // Requires Docker
//! async fn my_nats_test() {
//!     let nats = TestNats::new().await;
//!     let client = nats.client();
//! }
//! ```

#[cfg(feature = "nats")]
mod nats;

#[cfg(feature = "nats")]
pub use nats::TestNats;

/// Builder for test data with deterministic randomization
///
/// Each test derives its own seed from its name, so names generated by
/// concurrently running tests never collide on shared state (a bus subject,
/// a repository with a uniqueness rule).
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_product");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Unique name for a resource
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(7);
    /// assert_eq!(builder.name("product", "widget"), "test-product-7-widget");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Unique bus subject prefix, so tests sharing a broker stay isolated
    pub fn subject_prefix(&self, base: &str) -> String {
        format!("{}-{:x}", base, self.seed)
    }

    /// Unique queue group name
    pub fn queue_group(&self, base: &str) -> String {
        format!("{}-{:x}", base, self.seed)
    }
}
