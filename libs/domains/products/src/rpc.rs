//! Bus subject naming shared by the gateway and the workers.
//!
//! Each operation is addressed as `<prefix>.<operation>`, e.g.
//! `products.getbyid`. Both services derive their subject sets from
//! [`Operation::ALL`], so the two sides cannot drift apart.

use std::str::FromStr;
use strum::{AsRefStr, Display, EnumString};

/// One request/reply operation on the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    Create,
    GetById,
    GetByName,
    GetAll,
    Update,
    Delete,
    UpdateStock,
}

impl Operation {
    pub const ALL: [Operation; 7] = [
        Operation::Create,
        Operation::GetById,
        Operation::GetByName,
        Operation::GetAll,
        Operation::Update,
        Operation::Delete,
        Operation::UpdateStock,
    ];

    /// Subject suffix (`create`, `getbyid`, ...)
    pub fn suffix(&self) -> &str {
        self.as_ref()
    }
}

/// Subject set rooted at a configurable prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subjects {
    prefix: String,
}

impl Subjects {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn subject(&self, operation: Operation) -> String {
        format!("{}.{}", self.prefix, operation.suffix())
    }

    /// Resolve a subject back to its operation; `None` outside this prefix
    pub fn operation(&self, subject: &str) -> Option<Operation> {
        let suffix = subject
            .strip_prefix(self.prefix.as_str())?
            .strip_prefix('.')?;
        Operation::from_str(suffix).ok()
    }

    /// Every `(operation, subject)` pair under this prefix
    pub fn all(&self) -> impl Iterator<Item = (Operation, String)> + '_ {
        Operation::ALL
            .into_iter()
            .map(move |operation| (operation, self.subject(operation)))
    }
}

impl Default for Subjects {
    fn default() -> Self {
        Self::new("products")
    }
}
