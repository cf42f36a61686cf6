// 📇 Transaction Registry - type tag → factory
//
// Built once at startup from an explicit table, read-only afterwards, so it
// can be shared across requests behind an `Arc` without locking.

use std::collections::HashMap;

use crate::error::{RegistryError, TransactionError};
use crate::transaction::{DepositFactory, TransactionFactory, WithdrawalFactory};

/// Every transaction kind this service ships with
pub fn builtin_factories() -> Vec<Box<dyn TransactionFactory>> {
    vec![Box::new(DepositFactory), Box::new(WithdrawalFactory)]
}

/// Uppercase, trimmed form used as the registry key
pub fn normalize_type(transaction_type: &str) -> String {
    transaction_type.trim().to_uppercase()
}

pub struct TransactionRegistry {
    factories: HashMap<String, Box<dyn TransactionFactory>>,
}

impl TransactionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding `builtin_factories()`
    pub fn with_builtin() -> Result<Self, RegistryError> {
        builtin_factories()
            .into_iter()
            .fold(Self::builder(), RegistryBuilder::register_boxed)
            .build()
    }

    /// Look up the factory for a caller-supplied type, case-insensitively
    pub fn resolve(&self, transaction_type: &str) -> Result<&dyn TransactionFactory, TransactionError> {
        match self.factories.get(&normalize_type(transaction_type)) {
            Some(factory) => Ok(&**factory),
            None => Err(TransactionError::UnsupportedType(transaction_type.to_string())),
        }
    }

    /// Registered type identifiers, sorted for stable output
    pub fn transaction_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self.factories.keys().cloned().collect();
        types.sort();
        types
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    factories: Vec<Box<dyn TransactionFactory>>,
}

impl RegistryBuilder {
    pub fn register<F: TransactionFactory + 'static>(self, factory: F) -> Self {
        self.register_boxed(Box::new(factory))
    }

    pub fn register_boxed(mut self, factory: Box<dyn TransactionFactory>) -> Self {
        self.factories.push(factory);
        self
    }

    /// Index factories by their self-reported type; a repeated type is a
    /// configuration error.
    pub fn build(self) -> Result<TransactionRegistry, RegistryError> {
        let mut factories = HashMap::with_capacity(self.factories.len());

        for factory in self.factories {
            let key = normalize_type(factory.transaction_type());
            if factories.contains_key(&key) {
                return Err(RegistryError::DuplicateType(key));
            }
            factories.insert(key, factory);
        }

        Ok(TransactionRegistry { factories })
    }
}
