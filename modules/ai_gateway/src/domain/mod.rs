//! Domain layer - business logic and services

pub mod crypto;
pub mod pricing;
pub mod provider;
pub mod repository;
pub mod service;
pub mod usage;
pub mod validation;

pub use provider::{ChatProvider, ProviderCredential, ProviderError, ProviderRegistry};
pub use repository::{AiKeyRepository, StoredKey, UsageRepository};
pub use service::Service;
