//! Shared fixtures for AI gateway tests
#![allow(dead_code)]

use ai_gateway::config::Config;
use ai_gateway::contract::{ChatCompletion, ChatRequest, ProviderKind, TokenUsage};
use ai_gateway::domain::crypto::KeyCipher;
use ai_gateway::domain::{ChatProvider, ProviderCredential, ProviderError, ProviderRegistry, Service};
use async_trait::async_trait;
use brainforge_kit::{Role, SecurityCtx};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_SECRET: &str = "gateway-test-secret";

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

pub fn member() -> SecurityCtx {
    let id = Uuid::new_v4();
    SecurityCtx::new(id, format!("{}@example.com", id), Role::Member)
}

pub fn admin() -> SecurityCtx {
    let id = Uuid::new_v4();
    SecurityCtx::new(id, format!("{}@example.com", id), Role::Admin)
}

pub fn completion(provider: ProviderKind, model: &str, input: u32, output: u32) -> ChatCompletion {
    ChatCompletion {
        provider,
        model: model.to_string(),
        content: "mock reply".to_string(),
        usage: TokenUsage {
            input_tokens: input,
            output_tokens: output,
        },
        finish_reason: Some("stop".to_string()),
    }
}

/// Scripted provider; answers from a queue, then with a default completion
pub struct MockProvider {
    kind: ProviderKind,
    replies: Mutex<VecDeque<Result<ChatCompletion, ProviderError>>>,
    validation: Mutex<Result<(), ProviderError>>,
    credentials: Mutex<Vec<ProviderCredential>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    pub fn new(kind: ProviderKind) -> Arc<Self> {
        Arc::new(Self {
            kind,
            replies: Mutex::new(VecDeque::new()),
            validation: Mutex::new(Ok(())),
            credentials: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn reply(&self, reply: Result<ChatCompletion, ProviderError>) {
        self.replies.lock().push_back(reply);
    }

    pub fn set_validation(&self, result: Result<(), ProviderError>) {
        *self.validation.lock() = result;
    }

    /// Credentials seen by `complete` and `validate`, in order
    pub fn credentials(&self) -> Vec<ProviderCredential> {
        self.credentials.lock().clone()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn default_model(&self) -> &str {
        self.kind.builtin_model()
    }

    async fn complete(
        &self,
        credential: &ProviderCredential,
        request: &ChatRequest,
    ) -> Result<ChatCompletion, ProviderError> {
        self.credentials.lock().push(credential.clone());
        self.requests.lock().push(request.clone());

        let model = request.model.clone().unwrap_or_else(|| self.default_model().to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(completion(self.kind, &model, 10, 5)))
    }

    async fn validate(&self, credential: &ProviderCredential) -> Result<(), ProviderError> {
        self.credentials.lock().push(credential.clone());
        self.validation.lock().clone()
    }
}

pub mod mocks {
    use ai_gateway::contract::{ProviderKind, UsageRecord, UserAiKey};
    use ai_gateway::domain::{AiKeyRepository, StoredKey, UsageRepository};
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use parking_lot::RwLock;
    use std::collections::HashMap;
    use std::sync::Arc;
    use uuid::Uuid;

    /// In-memory keys and usage rows
    #[derive(Default)]
    pub struct MockStore {
        keys: RwLock<HashMap<(Uuid, ProviderKind), StoredKey>>,
        usage: RwLock<Vec<UsageRecord>>,
    }

    impl MockStore {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn stored(&self, user_id: Uuid, provider: ProviderKind) -> Option<StoredKey> {
            self.keys.read().get(&(user_id, provider)).cloned()
        }

        pub fn usage_rows(&self) -> Vec<UsageRecord> {
            self.usage.read().clone()
        }

        pub fn push_usage(&self, record: UsageRecord) {
            self.usage.write().push(record);
        }

        pub fn print_state(&self, context: &str) {
            println!("\n📊 Store state: {}", context);
            for ((user, provider), stored) in self.keys.read().iter() {
                println!(
                    "   key {} / {}: hint={} active={} default={}",
                    user, provider, stored.key.key_hint, stored.key.is_active, stored.key.is_default
                );
            }
            println!("   usage rows: {}", self.usage.read().len());
        }
    }

    #[async_trait]
    impl AiKeyRepository for MockStore {
        async fn find(&self, user_id: Uuid, provider: ProviderKind) -> Result<Option<StoredKey>> {
            Ok(self.stored(user_id, provider))
        }

        async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<UserAiKey>> {
            let mut keys: Vec<UserAiKey> = self
                .keys
                .read()
                .values()
                .filter(|s| s.key.user_id == user_id)
                .map(|s| s.key.clone())
                .collect();
            keys.sort_by(|a, b| a.provider.as_str().cmp(b.provider.as_str()));
            Ok(keys)
        }

        async fn find_default(&self, user_id: Uuid) -> Result<Option<UserAiKey>> {
            Ok(self
                .keys
                .read()
                .values()
                .find(|s| s.key.user_id == user_id && s.key.is_default)
                .map(|s| s.key.clone()))
        }

        async fn create(&self, key: &StoredKey) -> Result<UserAiKey> {
            let mut keys = self.keys.write();
            let slot = (key.key.user_id, key.key.provider);
            if keys.contains_key(&slot) {
                anyhow::bail!("duplicate key for user and provider");
            }
            keys.insert(slot, key.clone());
            Ok(key.key.clone())
        }

        async fn update(&self, key: &StoredKey) -> Result<UserAiKey> {
            let mut keys = self.keys.write();
            let slot = (key.key.user_id, key.key.provider);
            if !keys.contains_key(&slot) {
                anyhow::bail!("key not found");
            }
            keys.insert(slot, key.clone());
            Ok(key.key.clone())
        }

        async fn delete(&self, user_id: Uuid, provider: ProviderKind) -> Result<bool> {
            Ok(self.keys.write().remove(&(user_id, provider)).is_some())
        }

        async fn set_default(&self, user_id: Uuid, provider: ProviderKind) -> Result<()> {
            for stored in self.keys.write().values_mut() {
                if stored.key.user_id == user_id {
                    stored.key.is_default = stored.key.provider == provider;
                }
            }
            Ok(())
        }
    }

    #[async_trait]
    impl UsageRepository for MockStore {
        async fn record(&self, record: &UsageRecord) -> Result<()> {
            self.usage.write().push(record.clone());
            Ok(())
        }

        async fn list_for_user(&self, user_id: Uuid, limit: u64, offset: u64) -> Result<Vec<UsageRecord>> {
            let mut rows: Vec<UsageRecord> = self
                .usage
                .read()
                .iter()
                .filter(|r| r.user_id == user_id)
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect())
        }

        async fn count_for_user(&self, user_id: Uuid) -> Result<u64> {
            Ok(self.usage.read().iter().filter(|r| r.user_id == user_id).count() as u64)
        }

        async fn list_in_range(
            &self,
            user_id: Option<Uuid>,
            from: Option<DateTime<Utc>>,
            to: Option<DateTime<Utc>>,
        ) -> Result<Vec<UsageRecord>> {
            Ok(self
                .usage
                .read()
                .iter()
                .filter(|r| user_id.map_or(true, |u| r.user_id == u))
                .filter(|r| from.map_or(true, |f| r.created_at >= f))
                .filter(|r| to.map_or(true, |t| r.created_at < t))
                .cloned()
                .collect())
        }
    }
}

pub struct TestEnv {
    pub service: Arc<Service>,
    pub store: Arc<mocks::MockStore>,
    providers: HashMap<ProviderKind, Arc<MockProvider>>,
}

impl TestEnv {
    pub fn provider(&self, kind: ProviderKind) -> Arc<MockProvider> {
        self.providers[&kind].clone()
    }
}

/// Config used by service tests: OpenAI default, system keys for Groq and OpenAI
pub fn test_config() -> Config {
    let mut config = Config {
        encryption_secret: TEST_SECRET.to_string(),
        ..Config::default()
    };
    config.providers.groq.api_key = Some("sys-groq-key".to_string());
    config.providers.openai.api_key = Some("sys-openai-key".to_string());
    config
}

pub fn create_test_service() -> TestEnv {
    create_test_service_with(test_config())
}

pub fn create_test_service_with(config: Config) -> TestEnv {
    let store = mocks::MockStore::new();
    let providers: HashMap<ProviderKind, Arc<MockProvider>> = ProviderKind::ALL
        .iter()
        .map(|kind| (*kind, MockProvider::new(*kind)))
        .collect();
    let registry = ProviderRegistry::new(
        providers
            .values()
            .map(|p| p.clone() as Arc<dyn ChatProvider>)
            .collect(),
    );

    let cipher = KeyCipher::new(&config.encryption_secret).expect("test secret is valid");
    let service = Arc::new(Service::new(store.clone(), store.clone(), registry, cipher, config));

    TestEnv {
        service,
        store,
        providers,
    }
}
