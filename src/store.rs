//! Injectable in-memory stores for channel bindings and open conversations.
//!
//! Both stores live behind traits so a persistent or externally-synchronized
//! backend can be swapped in without touching engine logic. The in-memory
//! implementations hold process-lifetime state only; nothing survives a
//! restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::conversation::ConversationState;

/// A channel's configuration record: target task list and optional default
/// assignee. At most one binding per channel; setting either field replaces
/// the whole record atomically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelBinding {
    pub list_id: Option<String>,
    pub assignee_id: Option<String>,
}

/// Store of channel → binding records.
#[async_trait]
pub trait BindingStore: Send + Sync {
    /// Look up the binding for a channel.
    async fn get(&self, channel_id: &str) -> Option<ChannelBinding>;

    /// Replace the channel's list binding, keeping any assignee.
    async fn set_list(&self, channel_id: &str, list_id: &str);

    /// Replace the channel's default assignee, keeping any list binding.
    async fn set_assignee(&self, channel_id: &str, assignee_id: &str);

    /// All bindings, sorted by channel id for stable enumeration.
    async fn all(&self) -> Vec<(String, ChannelBinding)>;
}

/// Store of user → in-progress conversation state.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Option<ConversationState>;
    async fn put(&self, user_id: &str, state: ConversationState);
    async fn remove(&self, user_id: &str) -> Option<ConversationState>;
}

/// In-memory binding store.
#[derive(Default)]
pub struct InMemoryBindingStore {
    bindings: RwLock<HashMap<String, ChannelBinding>>,
}

impl InMemoryBindingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BindingStore for InMemoryBindingStore {
    async fn get(&self, channel_id: &str) -> Option<ChannelBinding> {
        self.bindings.read().await.get(channel_id).cloned()
    }

    async fn set_list(&self, channel_id: &str, list_id: &str) {
        let mut bindings = self.bindings.write().await;
        // Delete-then-insert: the record is replaced whole, never patched.
        let prior = bindings.remove(channel_id).unwrap_or_default();
        bindings.insert(
            channel_id.to_string(),
            ChannelBinding {
                list_id: Some(list_id.to_string()),
                assignee_id: prior.assignee_id,
            },
        );
        tracing::info!(channel = channel_id, list = list_id, "Channel mapped to task list");
    }

    async fn set_assignee(&self, channel_id: &str, assignee_id: &str) {
        let mut bindings = self.bindings.write().await;
        let prior = bindings.remove(channel_id).unwrap_or_default();
        bindings.insert(
            channel_id.to_string(),
            ChannelBinding {
                list_id: prior.list_id,
                assignee_id: Some(assignee_id.to_string()),
            },
        );
        tracing::info!(channel = channel_id, assignee = assignee_id, "Channel default assignee set");
    }

    async fn all(&self) -> Vec<(String, ChannelBinding)> {
        let mut entries: Vec<_> = self
            .bindings
            .read()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/// In-memory conversation store.
#[derive(Default)]
pub struct InMemoryConversationStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get(&self, user_id: &str) -> Option<ConversationState> {
        self.states.read().await.get(user_id).cloned()
    }

    async fn put(&self, user_id: &str, state: ConversationState) {
        self.states.write().await.insert(user_id.to_string(), state);
    }

    async fn remove(&self, user_id: &str) -> Option<ConversationState> {
        self.states.write().await.remove(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ConversationStep;
    use crate::lang::Locale;

    #[tokio::test]
    async fn set_list_replaces_prior_binding() {
        let store = InMemoryBindingStore::new();
        store.set_list("chan-1", "111111111").await;
        store.set_list("chan-1", "222222222").await;

        let all = store.all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].1.list_id.as_deref(), Some("222222222"));
    }

    #[tokio::test]
    async fn set_assignee_keeps_list_binding() {
        let store = InMemoryBindingStore::new();
        store.set_list("chan-1", "111111111").await;
        store.set_assignee("chan-1", "9876").await;

        let binding = store.get("chan-1").await.unwrap();
        assert_eq!(binding.list_id.as_deref(), Some("111111111"));
        assert_eq!(binding.assignee_id.as_deref(), Some("9876"));
    }

    #[tokio::test]
    async fn set_list_keeps_assignee() {
        let store = InMemoryBindingStore::new();
        store.set_assignee("chan-1", "9876").await;
        store.set_list("chan-1", "111111111").await;

        let binding = store.get("chan-1").await.unwrap();
        assert_eq!(binding.assignee_id.as_deref(), Some("9876"));
    }

    #[tokio::test]
    async fn unknown_channel_has_no_binding() {
        let store = InMemoryBindingStore::new();
        assert!(store.get("nope").await.is_none());
    }

    #[tokio::test]
    async fn all_is_sorted_by_channel() {
        let store = InMemoryBindingStore::new();
        store.set_list("zulu", "111111111").await;
        store.set_list("alpha", "222222222").await;

        let all = store.all().await;
        assert_eq!(all[0].0, "alpha");
        assert_eq!(all[1].0, "zulu");
    }

    #[tokio::test]
    async fn conversation_lifecycle() {
        let store = InMemoryConversationStore::new();
        assert!(store.get("user-1").await.is_none());

        store
            .put("user-1", ConversationState::new(Locale::English))
            .await;
        let state = store.get("user-1").await.unwrap();
        assert_eq!(state.step, ConversationStep::Init);

        let removed = store.remove("user-1").await;
        assert!(removed.is_some());
        assert!(store.get("user-1").await.is_none());
        assert!(store.remove("user-1").await.is_none());
    }

    #[tokio::test]
    async fn states_are_independent_per_user() {
        let store = InMemoryConversationStore::new();
        store
            .put("user-1", ConversationState::new(Locale::English))
            .await;
        store
            .put("user-2", ConversationState::new(Locale::Spanish))
            .await;

        store.remove("user-1").await;
        assert!(store.get("user-2").await.is_some());
    }
}
