use std::sync::Arc;
use serde_json::Value;
use tokio::sync::RwLock;

/// Ordered, append-only sequence of uploaded JSON values.
///
/// Lives for the lifetime of the process and is shared between handlers
/// behind an `Arc`. Uploads take the write lock, reads take a snapshot.
#[derive(Default)]
pub struct PayloadStore {
    inner: RwLock<Vec<Value>>,
}

impl PayloadStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Append a value at the end and return the item count including it.
    ///
    /// `observe` receives that count while the write lock is still held, so
    /// observers see lengths in the same order the appends happened.
    pub async fn append_with<F>(&self, value: Value, observe: F) -> usize
    where
        F: FnOnce(usize),
    {
        let mut items = self.inner.write().await;
        items.push(value);
        let total = items.len();
        observe(total);
        total
    }

    /// Snapshot of every item in insertion order.
    pub async fn list(&self) -> Vec<Value> {
        self.inner.read().await.clone()
    }

    #[cfg(test)]
    pub async fn append(&self, value: Value) -> usize {
        self.append_with(value, |_| {}).await
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
