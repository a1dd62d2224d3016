//! Shared pairing-token state.

use std::fmt;

use tokio::sync::{RwLock, RwLockReadGuard};

/// Holds the pairing token shared by every request of a client.
///
/// Readers hold a [`read`](Self::read) guard for the whole of a request, from
/// query and body construction until the response has been classified, so a
/// request never observes a token swapped mid-construction. Pairing takes the
/// write guard only to [`install`](Self::install) the new token; it waits for
/// in-flight requests to finish and blocks new ones only for the duration of
/// the assignment.
#[derive(Default)]
pub struct TokenCell {
    token: RwLock<Option<String>>,
}

impl TokenCell {
    /// Creates a cell holding `token`. An empty string counts as no token.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self { token: RwLock::new(token.filter(|t| !t.is_empty())) }
    }

    /// Acquires a read guard over the current token.
    pub async fn read(&self) -> RwLockReadGuard<'_, Option<String>> {
        self.token.read().await
    }

    /// Returns a copy of the current token.
    pub async fn get(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Replaces the token.
    pub async fn install(&self, token: String) {
        *self.token.write().await = Some(token);
    }
}

impl fmt::Debug for TokenCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.token.try_read() {
            Ok(guard) if guard.is_some() => "<redacted>",
            Ok(_) => "<none>",
            Err(_) => "<locked>",
        };
        f.debug_struct("TokenCell").field("token", &state).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;

    #[tokio::test]
    async fn test_new_filters_empty_token() {
        assert_eq!(TokenCell::new(Some(String::new())).get().await, None);
        assert_eq!(TokenCell::new(None).get().await, None);
        assert_eq!(TokenCell::new(Some("t".into())).get().await.as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_install_replaces_token() {
        let cell = TokenCell::new(Some("old".into()));
        cell.install("new".into()).await;
        assert_eq!(cell.get().await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_install_waits_for_readers() {
        let cell = Arc::new(TokenCell::new(Some("old".into())));
        let guard = cell.read().await;

        let writer = tokio::spawn({
            let cell = Arc::clone(&cell);
            async move { cell.install("new".into()).await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(guard.as_deref(), Some("old"));
        assert!(!writer.is_finished());

        drop(guard);
        writer.await.unwrap();
        assert_eq!(cell.get().await.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_debug_redacts_token() {
        let cell = TokenCell::new(Some("secret".into()));
        let debug = format!("{cell:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }
}
