//! Credential source collaborator

use std::sync::Arc;

use parking_lot::RwLock;

/// Supplies the single active API credential
///
/// Backed by secure storage in an application; the client only ever asks
/// for the current value.
pub trait CredentialSource: Send + Sync + 'static {
    fn credential(&self) -> Option<String>;
}

/// A credential fixed at construction
#[derive(Debug, Clone, Default)]
pub struct StaticCredential(Option<String>);

impl StaticCredential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Some(key.into()))
    }

    /// A source that never has a credential
    pub fn none() -> Self {
        Self(None)
    }
}

impl CredentialSource for StaticCredential {
    fn credential(&self) -> Option<String> {
        self.0.clone().filter(|key| !key.is_empty())
    }
}

/// A credential that can be swapped at runtime (login, logout)
///
/// Cloning creates a new handle to the SAME slot.
#[derive(Debug, Clone, Default)]
pub struct SharedCredential {
    slot: Arc<RwLock<Option<String>>>,
}

impl SharedCredential {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>) {
        *self.slot.write() = Some(key.into());
    }

    pub fn clear(&self) {
        *self.slot.write() = None;
    }
}

impl CredentialSource for SharedCredential {
    fn credential(&self) -> Option<String> {
        self.slot.read().clone().filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_credential() {
        assert_eq!(StaticCredential::new("abc").credential().as_deref(), Some("abc"));
        assert_eq!(StaticCredential::none().credential(), None);
        assert_eq!(StaticCredential::new("").credential(), None);
    }

    #[test]
    fn test_shared_credential_swaps() {
        let source = SharedCredential::new();
        let handle = source.clone();
        assert_eq!(source.credential(), None);

        handle.set("key-1");
        assert_eq!(source.credential().as_deref(), Some("key-1"));

        handle.clear();
        assert_eq!(source.credential(), None);
    }
}
