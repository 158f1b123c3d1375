//! Local mirrors of the authenticated user.
//!
//! The mirror is a best-effort cache for fast startup; the server's
//! session-check reply is always authoritative. Mirror IO failures are
//! logged, never surfaced.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use super::AuthenticatedUser;

/// Persistent mirror of the authenticated user.
pub trait SessionMirror: Send + Sync {
    /// Load the cached user, if any.
    fn load(&self) -> Option<AuthenticatedUser>;
    /// Replace the cached user.
    fn store(&self, user: &AuthenticatedUser);
    /// Drop the cached user.
    fn clear(&self);
}

// Lets callers keep a handle to a mirror they hand to the session manager.
impl<M: SessionMirror + ?Sized> SessionMirror for std::sync::Arc<M> {
    fn load(&self) -> Option<AuthenticatedUser> {
        (**self).load()
    }

    fn store(&self, user: &AuthenticatedUser) {
        (**self).store(user);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

/// JSON-file mirror, the browser-local-storage analog.
pub struct FileMirror {
    path: PathBuf,
}

impl FileMirror {
    /// Create a mirror backed by the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionMirror for FileMirror {
    fn load(&self) -> Option<AuthenticatedUser> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session cache");
                None
            }
        }
    }

    fn store(&self, user: &AuthenticatedUser) {
        let serialized = match serde_json::to_string(user) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "Failed to serialize session cache");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, serialized) {
            warn!(path = %self.path.display(), error = %e, "Failed to write session cache");
        }
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "Failed to clear session cache");
        }
    }
}

/// In-memory mirror for tests and mirror-less configurations.
#[derive(Default)]
pub struct MemoryMirror {
    slot: Mutex<Option<AuthenticatedUser>>,
}

impl MemoryMirror {
    /// Create an empty in-memory mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionMirror for MemoryMirror {
    fn load(&self) -> Option<AuthenticatedUser> {
        self.slot.lock().ok()?.clone()
    }

    fn store(&self, user: &AuthenticatedUser) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(user.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use printastic_core::{UserId, UserRole};

    fn sample_user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::new(1),
            email: "a@b.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role: UserRole::Client,
        }
    }

    #[test]
    fn test_memory_mirror_roundtrip() {
        let mirror = MemoryMirror::new();
        assert!(mirror.load().is_none());

        mirror.store(&sample_user());
        assert_eq!(mirror.load(), Some(sample_user()));

        mirror.clear();
        assert!(mirror.load().is_none());
    }

    #[test]
    fn test_file_mirror_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mirror = FileMirror::new(dir.path().join("session.json"));
        assert!(mirror.load().is_none());

        mirror.store(&sample_user());
        assert_eq!(mirror.load(), Some(sample_user()));

        mirror.clear();
        assert!(mirror.load().is_none());
    }

    #[test]
    fn test_file_mirror_clear_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mirror = FileMirror::new(dir.path().join("session.json"));
        mirror.clear();
        mirror.clear();
    }

    #[test]
    fn test_file_mirror_discards_corrupt_cache() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").expect("write");

        let mirror = FileMirror::new(path);
        assert!(mirror.load().is_none());
    }
}
