//! Repository hooks: how a repository is told to synchronize.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Interval used when a repository declares no polling hook.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// The kind of a hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    /// Synchronize on a fixed interval.
    Polling,
    /// Synchronize when notified by the remote. Accepted but not acted on.
    Webhook,
    /// Any hook type this version does not know about.
    #[serde(other)]
    Unknown,
}

/// A hook attached to a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    /// Hook type.
    #[serde(rename = "type")]
    pub kind: HookKind,

    /// Polling interval. Zero disables polling.
    #[serde(default, with = "duration_secs")]
    pub interval: Duration,
}

impl Hook {
    /// Creates a polling hook with the given interval.
    pub fn polling(interval: Duration) -> Self {
        Self {
            kind: HookKind::Polling,
            interval,
        }
    }

    /// Creates a webhook hook.
    pub fn webhook() -> Self {
        Self {
            kind: HookKind::Webhook,
            interval: Duration::ZERO,
        }
    }

    /// Returns true if this is a polling hook.
    pub fn is_polling(&self) -> bool {
        self.kind == HookKind::Polling
    }
}

/// Serializes durations as whole seconds.
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
