use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PersistSource {
    Server,
    LocalOnly,
}

/// Result of a best-effort mutation.
///
/// `source` is `Server` only when the backend acknowledged the change. `persisted` is true
/// when the change is durable somewhere: on the server, or at least in the local store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistOutcome {
    pub persisted: bool,
    pub source: PersistSource,
}

impl PersistOutcome {
    pub fn from_parts(local_saved: bool, server_saved: bool) -> Self {
        Self {
            persisted: local_saved || server_saved,
            source: if server_saved {
                PersistSource::Server
            } else {
                PersistSource::LocalOnly
            },
        }
    }

    pub fn reached_server(&self) -> bool {
        self.source == PersistSource::Server
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert_eq!(
            PersistOutcome::from_parts(true, true),
            PersistOutcome { persisted: true, source: PersistSource::Server }
        );
        assert_eq!(
            PersistOutcome::from_parts(true, false),
            PersistOutcome { persisted: true, source: PersistSource::LocalOnly }
        );
        assert_eq!(
            PersistOutcome::from_parts(false, false),
            PersistOutcome { persisted: false, source: PersistSource::LocalOnly }
        );
        assert!(PersistOutcome::from_parts(false, true).reached_server());
    }

    #[test]
    fn test_source_serializes_kebab_case() {
        let json = serde_json::to_string(&PersistSource::LocalOnly).unwrap();
        assert_eq!(json, "\"local-only\"");
    }
}
