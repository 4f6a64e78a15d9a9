//! The JunOS NETCONF adapter boundary.
//!
//! Transport, framing, and XML encoding live outside this crate; the
//! adapter works on typed RPCs and mutates the same switch configuration
//! the CLI does, through a per-session candidate with the same
//! commit-conflict rule.

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;
use super::show;
use crate::config::SharedConfig;
use crate::error::RpcError;
use crate::preload::{self, StaticConfig};

/// Which datastore an RPC addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Datastore {
    /// The committed running configuration.
    Running,
    /// This session's candidate.
    Candidate,
}

/// A decoded NETCONF RPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rpc {
    /// `<get-config>`.
    GetConfig {
        /// Datastore to render.
        source: Datastore,
    },
    /// `<edit-config>`; the payload reuses the pre-load document type.
    EditConfig {
        /// Target datastore; only the candidate is writable.
        target: Datastore,
        /// Configuration to merge.
        config: StaticConfig,
    },
    /// `<commit>`.
    Commit,
    /// `<discard-changes>`.
    DiscardChanges,
    /// `<close-session>`.
    CloseSession,
}

/// A typed RPC reply for the transport to encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RpcReply {
    /// `<ok/>`.
    Ok,
    /// `<data>` carrying rendered configuration text.
    Data {
        /// JunOS-format configuration text.
        config: String,
    },
    /// `<rpc-error>`.
    Error {
        /// Error message.
        message: String,
    },
}

/// One NETCONF session against a switch.
pub struct NetconfSession {
    config: SharedConfig,
    candidate: Option<Candidate>,
    closed: bool,
}

impl NetconfSession {
    /// Open a session against the shared switch configuration.
    pub fn new(config: SharedConfig) -> Self {
        Self {
            config,
            candidate: None,
            closed: false,
        }
    }

    /// Whether `<close-session>` was processed.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Handle one RPC.
    pub async fn handle(&mut self, rpc: Rpc) -> RpcReply {
        match rpc {
            Rpc::GetConfig {
                source: Datastore::Running,
            } => {
                let running = self.config.lock().await;
                RpcReply::Data {
                    config: show::render(&running).join("\n"),
                }
            }
            Rpc::GetConfig {
                source: Datastore::Candidate,
            } => {
                let running = self.config.lock().await;
                let candidate = match &self.candidate {
                    Some(candidate) => candidate.clone(),
                    None => Candidate::new(&running),
                };
                RpcReply::Data {
                    config: show::render(&candidate.config).join("\n"),
                }
            }
            Rpc::EditConfig { target, config } => {
                if target != Datastore::Candidate {
                    return RpcReply::Error {
                        message: "only the candidate datastore is writable".to_string(),
                    };
                }
                let running = self.config.lock().await;
                let candidate = self
                    .candidate
                    .get_or_insert_with(|| Candidate::new(&running));
                if let Err(err) = preload::apply(&mut candidate.config, &config) {
                    return RpcReply::Error {
                        message: err.to_string(),
                    };
                }
                for path in preload::touched_paths(&config) {
                    candidate.touch(path);
                }
                RpcReply::Ok
            }
            Rpc::Commit => {
                let Some(candidate) = &mut self.candidate else {
                    return RpcReply::Ok; // nothing to commit
                };
                let mut running = self.config.lock().await;
                match candidate.commit(&mut running) {
                    Ok(()) => {
                        let delay = running.commit_delay;
                        if !delay.is_zero() {
                            // Commit delay is observed while the lock is
                            // held, exactly like the CLI.
                            tokio::time::sleep(delay).await;
                        }
                        drop(running);
                        self.candidate = None;
                        RpcReply::Ok
                    }
                    Err(RpcError::ConfigConflict) => RpcReply::Error {
                        message: "configuration database modified".to_string(),
                    },
                    Err(err) => RpcReply::Error {
                        message: err.to_string(),
                    },
                }
            }
            Rpc::DiscardChanges => {
                self.candidate = None;
                RpcReply::Ok
            }
            Rpc::CloseSession => {
                self.candidate = None;
                self.closed = true;
                RpcReply::Ok
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::SwitchConfiguration;
    use crate::preload::VlanDecl;

    fn shared() -> SharedConfig {
        Arc::new(tokio::sync::Mutex::new(SwitchConfiguration::new("switch")))
    }

    fn vlan_edit(number: i64, name: &str) -> Rpc {
        Rpc::EditConfig {
            target: Datastore::Candidate,
            config: StaticConfig {
                vlans: vec![VlanDecl {
                    number,
                    name: Some(name.to_string()),
                }],
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn test_edit_commit_get() {
        let config = shared();
        let mut session = NetconfSession::new(config.clone());

        assert_eq!(session.handle(vlan_edit(123, "shizzle")).await, RpcReply::Ok);
        // Not yet in running.
        assert!(!config.lock().await.has_vlan(123));

        assert_eq!(session.handle(Rpc::Commit).await, RpcReply::Ok);
        assert!(config.lock().await.has_vlan(123));

        let reply = session
            .handle(Rpc::GetConfig {
                source: Datastore::Running,
            })
            .await;
        match reply {
            RpcReply::Data { config } => assert!(config.contains("vlan-id 123;")),
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_discard_changes() {
        let config = shared();
        let mut session = NetconfSession::new(config.clone());

        session.handle(vlan_edit(123, "shizzle")).await;
        session.handle(Rpc::DiscardChanges).await;
        session.handle(Rpc::Commit).await;
        assert!(!config.lock().await.has_vlan(123));
    }

    #[tokio::test]
    async fn test_commit_conflict() {
        let config = shared();
        let mut first = NetconfSession::new(config.clone());
        let mut second = NetconfSession::new(config.clone());

        first.handle(vlan_edit(100, "first")).await;
        second.handle(vlan_edit(100, "second")).await;

        assert_eq!(first.handle(Rpc::Commit).await, RpcReply::Ok);
        match second.handle(Rpc::Commit).await {
            RpcReply::Error { message } => {
                assert_eq!(message, "configuration database modified");
            }
            other => panic!("unexpected reply {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_running_datastore_not_writable() {
        let mut session = NetconfSession::new(shared());
        let reply = session
            .handle(Rpc::EditConfig {
                target: Datastore::Running,
                config: StaticConfig::default(),
            })
            .await;
        assert!(matches!(reply, RpcReply::Error { .. }));
    }

    #[tokio::test]
    async fn test_close_session() {
        let mut session = NetconfSession::new(shared());
        assert_eq!(session.handle(Rpc::CloseSession).await, RpcReply::Ok);
        assert!(session.is_closed());
    }
}
