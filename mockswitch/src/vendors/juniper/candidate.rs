//! The JunOS candidate configuration.
//!
//! Every editing session owns a deep copy of the running config. Edits
//! mutate the copy and record the config paths they touch; `commit`
//! swaps the copy into the running config atomically under the config
//! lock, unless another session committed an overlapping path first.

use std::collections::HashSet;

use crate::config::SwitchConfiguration;
use crate::error::RpcError;

/// A per-session candidate configuration.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The editable deep copy.
    pub config: SwitchConfiguration,

    /// Running-config generation this candidate was taken from.
    base_generation: u64,

    /// Paths edited in this candidate.
    touched: HashSet<String>,
}

impl Candidate {
    /// Take a candidate from the running config.
    pub fn new(running: &SwitchConfiguration) -> Self {
        Self {
            config: running.clone(),
            base_generation: running.generation(),
            touched: HashSet::new(),
        }
    }

    /// Record an edit to a config path.
    pub fn touch(&mut self, path: impl Into<String>) {
        self.touched.insert(path.into());
    }

    /// Whether the candidate carries uncommitted edits.
    pub fn is_dirty(&self) -> bool {
        !self.touched.is_empty()
    }

    /// Commit the candidate into the running config.
    ///
    /// The first session to commit wins: if the running config moved past
    /// this candidate's base generation on any path this candidate also
    /// touched, the commit is rejected and the candidate is preserved.
    /// On success the candidate is re-based onto the new running config.
    pub fn commit(&mut self, running: &mut SwitchConfiguration) -> Result<(), RpcError> {
        let conflict = self.touched.iter().any(|path| {
            running
                .path_generation(path)
                .is_some_and(|generation| generation > self.base_generation)
        });
        if conflict {
            return Err(RpcError::ConfigConflict);
        }

        // Swap the candidate in; the running config keeps its commit
        // history, the candidate's copy of it is stale.
        let generation_paths = std::mem::take(&mut self.touched);
        let mut next = self.config.clone();
        next.clone_commit_tracking_from(running);
        *running = next;
        running.record_commit(generation_paths);

        self.rebase(running);
        Ok(())
    }

    /// Discard edits and re-take the candidate from the running config.
    pub fn rebase(&mut self, running: &SwitchConfiguration) {
        self.config = running.clone();
        self.base_generation = running.generation();
        self.touched.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_commit() {
        let mut running = SwitchConfiguration::new("sw");
        let mut candidate = Candidate::new(&running);

        candidate.config.ensure_vlan(123).unwrap();
        candidate.touch("vlans/123");

        candidate.commit(&mut running).unwrap();
        assert!(running.has_vlan(123));
        assert_eq!(running.generation(), 1);
        assert!(!candidate.is_dirty());
    }

    #[test]
    fn test_conflicting_commit_loses() {
        let mut running = SwitchConfiguration::new("sw");
        let mut first = Candidate::new(&running);
        let mut second = Candidate::new(&running);

        first.config.ensure_vlan(123).unwrap().name = Some("first".to_string());
        first.touch("vlans/123");
        second.config.ensure_vlan(123).unwrap().name = Some("second".to_string());
        second.touch("vlans/123");

        first.commit(&mut running).unwrap();
        let err = second.commit(&mut running).unwrap_err();
        assert!(matches!(err, RpcError::ConfigConflict));

        // The winner's edit survives, the loser's candidate is intact.
        assert_eq!(running.vlan(123).unwrap().name.as_deref(), Some("first"));
        assert_eq!(
            second.config.vlan(123).unwrap().name.as_deref(),
            Some("second")
        );
        assert!(second.is_dirty());
    }

    #[test]
    fn test_disjoint_paths_commit_cleanly() {
        let mut running = SwitchConfiguration::new("sw");
        let mut first = Candidate::new(&running);
        let mut second = Candidate::new(&running);

        first.config.ensure_vlan(123).unwrap();
        first.touch("vlans/123");
        second.config.ensure_vlan(456).unwrap();
        second.touch("vlans/456");

        first.commit(&mut running).unwrap();
        // Disjoint paths: the second session still wins its own commit,
        // though its snapshot of vlan 123 is pre-first-commit.
        second.commit(&mut running).unwrap();
        assert!(running.has_vlan(456));
    }

    #[test]
    fn test_rollback() {
        let mut running = SwitchConfiguration::new("sw");
        let mut candidate = Candidate::new(&running);

        candidate.config.ensure_vlan(123).unwrap();
        candidate.touch("vlans/123");
        assert!(candidate.is_dirty());

        candidate.rebase(&running);
        assert!(!candidate.is_dirty());
        assert!(!candidate.config.has_vlan(123));
    }
}
