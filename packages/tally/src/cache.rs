//! Shared cache of ingested elections.
//!
//! The cache is constructed explicitly and passed to whoever needs it.
//! Elections enter it once, fully ingested, and are never modified after.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::election::Election;
use crate::error::{Result, TallyError};
use crate::ingest::{ingest_from, IngestReport};
use crate::resource::ResourceResolver;

/// Concurrent map from election id to an immutable [`Election`].
#[derive(Debug, Default)]
pub struct ElectionCache {
    elections: RwLock<HashMap<String, Arc<Election>>>,
}

impl ElectionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a fully ingested election.
    ///
    /// Publishing is once per id: if the id is already present the cached
    /// election is kept and returned.
    pub fn publish(&self, election: Election) -> Arc<Election> {
        let mut elections = self
            .elections
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = elections.get(election.id()) {
            tracing::warn!(
                election_id = election.id(),
                "Election already published, keeping the first"
            );
            return Arc::clone(existing);
        }

        let election = Arc::new(election);
        elections.insert(election.id().to_string(), Arc::clone(&election));
        election
    }

    /// Get an election, or an empty one if it was never published.
    #[must_use]
    pub fn get(&self, election_id: &str) -> Arc<Election> {
        let elections = self
            .elections
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        match elections.get(election_id) {
            Some(election) => Arc::clone(election),
            None => {
                tracing::warn!(election_id, "Election not loaded, returning empty election");
                Arc::new(Election::empty(election_id))
            }
        }
    }

    #[must_use]
    pub fn contains(&self, election_id: &str) -> bool {
        self.elections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(election_id)
    }

    /// Ids of all published elections, sorted.
    #[must_use]
    pub fn election_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .elections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

/// Ingest several elections concurrently and publish each on completion.
///
/// Every election runs on its own scoped thread. Results are returned in the
/// order of `election_ids`; a failed election is not published.
pub fn load_elections(
    cache: &ElectionCache,
    resolver: &dyn ResourceResolver,
    election_ids: &[String],
) -> Vec<(String, Result<IngestReport>)> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = election_ids
            .iter()
            .map(|election_id| {
                let handle = scope.spawn(move || -> Result<IngestReport> {
                    let report = ingest_from(resolver, election_id)?;
                    cache.publish(report.election.clone());
                    Ok(report)
                });
                (election_id.clone(), handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(election_id, handle)| {
                let result = handle.join().unwrap_or_else(|_| {
                    Err(TallyError::ResourceResolution {
                        election_id: election_id.clone(),
                        reason: "ingestion thread panicked".to_string(),
                    })
                });
                (election_id, result)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::election::ElectionBuilder;
    use crate::types::Party;

    fn election(id: &str, party: &str) -> Election {
        let mut builder = ElectionBuilder::new(id);
        builder.add_party(Party::registered(id, party));
        builder.build()
    }

    #[test]
    fn test_get_missing_returns_empty() {
        let cache = ElectionCache::new();
        let election = cache.get("TK2099");

        assert_eq!(election.id(), "TK2099");
        assert!(election.is_empty());
        assert!(!cache.contains("TK2099"));
    }

    #[test]
    fn test_publish_once() {
        let cache = ElectionCache::new();
        cache.publish(election("TK2023", "VVD"));
        let kept = cache.publish(election("TK2023", "D66"));

        assert_eq!(kept.party_names(), vec!["VVD"]);
        assert_eq!(cache.get("TK2023").party_names(), vec!["VVD"]);
    }

    #[test]
    fn test_election_ids_sorted() {
        let cache = ElectionCache::new();
        cache.publish(election("TK2023", "VVD"));
        cache.publish(election("TK2021", "VVD"));

        assert_eq!(cache.election_ids(), vec!["TK2021", "TK2023"]);
    }

    #[test]
    fn test_concurrent_readers() {
        let cache = Arc::new(ElectionCache::new());
        cache.publish(election("TK2023", "VVD"));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get("TK2023").party_count())
            })
            .collect();

        for reader in readers {
            assert_eq!(reader.join().unwrap(), 1);
        }
    }
}
