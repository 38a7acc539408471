use super::profile::OpponentProfile;
use super::snapshot::Snapshot;
use std::collections::BTreeMap;

/// the set of profiles one engine owns, keyed by opponent id. access to
/// a given opponent's profile is serialized by construction: the store
/// hands out exclusive references and is itself owned by a single task.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Store {
    profiles: BTreeMap<String, OpponentProfile>,
}

impl Store {
    pub fn profile(&mut self, id: &str) -> &mut OpponentProfile {
        self.profiles
            .entry(id.to_string())
            .or_insert_with(|| OpponentProfile::new(id))
    }
    pub fn peek(&self, id: &str) -> Option<&OpponentProfile> {
        self.profiles.get(id)
    }
    /// serializable snapshot of one opponent, if known
    pub fn export(&self, id: &str) -> Option<Snapshot> {
        self.profiles.get(id).map(Snapshot::from)
    }
    /// restore an exported profile; a version mismatch leaves the store
    /// untouched and the engine running fresh
    pub fn import(&mut self, snapshot: Snapshot) -> bool {
        match OpponentProfile::try_from(snapshot) {
            Ok(profile) => {
                self.profiles.insert(profile.id.clone(), profile);
                true
            }
            Err(stale) => {
                log::warn!("{:<32}v{}", "rejecting stale snapshot", stale);
                false
            }
        }
    }
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
    pub fn len(&self) -> usize {
        self.profiles.len()
    }
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_are_created_on_first_contact() {
        let mut store = Store::default();
        assert!(store.peek("fresh").is_none());
        store.profile("fresh");
        assert!(store.peek("fresh").is_some());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn import_replaces_by_id() {
        let mut store = Store::default();
        store.profile("x").turn = 0;
        let mut other = Store::default();
        other.profile("x").turn = 7;
        let snapshot = other.export("x").expect("profile exists");
        assert!(store.import(snapshot));
        assert_eq!(store.peek("x").map(|p| p.turn), Some(7));
    }

    #[test]
    fn stale_imports_are_refused() {
        let mut store = Store::default();
        let mut snapshot = Snapshot::from(&OpponentProfile::new("x"));
        snapshot.version = 999;
        assert!(!store.import(snapshot));
        assert!(store.peek("x").is_none());
    }
}
