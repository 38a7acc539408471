use crate::profile::Snapshot;
use anyhow::Context;

/// for types that can be written to and loaded from the local profile
/// stash. persistence is best-effort: `keep` logs failures and moves
/// on, and a missing stash simply means starting fresh.
pub trait Stash: Sized {
    /// the key this value stores under
    fn name(&self) -> String;
    /// directory holding the stash
    fn dir() -> std::path::PathBuf {
        std::env::current_dir()
            .unwrap_or_default()
            .join("profiles")
    }
    /// path to one stored entry
    fn path(id: &str) -> std::path::PathBuf {
        Self::dir().join(format!("{}.json", id))
    }
    /// is an entry already stored?
    fn stored(id: &str) -> bool {
        std::fs::metadata(Self::path(id)).is_ok()
    }
    /// write to disk
    fn save(&self) -> anyhow::Result<()>;
    /// read from disk
    fn load(id: &str) -> anyhow::Result<Self>;
    /// best-effort save; failures are reported, never propagated
    fn keep(&self) {
        match self.save() {
            Ok(()) => log::debug!("{:<32}{:<32}", "stashed profile", self.name()),
            Err(e) => log::warn!("{:<32}{:<32}", "stash unavailable", e),
        }
    }
}

impl Stash for Snapshot {
    fn name(&self) -> String {
        self.profile.id.clone()
    }
    fn save(&self) -> anyhow::Result<()> {
        let path = Self::path(&self.name());
        std::fs::create_dir_all(Self::dir()).context("create stash directory")?;
        let file = std::fs::File::create(&path)
            .with_context(|| format!("create {}", path.display()))?;
        serde_json::to_writer(file, self).context("serialize snapshot")?;
        Ok(())
    }
    fn load(id: &str) -> anyhow::Result<Self> {
        let path = Self::path(id);
        let file = std::fs::File::open(&path)
            .with_context(|| format!("open {}", path.display()))?;
        serde_json::from_reader(file).context("parse snapshot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Move;
    use crate::combat::Observation;
    use crate::profile::OpponentProfile;

    #[test]
    fn stash_round_trips_through_disk() {
        let id = "stash-round-trip";
        let mut profile = OpponentProfile::new(id);
        for t in 0..20 {
            profile.observe(Observation::new(id, t, Move::from(t), Move::from(t + 2)));
        }
        let snapshot = Snapshot::from(&profile);
        snapshot.save().expect("stash is writable");
        assert!(Snapshot::stored(id));
        let back = Snapshot::load(id).expect("stash is readable");
        assert_eq!(snapshot, back);
        let _ = std::fs::remove_file(Snapshot::path(id));
    }

    #[test]
    fn missing_entries_are_an_error_not_a_panic() {
        assert!(Snapshot::load("never-stored-anywhere").is_err());
        assert!(!Snapshot::stored("never-stored-anywhere"));
    }

    #[test]
    fn keep_swallows_failures() {
        let profile = OpponentProfile::new("keeper");
        Snapshot::from(&profile).keep();
        let _ = std::fs::remove_file(Snapshot::path("keeper"));
    }
}
