use super::profile::OpponentProfile;
use crate::SNAPSHOT_VERSION;

/// versioned carrier for one opponent profile across process lifetimes.
/// the payload layout is opaque to callers; the only promise is
/// round-trip fidelity within one engine version. an unknown version is
/// rejected on import, never migrated.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub profile: OpponentProfile,
}

impl From<&OpponentProfile> for Snapshot {
    fn from(profile: &OpponentProfile) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            profile: profile.clone(),
        }
    }
}

impl TryFrom<Snapshot> for OpponentProfile {
    type Error = u32;
    fn try_from(snapshot: Snapshot) -> Result<Self, Self::Error> {
        match snapshot.version {
            SNAPSHOT_VERSION => Ok(snapshot.profile),
            stale => Err(stale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Move;
    use crate::combat::Observation;

    #[test]
    fn snapshot_round_trips_exactly() {
        let mut profile = OpponentProfile::new("x");
        for t in 0..50 {
            profile.observe(Observation::new("x", t, Move::from(t), Move::from(t * 2)));
        }
        let snapshot = Snapshot::from(&profile);
        let json = serde_json::to_string(&snapshot).expect("profiles serialize");
        let back = serde_json::from_str::<Snapshot>(&json).expect("snapshots parse");
        let restored = OpponentProfile::try_from(back).expect("version matches");
        assert_eq!(profile, restored);
    }

    #[test]
    fn stale_versions_are_rejected() {
        let profile = OpponentProfile::new("x");
        let mut snapshot = Snapshot::from(&profile);
        snapshot.version += 1;
        assert!(OpponentProfile::try_from(snapshot).is_err());
    }
}
