//! Restorable session state.
//!
//! A snapshot is written after every state change and read once at
//! startup. Records carry an explicit `version`; anything that does not
//! decode, has another version, or breaks an invariant is rejected with a
//! [`SnapshotError`] and the caller falls back to a fresh session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::mode::{DurationSettings, Mode, POMODOROS_PER_CYCLE};
use crate::error::SnapshotError;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub mode: Mode,
    pub remaining_secs: u32,
    pub pomodoros_in_cycle: u32,
    pub completed_cycles: u32,
    pub durations: DurationSettings,
    /// Whether the countdown was live when the snapshot was taken.
    /// Restored sessions always start paused; this only feeds
    /// elapsed-time reconciliation.
    #[serde(default)]
    pub was_running: bool,
    pub saved_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode and validate a persisted record.
    pub fn decode(json: &str) -> Result<Self, SnapshotError> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        let found = raw
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        if found != u64::from(SNAPSHOT_VERSION) {
            return Err(SnapshotError::UnsupportedVersion {
                found: u32::try_from(found).unwrap_or(u32::MAX),
                expected: SNAPSHOT_VERSION,
            });
        }
        let snapshot: SessionSnapshot = serde_json::from_value(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        self.durations
            .validate()
            .map_err(|e| SnapshotError::InvariantViolated(e.to_string()))?;
        if self.pomodoros_in_cycle >= POMODOROS_PER_CYCLE {
            return Err(SnapshotError::InvariantViolated(format!(
                "pomodoros_in_cycle {} must be below {POMODOROS_PER_CYCLE}",
                self.pomodoros_in_cycle
            )));
        }
        let full = self.durations.seconds(self.mode);
        if self.remaining_secs > full {
            return Err(SnapshotError::InvariantViolated(format!(
                "remaining_secs {} exceeds {full} for {}",
                self.remaining_secs, self.mode
            )));
        }
        Ok(())
    }

    /// Replace the durations, clamping the countdown to the new length.
    pub fn with_durations(mut self, durations: DurationSettings) -> Self {
        self.durations = durations;
        self.remaining_secs = self.remaining_secs.min(durations.seconds(self.mode));
        self
    }

    /// Subtract wall-clock time elapsed since `saved_at` from a snapshot
    /// taken while running. Saturates at zero; never completes a phase.
    pub fn reconciled(mut self, now: DateTime<Utc>) -> Self {
        if self.was_running {
            let elapsed = (now - self.saved_at).num_seconds().max(0);
            let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
            self.remaining_secs = self.remaining_secs.saturating_sub(elapsed);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            mode: Mode::ShortBreak,
            remaining_secs: 120,
            pomodoros_in_cycle: 2,
            completed_cycles: 3,
            durations: DurationSettings::default(),
            was_running: false,
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn decode_accepts_encoded_snapshot() {
        let s = snapshot();
        let decoded = SessionSnapshot::decode(&s.encode().unwrap()).unwrap();
        assert_eq!(decoded, s);
    }

    #[test]
    fn decode_rejects_unversioned_records() {
        let legacy = r#"{"mode":"pomodoro","timeLeft":1500,"pomodoroCount":0}"#;
        assert!(matches!(
            SessionSnapshot::decode(legacy),
            Err(SnapshotError::UnsupportedVersion { found: 0, .. })
        ));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            SessionSnapshot::decode("{not json"),
            Err(SnapshotError::Malformed(_))
        ));
    }

    #[test]
    fn remaining_above_full_duration_is_rejected() {
        let mut s = snapshot();
        s.remaining_secs = 301;
        assert!(matches!(
            s.validate(),
            Err(SnapshotError::InvariantViolated(_))
        ));
    }

    #[test]
    fn full_cycle_counter_is_rejected() {
        let mut s = snapshot();
        s.pomodoros_in_cycle = 4;
        assert!(s.validate().is_err());
    }

    #[test]
    fn with_durations_clamps_remaining() {
        let mut shorter = DurationSettings::default();
        shorter.set(Mode::ShortBreak, 1).unwrap();
        let s = snapshot().with_durations(shorter);
        assert_eq!(s.remaining_secs, 60);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn reconcile_only_applies_to_running_snapshots() {
        let mut s = snapshot();
        let later = s.saved_at + Duration::seconds(50);
        assert_eq!(s.clone().reconciled(later).remaining_secs, 120);

        s.was_running = true;
        assert_eq!(s.clone().reconciled(later).remaining_secs, 70);
        assert_eq!(
            s.reconciled(later + Duration::hours(1)).remaining_secs,
            0
        );
    }
}
