use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::SessionError;
use crate::lifecycle::Lifecycle;

/// Outcome of [`SessionStore::set_plan_hash`]: the plan hash is
/// write-once per session unless an explicit overwrite audit record is
/// produced (spec §3, Invariant 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanHashOutcome {
    /// No prior hash existed; the given hash is now stored.
    Stored,
    /// A prior hash existed and was identical; nothing changed.
    Unchanged,
    /// A prior hash existed and differed; the new hash was stored and
    /// an audit record documenting the overwrite was appended.
    Overwritten { previous: String },
}

/// Per-session persistent state: lifecycle, plan hash, plan context,
/// and per-concern audit logs. Backed by plain files under
/// `<state_dir>/<session_id>/`; every write is atomic (write-temp,
/// rename) so a crash mid-write never leaves a torn file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session_dir: PathBuf,
}

impl SessionStore {
    pub fn new(state_dir: impl AsRef<Path>, session_id: impl AsRef<str>) -> Self {
        Self {
            session_dir: state_dir.as_ref().join(session_id.as_ref()),
        }
    }

    fn lifecycle_path(&self) -> PathBuf {
        self.session_dir.join("lifecycle")
    }

    fn plan_hash_path(&self) -> PathBuf {
        self.session_dir.join("plan_hash")
    }

    fn plan_context_path(&self) -> PathBuf {
        self.session_dir.join("plan_context.json")
    }

    fn audit_log_path(&self, concern: &str) -> PathBuf {
        self.session_dir.join(format!("audit-{concern}.log"))
    }

    /// Write `contents` to `path` atomically: write to a sibling
    /// temporary file, then rename over the destination. Creates the
    /// parent directory if absent.
    fn atomic_write(&self, path: &Path, contents: &str) -> Result<(), SessionError> {
        let parent = path.parent().unwrap_or(&self.session_dir);
        std::fs::create_dir_all(parent).map_err(|source| SessionError::WriteFailed {
            path: parent.to_path_buf(),
            source,
        })?;

        let tmp_path = path.with_extension(format!(
            "tmp-{}",
            std::process::id()
        ));
        std::fs::write(&tmp_path, contents).map_err(|source| SessionError::WriteFailed {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, path).map_err(|source| SessionError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    fn read_string(&self, path: &Path) -> Result<Option<String>, SessionError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Ok(Some(contents.trim().to_string())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SessionError::ReadFailed {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Current lifecycle state. Defaults to `Init` if no state file
    /// exists yet (spec §3: "Initial value INIT").
    pub fn get_state(&self) -> Lifecycle {
        match self.read_string(&self.lifecycle_path()) {
            Ok(Some(raw)) => serde_json::from_str(&format!("\"{raw}\"")).unwrap_or_default(),
            Ok(None) => Lifecycle::default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read lifecycle state, defaulting to INIT");
                Lifecycle::default()
            }
        }
    }

    /// Transition to `next`. Rejects back-transitions per the
    /// monotonic partial order (spec §3, Invariant 1).
    pub fn set_state(&self, next: Lifecycle) -> Result<(), SessionError> {
        let current = self.get_state();
        if !current.can_transition_to(next) {
            return Err(SessionError::BackTransition { from: current, to: next });
        }
        let serialized = serde_json::to_string(&next).expect("Lifecycle serializes infallibly");
        let raw = serialized.trim_matches('"');
        self.atomic_write(&self.lifecycle_path(), raw)
    }

    /// The currently stored plan hash, if any.
    pub fn get_plan_hash(&self) -> Result<Option<String>, SessionError> {
        self.read_string(&self.plan_hash_path())
    }

    /// Bind `hash` as the session's plan hash. Write-once: a second
    /// call with a different hash still stores the new value (the
    /// plan-immutability hook, H7, is what actually enforces rejection
    /// on mismatch for `verify` actions) but appends an
    /// overwrite-audit record so the write-once violation is never
    /// silent (spec §3, Invariant 2).
    pub fn set_plan_hash(&self, hash: &str) -> Result<PlanHashOutcome, SessionError> {
        let outcome = match self.get_plan_hash()? {
            None => PlanHashOutcome::Stored,
            Some(ref existing) if existing == hash => PlanHashOutcome::Unchanged,
            Some(existing) => PlanHashOutcome::Overwritten { previous: existing },
        };

        if !matches!(outcome, PlanHashOutcome::Unchanged) {
            self.atomic_write(&self.plan_hash_path(), hash)?;
            self.atomic_write(
                &self.plan_context_path(),
                &serde_json::to_string(&PlanContext {
                    hash: hash.to_string(),
                    stored_at: Utc::now(),
                })
                .expect("PlanContext serializes infallibly"),
            )?;
        }

        if let PlanHashOutcome::Overwritten { previous } = &outcome {
            self.append_audit(
                "plan",
                &format!("plan_hash overwritten: previous={previous} new={hash}"),
            )?;
        }

        Ok(outcome)
    }

    /// The stored `{ hash, stored_at }` plan context, if any.
    pub fn plan_context(&self) -> Result<Option<PlanContext>, SessionError> {
        match self.read_string(&self.plan_context_path())? {
            None => Ok(None),
            Some(raw) => {
                serde_json::from_str(&raw)
                    .map(Some)
                    .map_err(|source| SessionError::Corrupt {
                        path: self.plan_context_path(),
                        source,
                    })
            }
        }
    }

    /// Append a plain-text audit line `[<ISO-8601 timestamp>]
    /// <message>` to the log for `concern` (spec §6). The log is
    /// append-only and never truncated by the gateway.
    pub fn append_audit(&self, concern: &str, message: &str) -> Result<(), SessionError> {
        use std::io::Write;

        let path = self.audit_log_path(concern);
        std::fs::create_dir_all(&self.session_dir).map_err(|source| SessionError::WriteFailed {
            path: self.session_dir.clone(),
            source,
        })?;

        let line = format!("[{}] {}\n", Utc::now().to_rfc3339(), message);
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SessionError::WriteFailed { path: path.clone(), source })?;
        file.write_all(line.as_bytes())
            .map_err(|source| SessionError::WriteFailed { path, source })
    }

    /// Read all lines previously appended to the `concern` audit log.
    pub fn read_audit(&self, concern: &str) -> Result<Vec<String>, SessionError> {
        match self.read_string(&self.audit_log_path(concern))? {
            None => Ok(Vec::new()),
            Some(contents) => Ok(contents.lines().map(str::to_string).collect()),
        }
    }
}

/// `{ hash, stored_at }` as named in spec §3 "plan_context".
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlanContext {
    pub hash: String,
    pub stored_at: chrono::DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_session_starts_at_init() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), "s1");
        assert_eq!(store.get_state(), Lifecycle::Init);
    }

    #[test]
    fn forward_transitions_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), "s1");
        store.set_state(Lifecycle::Active).unwrap();
        assert_eq!(store.get_state(), Lifecycle::Active);
        store.set_state(Lifecycle::Closed).unwrap();
        assert_eq!(store.get_state(), Lifecycle::Closed);
    }

    #[test]
    fn back_transition_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), "s1");
        store.set_state(Lifecycle::Active).unwrap();
        let err = store.set_state(Lifecycle::Init).unwrap_err();
        assert!(matches!(err, SessionError::BackTransition { .. }));
        // state is unchanged after the rejected attempt
        assert_eq!(store.get_state(), Lifecycle::Active);
    }

    #[test]
    fn plan_hash_is_write_once_then_overwrite_audited() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), "s1");

        assert_eq!(store.get_plan_hash().unwrap(), None);
        assert_eq!(store.set_plan_hash("hash-a").unwrap(), PlanHashOutcome::Stored);
        assert_eq!(store.get_plan_hash().unwrap(), Some("hash-a".to_string()));

        assert_eq!(
            store.set_plan_hash("hash-a").unwrap(),
            PlanHashOutcome::Unchanged
        );

        let outcome = store.set_plan_hash("hash-b").unwrap();
        assert_eq!(
            outcome,
            PlanHashOutcome::Overwritten { previous: "hash-a".to_string() }
        );
        assert_eq!(store.get_plan_hash().unwrap(), Some("hash-b".to_string()));

        let audit = store.read_audit("plan").unwrap();
        assert_eq!(audit.len(), 1);
        assert!(audit[0].contains("plan_hash overwritten"));
        assert!(audit[0].contains("previous=hash-a"));
        assert!(audit[0].contains("new=hash-b"));
    }

    #[test]
    fn plan_context_tracks_current_hash() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), "s1");
        store.set_plan_hash("hash-a").unwrap();
        let ctx = store.plan_context().unwrap().unwrap();
        assert_eq!(ctx.hash, "hash-a");
    }

    #[test]
    fn audit_log_is_append_only_plain_text_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path(), "s1");
        store.append_audit("write_file", "ALLOWED write_file: path=foo.py").unwrap();
        store.append_audit("write_file", "ALLOWED write_file: path=bar.py").unwrap();
        let lines = store.read_audit("write_file").unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].contains("ALLOWED write_file: path=foo.py"));
    }

    #[test]
    fn sessions_are_isolated_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let a = SessionStore::new(dir.path(), "a");
        let b = SessionStore::new(dir.path(), "b");
        a.set_state(Lifecycle::Active).unwrap();
        assert_eq!(a.get_state(), Lifecycle::Active);
        assert_eq!(b.get_state(), Lifecycle::Init);
    }
}
