//! SQLite-backed validation history store.
//!
//! Records each `validate` run so the agent driver can prepend a digest of
//! the last run ("re-check previously failing items first") to the next
//! run's initial message instead of rediscovering the same issues cold.

use crate::error::{HistoryError, Result};
use crate::model::ValidationReport;
use rusqlite::{params, Connection};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

const SCHEMA_VERSION: i64 = 1;

/// At most this many runs are kept per cluster context; older ones are
/// pruned at the end of every `save_run`. spec.md §6 raises the original's
/// default of 10 to 20.
pub const DEFAULT_RETENTION: i64 = 20;

const DDL: &str = "
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS validation_runs (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    cluster_context     TEXT    NOT NULL,
    run_at              TEXT    NOT NULL,
    cluster_summary     TEXT    NOT NULL DEFAULT '',
    checks_json         TEXT    NOT NULL DEFAULT '[]',
    dashboards_json      TEXT    NOT NULL DEFAULT '[]',
    recommendations_json TEXT   NOT NULL DEFAULT '[]',
    remediation_json     TEXT   NOT NULL DEFAULT '[]',
    plan_hash           TEXT    NOT NULL DEFAULT ''
);

CREATE INDEX IF NOT EXISTS idx_runs_cluster ON validation_runs(cluster_context);
CREATE INDEX IF NOT EXISTS idx_runs_time    ON validation_runs(run_at DESC);
";

/// A decoded row, kept separate from [`ValidationReport`] because it also
/// carries `run_at` — needed for the prompt digest but not part of the
/// report itself.
struct StoredRun {
    run_at: String,
    cluster_summary: String,
    checks_json: String,
    recommendations_json: String,
    remediation_json: String,
    dashboards_json: String,
}

pub struct HistoryStore {
    conn: Connection,
}

impl HistoryStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path: PathBuf = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path).map_err(HistoryError::from)?;
        let store = HistoryStore { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// In-memory store, used by tests that don't want to touch the
    /// filesystem.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(HistoryError::from)?;
        let store = HistoryStore { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(DDL).map_err(HistoryError::from)?;
        let version: Option<i64> = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |r| r.get(0))
            .ok();
        if version.is_none() {
            self.conn
                .execute("INSERT INTO schema_version (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(HistoryError::from)?;
        }
        Ok(())
    }

    /// Persist a finished validation run and prune anything beyond
    /// [`DEFAULT_RETENTION`] for the same cluster context. Returns the new
    /// row id.
    pub fn save_run(&self, report: &ValidationReport, run_at_iso8601: &str) -> Result<i64> {
        let plan_hash = hash_report(report);
        self.conn
            .execute(
                "INSERT INTO validation_runs
                    (cluster_context, run_at, cluster_summary, checks_json,
                     dashboards_json, recommendations_json, remediation_json, plan_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    report.cluster_context,
                    run_at_iso8601,
                    report.cluster_summary,
                    serde_json::to_string(&report.checks).map_err(HistoryError::from)?,
                    serde_json::to_string(&report.dashboards_imported).map_err(HistoryError::from)?,
                    serde_json::to_string(&report.recommendations).map_err(HistoryError::from)?,
                    serde_json::to_string(&report.remediation_steps).map_err(HistoryError::from)?,
                    plan_hash,
                ],
            )
            .map_err(HistoryError::from)?;
        let run_id = self.conn.last_insert_rowid();

        self.prune(&report.cluster_context, DEFAULT_RETENTION)?;
        log::info!("saved validation run {run_id} for context {:?}", report.cluster_context);
        Ok(run_id)
    }

    fn last_run_row(&self, cluster_context: &str) -> Result<Option<StoredRun>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT run_at, cluster_summary, checks_json, recommendations_json,
                        remediation_json, dashboards_json
                 FROM validation_runs
                 WHERE cluster_context = ?1
                 ORDER BY run_at DESC
                 LIMIT 1",
            )
            .map_err(HistoryError::from)?;

        let row = stmt
            .query_row(params![cluster_context], |r| {
                Ok(StoredRun {
                    run_at: r.get(0)?,
                    cluster_summary: r.get(1)?,
                    checks_json: r.get(2)?,
                    recommendations_json: r.get(3)?,
                    remediation_json: r.get(4)?,
                    dashboards_json: r.get(5)?,
                })
            })
            .ok();
        Ok(row)
    }

    /// The most recent [`ValidationReport`] for a cluster context, if any.
    pub fn last_report(&self, cluster_context: &str) -> Result<Option<ValidationReport>> {
        let Some(row) = self.last_run_row(cluster_context)? else {
            return Ok(None);
        };
        Ok(Some(ValidationReport {
            cluster_context: cluster_context.to_string(),
            cluster_summary: row.cluster_summary,
            checks: serde_json::from_str(&row.checks_json).map_err(HistoryError::from)?,
            dashboards_imported: serde_json::from_str(&row.dashboards_json).map_err(HistoryError::from)?,
            recommendations: serde_json::from_str(&row.recommendations_json).map_err(HistoryError::from)?,
            remediation_steps: serde_json::from_str(&row.remediation_json).map_err(HistoryError::from)?,
        }))
    }

    pub fn run_count(&self, cluster_context: &str) -> Result<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM validation_runs WHERE cluster_context = ?1",
                params![cluster_context],
                |r| r.get(0),
            )
            .map_err(|e| HistoryError::from(e).into())
    }

    /// Build the textual "previous run" digest the agent driver prepends
    /// to the next `validate` run's initial message. Empty string if there
    /// is no prior run for this context.
    pub fn previous_run_summary(&self, cluster_context: &str) -> Result<String> {
        let Some(row) = self.last_run_row(cluster_context)? else {
            return Ok(String::new());
        };

        let checks: Vec<crate::model::ValidationCheck> =
            serde_json::from_str(&row.checks_json).map_err(HistoryError::from)?;
        let failed_names: Vec<String> = checks.iter().filter(|c| !c.passed).map(|c| c.name.clone()).collect();

        Ok(crate::agent::prompts::history_digest(&row.cluster_summary, &failed_names, &row.run_at))
    }

    /// Delete everything for `cluster_context` beyond the `keep` most
    /// recent rows. Returns the number of rows deleted.
    pub fn prune(&self, cluster_context: &str, keep: i64) -> Result<usize> {
        let deleted = self
            .conn
            .execute(
                "DELETE FROM validation_runs
                 WHERE cluster_context = ?1 AND id NOT IN (
                     SELECT id FROM validation_runs
                     WHERE cluster_context = ?1
                     ORDER BY run_at DESC
                     LIMIT ?2
                 )",
                params![cluster_context, keep],
            )
            .map_err(HistoryError::from)?;
        if deleted > 0 {
            log::info!("pruned {deleted} old validation runs for context {cluster_context:?}");
        }
        Ok(deleted)
    }
}

fn hash_report(report: &ValidationReport) -> String {
    let serialized = serde_json::to_string(report).unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    serialized.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ValidationCheck;

    fn sample_report(ctx: &str) -> ValidationReport {
        ValidationReport {
            cluster_context: ctx.to_string(),
            cluster_summary: "3 namespaces, 9 workloads".to_string(),
            checks: vec![
                ValidationCheck { name: "postgres-exporter-up".to_string(), passed: false, detail: "target down".to_string() },
                ValidationCheck { name: "grafana-reachable".to_string(), passed: true, detail: "ok".to_string() },
            ],
            dashboards_imported: vec![],
            recommendations: vec!["deploy postgres_exporter sidecar".to_string()],
            remediation_steps: vec![],
        }
    }

    #[test]
    fn save_then_load_round_trips_field_for_field() {
        let store = HistoryStore::open_in_memory().unwrap();
        let report = sample_report("prod-cluster");
        store.save_run(&report, "2026-07-30T00:00:00Z").unwrap();

        let loaded = store.last_report("prod-cluster").unwrap().unwrap();
        assert_eq!(loaded.cluster_summary, report.cluster_summary);
        assert_eq!(loaded.checks.len(), report.checks.len());
        assert_eq!(loaded.recommendations, report.recommendations);
    }

    #[test]
    fn digest_names_a_failed_check_from_the_prior_run() {
        let store = HistoryStore::open_in_memory().unwrap();
        store.save_run(&sample_report("prod-cluster"), "2026-07-30T00:00:00Z").unwrap();

        let digest = store.previous_run_summary("prod-cluster").unwrap();
        assert!(digest.contains("Previous validation run"));
        assert!(digest.contains("postgres-exporter-up"));
    }

    #[test]
    fn unseen_context_has_no_digest() {
        let store = HistoryStore::open_in_memory().unwrap();
        assert_eq!(store.previous_run_summary("never-seen").unwrap(), "");
    }

    #[test]
    fn prune_keeps_only_the_most_recent_runs() {
        let store = HistoryStore::open_in_memory().unwrap();
        for i in 0..25 {
            let mut report = sample_report("prod-cluster");
            report.cluster_summary = format!("run {i}");
            store.save_run(&report, &format!("2026-07-{:02}T00:00:00Z", (i % 28) + 1)).unwrap();
        }
        assert_eq!(store.run_count("prod-cluster").unwrap(), DEFAULT_RETENTION);
    }
}
