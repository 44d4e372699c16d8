//! SQLite-backed history and profile store.
//!
//! Every mutating operation runs inside an immediate transaction so the
//! write lock is taken up front. Sequence numbers come from a per-user
//! counter row bumped with `INSERT ... ON CONFLICT ... RETURNING`, and pruning
//! happens in the same transaction as the insert.

use std::fmt;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Transaction, TransactionBehavior, params};

use super::{HistoryStore, ProfileStoreError, StoreError, TasteProfileStore};
use crate::{
    ExclusionEntry, FEEDBACK_LOG_LIMIT, FavoriteEntry, FeedbackEvent, FeedbackKind,
    InterestVector, NewRoute, NewSuggestion, ROUTE_HISTORY_LIMIT, RouteHistoryEntry,
    SUGGESTION_HISTORY_LIMIT, SuggestionHistoryEntry, TasteProfile,
};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS user_sequences (
    user_id TEXT PRIMARY KEY,
    next_value INTEGER NOT NULL
);
CREATE TABLE IF NOT EXISTS favorites (
    user_id TEXT NOT NULL,
    place_id TEXT NOT NULL,
    added_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, place_id)
);
CREATE TABLE IF NOT EXISTS exclusions (
    user_id TEXT NOT NULL,
    place_id TEXT NOT NULL,
    reason TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    expires_at INTEGER,
    PRIMARY KEY (user_id, place_id)
);
CREATE TABLE IF NOT EXISTS suggestion_history (
    user_id TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    place_id TEXT NOT NULL,
    category TEXT NOT NULL,
    suggested_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, sequence)
);
CREATE TABLE IF NOT EXISTS route_history (
    user_id TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    waypoint_ids TEXT NOT NULL,
    total_distance_m REAL NOT NULL,
    created_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, sequence)
);
CREATE TABLE IF NOT EXISTS feedback_events (
    user_id TEXT NOT NULL,
    sequence INTEGER NOT NULL,
    place_id TEXT NOT NULL,
    category TEXT NOT NULL,
    cuisine TEXT,
    kind TEXT NOT NULL,
    occurred_at INTEGER NOT NULL,
    PRIMARY KEY (user_id, sequence)
);
CREATE TABLE IF NOT EXISTS taste_profiles (
    user_id TEXT PRIMARY KEY,
    interests TEXT NOT NULL,
    version INTEGER NOT NULL
);
";

const NEXT_SEQUENCE_SQL: &str = "
INSERT INTO user_sequences (user_id, next_value) VALUES (?1, 1)
ON CONFLICT(user_id) DO UPDATE SET next_value = next_value + 1
RETURNING next_value";

/// Persistent [`HistoryStore`] and [`TasteProfileStore`] backed by SQLite.
pub struct SqliteUserStore {
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteUserStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteUserStore").finish_non_exhaustive()
    }
}

impl SqliteUserStore {
    /// Open or create a store at `path`, creating tables as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let connection = Connection::open(path).map_err(|source| StoreError::OpenDatabase {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(connection)
    }

    /// Create a store in a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(connection: Connection) -> Result<Self, StoreError> {
        connection.busy_timeout(std::time::Duration::from_secs(5))?;
        connection.execute_batch(SCHEMA)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection.lock().map_err(|_| StoreError::Poisoned)
    }

    fn write<R>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut connection = self.connection()?;
        let tx = connection.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }
}

fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| StoreError::corrupt(format!("timestamp {micros} out of range")))
}

fn to_sql_count(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn sequence_from_sql(value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::corrupt(format!("negative sequence {value}")))
}

fn next_sequence(tx: &Transaction<'_>, user_id: &str) -> Result<i64, StoreError> {
    Ok(tx.query_row(NEXT_SEQUENCE_SQL, params![user_id], |row| row.get(0))?)
}

fn prune(tx: &Transaction<'_>, table: &str, user_id: &str, keep: usize) -> Result<(), StoreError> {
    let sql = format!(
        "DELETE FROM {table} WHERE user_id = ?1 AND sequence NOT IN (
            SELECT sequence FROM {table} WHERE user_id = ?1 ORDER BY sequence DESC LIMIT ?2
        )"
    );
    tx.execute(&sql, params![user_id, to_sql_count(keep)])?;
    Ok(())
}

fn insert_suggestions(
    tx: &Transaction<'_>,
    user_id: &str,
    entries: &[NewSuggestion],
) -> Result<Vec<SuggestionHistoryEntry>, StoreError> {
    let mut stored = Vec::with_capacity(entries.len());
    for entry in entries {
        let sequence = next_sequence(tx, user_id)?;
        tx.execute(
            "INSERT INTO suggestion_history
                (user_id, sequence, place_id, category, suggested_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                sequence,
                entry.place_id,
                entry.category,
                to_micros(entry.suggested_at),
            ],
        )?;
        stored.push(SuggestionHistoryEntry {
            sequence: sequence_from_sql(sequence)?,
            place_id: entry.place_id.clone(),
            category: entry.category.clone(),
            suggested_at: entry.suggested_at,
        });
    }
    prune(tx, "suggestion_history", user_id, SUGGESTION_HISTORY_LIMIT)?;
    Ok(stored)
}

/// Insert a route row whose waypoint ids are already JSON-encoded.
fn insert_route(
    tx: &Transaction<'_>,
    user_id: &str,
    entry: &NewRoute,
    waypoints: &str,
) -> Result<u64, StoreError> {
    let sequence = next_sequence(tx, user_id)?;
    tx.execute(
        "INSERT INTO route_history
            (user_id, sequence, waypoint_ids, total_distance_m, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            user_id,
            sequence,
            waypoints,
            entry.total_distance_m,
            to_micros(entry.created_at),
        ],
    )?;
    prune(tx, "route_history", user_id, ROUTE_HISTORY_LIMIT)?;
    sequence_from_sql(sequence)
}

impl HistoryStore for SqliteUserStore {
    fn add_favorite(
        &self,
        user_id: &str,
        place_id: &str,
        added_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.write(|tx| {
            tx.execute(
                "INSERT OR IGNORE INTO favorites (user_id, place_id, added_at) VALUES (?1, ?2, ?3)",
                params![user_id, place_id, to_micros(added_at)],
            )?;
            Ok(())
        })
    }

    fn remove_favorite(&self, user_id: &str, place_id: &str) -> Result<bool, StoreError> {
        self.write(|tx| {
            let removed = tx.execute(
                "DELETE FROM favorites WHERE user_id = ?1 AND place_id = ?2",
                params![user_id, place_id],
            )?;
            Ok(removed > 0)
        })
    }

    fn favorites(&self, user_id: &str) -> Result<Vec<FavoriteEntry>, StoreError> {
        let connection = self.connection()?;
        let mut statement = connection.prepare_cached(
            "SELECT place_id, added_at FROM favorites WHERE user_id = ?1
             ORDER BY added_at DESC, place_id ASC",
        )?;
        let mut rows = statement.query(params![user_id])?;
        let mut favorites = Vec::new();
        while let Some(row) = rows.next()? {
            favorites.push(FavoriteEntry {
                place_id: row.get(0)?,
                added_at: from_micros(row.get(1)?)?,
            });
        }
        Ok(favorites)
    }

    fn is_favorite(&self, user_id: &str, place_id: &str) -> Result<bool, StoreError> {
        let connection = self.connection()?;
        let found = connection
            .query_row(
                "SELECT 1 FROM favorites WHERE user_id = ?1 AND place_id = ?2",
                params![user_id, place_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn add_exclusion(&self, user_id: &str, entry: ExclusionEntry) -> Result<(), StoreError> {
        self.write(|tx| {
            tx.execute(
                "INSERT INTO exclusions (user_id, place_id, reason, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(user_id, place_id) DO UPDATE SET
                    reason = excluded.reason,
                    created_at = excluded.created_at,
                    expires_at = excluded.expires_at",
                params![
                    user_id,
                    entry.place_id,
                    entry.reason,
                    to_micros(entry.created_at),
                    entry.expires_at.map(to_micros),
                ],
            )?;
            Ok(())
        })
    }

    fn is_excluded(
        &self,
        user_id: &str,
        place_id: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let connection = self.connection()?;
        let found = connection
            .query_row(
                "SELECT 1 FROM exclusions WHERE user_id = ?1 AND place_id = ?2
                 AND (expires_at IS NULL OR expires_at > ?3)",
                params![user_id, place_id, to_micros(now)],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn active_exclusions(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ExclusionEntry>, StoreError> {
        let connection = self.connection()?;
        let mut statement = connection.prepare_cached(
            "SELECT place_id, reason, created_at, expires_at FROM exclusions
             WHERE user_id = ?1 AND (expires_at IS NULL OR expires_at > ?2)
             ORDER BY created_at DESC, place_id ASC",
        )?;
        let mut rows = statement.query(params![user_id, to_micros(now)])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let expires_at: Option<i64> = row.get(3)?;
            entries.push(ExclusionEntry {
                place_id: row.get(0)?,
                reason: row.get(1)?,
                created_at: from_micros(row.get(2)?)?,
                expires_at: expires_at.map(from_micros).transpose()?,
            });
        }
        Ok(entries)
    }

    fn purge_expired_exclusions(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let removed = self.write(|tx| {
            Ok(tx.execute(
                "DELETE FROM exclusions WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                params![to_micros(now)],
            )?)
        })?;
        log::debug!("purged {removed} expired exclusions");
        Ok(removed)
    }

    fn add_suggestion_batch(
        &self,
        user_id: &str,
        entries: &[NewSuggestion],
    ) -> Result<Vec<SuggestionHistoryEntry>, StoreError> {
        self.write(|tx| insert_suggestions(tx, user_id, entries))
    }

    fn add_route_history(
        &self,
        user_id: &str,
        entry: NewRoute,
    ) -> Result<RouteHistoryEntry, StoreError> {
        let waypoints = serde_json::to_string(&entry.waypoint_ids)?;
        let sequence = self.write(|tx| insert_route(tx, user_id, &entry, &waypoints))?;
        Ok(RouteHistoryEntry {
            sequence,
            waypoint_ids: entry.waypoint_ids,
            total_distance_m: entry.total_distance_m,
            created_at: entry.created_at,
        })
    }

    fn record_suggestion_outcome(
        &self,
        user_id: &str,
        suggestions: &[NewSuggestion],
        route: Option<NewRoute>,
    ) -> Result<(), StoreError> {
        let route = route
            .map(|entry| Ok::<_, StoreError>((serde_json::to_string(&entry.waypoint_ids)?, entry)))
            .transpose()?;
        self.write(|tx| {
            insert_suggestions(tx, user_id, suggestions)?;
            if let Some((waypoints, entry)) = &route {
                insert_route(tx, user_id, entry, waypoints)?;
            }
            Ok(())
        })
    }

    fn suggestion_history(&self, user_id: &str) -> Result<Vec<SuggestionHistoryEntry>, StoreError> {
        let connection = self.connection()?;
        let mut statement = connection.prepare_cached(
            "SELECT sequence, place_id, category, suggested_at FROM suggestion_history
             WHERE user_id = ?1 ORDER BY sequence DESC",
        )?;
        let mut rows = statement.query(params![user_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(SuggestionHistoryEntry {
                sequence: sequence_from_sql(row.get(0)?)?,
                place_id: row.get(1)?,
                category: row.get(2)?,
                suggested_at: from_micros(row.get(3)?)?,
            });
        }
        Ok(entries)
    }

    fn route_history(&self, user_id: &str) -> Result<Vec<RouteHistoryEntry>, StoreError> {
        let connection = self.connection()?;
        let mut statement = connection.prepare_cached(
            "SELECT sequence, waypoint_ids, total_distance_m, created_at FROM route_history
             WHERE user_id = ?1 ORDER BY sequence DESC",
        )?;
        let mut rows = statement.query(params![user_id])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            let waypoints: String = row.get(1)?;
            entries.push(RouteHistoryEntry {
                sequence: sequence_from_sql(row.get(0)?)?,
                waypoint_ids: serde_json::from_str(&waypoints)?,
                total_distance_m: row.get(2)?,
                created_at: from_micros(row.get(3)?)?,
            });
        }
        Ok(entries)
    }

    fn recently_excluded_place_ids(
        &self,
        user_id: &str,
        window: usize,
    ) -> Result<Vec<String>, StoreError> {
        let connection = self.connection()?;
        let mut statement = connection.prepare_cached(
            "SELECT place_id FROM suggestion_history WHERE user_id = ?1
             ORDER BY sequence DESC LIMIT ?2",
        )?;
        let ids = statement
            .query_map(params![user_id, to_sql_count(window)], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    fn record_feedback(&self, user_id: &str, event: FeedbackEvent) -> Result<(), StoreError> {
        self.write(|tx| {
            let sequence = next_sequence(tx, user_id)?;
            tx.execute(
                "INSERT INTO feedback_events
                    (user_id, sequence, place_id, category, cuisine, kind, occurred_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user_id,
                    sequence,
                    event.place_id,
                    event.category,
                    event.cuisine,
                    event.kind.as_str(),
                    to_micros(event.occurred_at),
                ],
            )?;
            prune(tx, "feedback_events", user_id, FEEDBACK_LOG_LIMIT)
        })
    }

    fn feedback(&self, user_id: &str, limit: usize) -> Result<Vec<FeedbackEvent>, StoreError> {
        let connection = self.connection()?;
        let mut statement = connection.prepare_cached(
            "SELECT place_id, category, cuisine, kind, occurred_at FROM feedback_events
             WHERE user_id = ?1 ORDER BY sequence DESC LIMIT ?2",
        )?;
        let mut rows = statement.query(params![user_id, to_sql_count(limit)])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            let kind: String = row.get(3)?;
            events.push(FeedbackEvent {
                place_id: row.get(0)?,
                category: row.get(1)?,
                cuisine: row.get(2)?,
                kind: kind.parse::<FeedbackKind>().map_err(StoreError::corrupt)?,
                occurred_at: from_micros(row.get(4)?)?,
            });
        }
        Ok(events)
    }

    fn delete_user(&self, user_id: &str) -> Result<(), StoreError> {
        self.write(|tx| {
            for table in [
                "favorites",
                "exclusions",
                "suggestion_history",
                "route_history",
                "feedback_events",
                "taste_profiles",
                "user_sequences",
            ] {
                tx.execute(
                    &format!("DELETE FROM {table} WHERE user_id = ?1"),
                    params![user_id],
                )?;
            }
            Ok(())
        })
    }
}

impl TasteProfileStore for SqliteUserStore {
    fn get(&self, user_id: &str) -> Result<Option<TasteProfile>, ProfileStoreError> {
        let connection = self.connection()?;
        let row = connection
            .query_row(
                "SELECT interests, version FROM taste_profiles WHERE user_id = ?1",
                params![user_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()
            .map_err(StoreError::from)?;
        let Some((interests, version)) = row else {
            return Ok(None);
        };
        Ok(Some(TasteProfile {
            user_id: user_id.to_owned(),
            interests: serde_json::from_str(&interests).map_err(StoreError::from)?,
            version: sequence_from_sql(version)?,
        }))
    }

    fn update(
        &self,
        user_id: &str,
        expected_version: u64,
        interests: InterestVector,
    ) -> Result<TasteProfile, ProfileStoreError> {
        let encoded = serde_json::to_string(&interests).map_err(StoreError::from)?;
        let mut connection = self.connection()?;
        let tx = connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        let stored: Option<i64> = tx
            .query_row(
                "SELECT version FROM taste_profiles WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()
            .map_err(StoreError::from)?;
        let actual = stored.map(sequence_from_sql).transpose()?.unwrap_or(0);
        if actual != expected_version {
            return Err(ProfileStoreError::Conflict {
                expected: expected_version,
                actual,
            });
        }
        let version = actual + 1;
        let version_sql = i64::try_from(version)
            .map_err(|_| StoreError::corrupt(format!("profile version {version} overflows")))?;
        tx.execute(
            "INSERT INTO taste_profiles (user_id, interests, version) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                interests = excluded.interests,
                version = excluded.version",
            params![user_id, encoded, version_sql],
        )
        .map_err(StoreError::from)?;
        tx.commit().map_err(StoreError::from)?;
        Ok(TasteProfile {
            user_id: user_id.to_owned(),
            interests,
            version,
        })
    }

    fn delete(&self, user_id: &str) -> Result<bool, ProfileStoreError> {
        let removed = self.write(|tx| {
            Ok(tx.execute(
                "DELETE FROM taste_profiles WHERE user_id = ?1",
                params![user_id],
            )?)
        })?;
        Ok(removed > 0)
    }
}
