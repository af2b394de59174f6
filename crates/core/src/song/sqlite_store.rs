//! SQLite-backed song store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::functions::FunctionFlags;
use rusqlite::types::Null;
use rusqlite::{params, Connection, ErrorCode, ToSql};

use super::{Constraint, FieldValue, Mutation, Predicate, Song, SongError, SongStore};

const SONG_COLUMNS: &str = "id, group_name, title, release_date, text, link";

/// How long a liveness ping waits on a lock held by a catalog write.
const PROBE_BUSY_TIMEOUT: Duration = Duration::from_secs(1);

/// SQLite-backed song store.
///
/// Catalog operations share one connection. Liveness pings go through a
/// second connection so they never wait on catalog work.
pub struct SqliteSongStore {
    conn: Mutex<Connection>,
    probe: Mutex<Connection>,
}

impl SqliteSongStore {
    /// Create a new SQLite song store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, SongError> {
        let conn = Connection::open(path)?;
        Self::initialize(&conn)?;
        let probe = Connection::open(path)?;
        probe.busy_timeout(PROBE_BUSY_TIMEOUT)?;
        Ok(Self {
            conn: Mutex::new(conn),
            probe: Mutex::new(probe),
        })
    }

    /// Create an in-memory SQLite song store (useful for testing).
    pub fn in_memory() -> Result<Self, SongError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(&conn)?;
        let probe = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
            probe: Mutex::new(probe),
        })
    }

    fn initialize(conn: &Connection) -> Result<(), SongError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS songs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                group_name TEXT NOT NULL,
                title TEXT NOT NULL,
                release_date TEXT,
                text TEXT,
                link TEXT,
                UNIQUE(group_name, title)
            );

            CREATE INDEX IF NOT EXISTS idx_songs_title ON songs(title);
            CREATE INDEX IF NOT EXISTS idx_songs_release_date ON songs(release_date);
            "#,
        )?;

        // SQLite's lower() and LIKE only fold ASCII; lyrics need full Unicode.
        conn.create_scalar_function(
            "casefold",
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let value: Option<String> = ctx.get(0)?;
                Ok(value.map(|v| v.to_lowercase()))
            },
        )?;

        Ok(())
    }

    fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, SongError> {
        conn.lock()
            .map_err(|_| SongError::Database("connection lock poisoned".to_string()))
    }

    fn build_where_clause(predicate: &Predicate) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        for constraint in predicate.constraints() {
            match constraint {
                Constraint::Equals { field, value } => {
                    conditions.push(format!("{} = ?", field.column()));
                    params.push(Self::value_to_sql(value));
                }
                Constraint::ContainsIgnoreCase { field, token } => {
                    conditions.push(format!("instr(casefold({}), ?) > 0", field.column()));
                    params.push(Box::new(token.to_lowercase()));
                }
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    fn value_to_sql(value: &FieldValue) -> Box<dyn ToSql> {
        match value {
            FieldValue::Text(text) => Box::new(text.clone()),
            FieldValue::Date(date) => Box::new(*date),
        }
    }

    fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<Song> {
        Ok(Song {
            id: row.get(0)?,
            group: row.get(1)?,
            title: row.get(2)?,
            release_date: row.get(3)?,
            text: row.get(4)?,
            link: row.get(5)?,
        })
    }

    fn is_unique_violation(e: &rusqlite::Error) -> bool {
        matches!(
            e,
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }
}

impl SongStore for SqliteSongStore {
    fn create(&self, group: &str, title: &str) -> Result<Song, SongError> {
        let conn = Self::lock(&self.conn)?;

        let result = conn.query_row(
            "INSERT INTO songs (group_name, title) VALUES (?, ?) RETURNING id",
            params![group, title],
            |row| row.get::<_, i64>(0),
        );

        match result {
            Ok(id) => Ok(Song::bare(id, group, title)),
            Err(e) if Self::is_unique_violation(&e) => Err(SongError::AlreadyExists(format!(
                "group: {}, song: {}",
                group, title
            ))),
            Err(e) => Err(e.into()),
        }
    }

    fn get(&self, id: i64) -> Result<Song, SongError> {
        let conn = Self::lock(&self.conn)?;

        let result = conn.query_row(
            &format!("SELECT {} FROM songs WHERE id = ?", SONG_COLUMNS),
            params![id],
            Self::row_to_song,
        );

        match result {
            Ok(song) => Ok(song),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(SongError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    fn update_fields(&self, id: i64, mutation: &Mutation) -> Result<Song, SongError> {
        let conn = Self::lock(&self.conn)?;

        let mut sets = Vec::with_capacity(mutation.assignments().len());
        let mut params: Vec<Box<dyn ToSql>> = Vec::with_capacity(mutation.assignments().len() + 1);

        for assignment in mutation.assignments() {
            sets.push(format!("{} = ?", assignment.field.column()));
            params.push(match &assignment.value {
                Some(value) => Self::value_to_sql(value),
                None => Box::new(Null),
            });
        }
        params.push(Box::new(id));

        let sql = format!(
            "UPDATE songs SET {} WHERE id = ? RETURNING {}",
            sets.join(", "),
            SONG_COLUMNS
        );
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

        match conn.query_row(&sql, param_refs.as_slice(), Self::row_to_song) {
            Ok(song) => Ok(song),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(SongError::NotFound(id)),
            Err(e) if Self::is_unique_violation(&e) => {
                Err(SongError::AlreadyExists(format!("id: {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, id: i64) -> Result<(), SongError> {
        let conn = Self::lock(&self.conn)?;

        let affected = conn.execute("DELETE FROM songs WHERE id = ?", params![id])?;
        if affected == 0 {
            return Err(SongError::NotFound(id));
        }

        Ok(())
    }

    fn count(&self, predicate: &Predicate) -> Result<u64, SongError> {
        let conn = Self::lock(&self.conn)?;

        let (where_clause, params) = Self::build_where_clause(predicate);
        let sql = format!("SELECT COUNT(*) FROM songs {}", where_clause);
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let count: i64 = conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))?;

        Ok(count.max(0) as u64)
    }

    fn list(&self, predicate: &Predicate, offset: u64, limit: u32) -> Result<Vec<Song>, SongError> {
        let conn = Self::lock(&self.conn)?;

        let (where_clause, mut params) = Self::build_where_clause(predicate);
        let sql = format!(
            "SELECT {} FROM songs {} ORDER BY id ASC LIMIT ? OFFSET ?",
            SONG_COLUMNS, where_clause
        );

        params.push(Box::new(i64::from(limit)));
        params.push(Box::new(i64::try_from(offset).unwrap_or(i64::MAX)));
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), Self::row_to_song)?;

        let mut songs = Vec::new();
        for row in rows {
            songs.push(row?);
        }

        Ok(songs)
    }

    fn get_text(&self, id: i64) -> Result<Option<String>, SongError> {
        let conn = Self::lock(&self.conn)?;

        let result = conn.query_row(
            "SELECT text FROM songs WHERE id = ?",
            params![id],
            |row| row.get::<_, Option<String>>(0),
        );

        match result {
            Ok(text) => Ok(text),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(SongError::NotFound(id)),
            Err(e) => Err(e.into()),
        }
    }

    fn ping(&self) -> Result<(), SongError> {
        let probe = Self::lock(&self.probe)?;
        probe.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(())
    }
}
