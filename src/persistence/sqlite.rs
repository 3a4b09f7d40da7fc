use super::{CalendarStore, StoreError, StoreResult};
use crate::category::{Category, CategoryRecord};
use crate::entry::{DayEntry, NewDayEntry};
use chrono::NaiveDate;
use parking_lot::Mutex;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params};

pub struct SqliteCalendarStore {
    connection: Mutex<Connection>,
}

impl SqliteCalendarStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> StoreResult<Self> {
        let connection = Connection::open(path)?;
        Self::from_connection(connection)
    }

    pub fn in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> StoreResult<Self> {
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> StoreResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS day_entries (
                id INTEGER PRIMARY KEY,
                date TEXT NOT NULL UNIQUE,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                description TEXT
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn select_category(
        connection: &Connection,
        category: Category,
    ) -> StoreResult<Option<CategoryRecord>> {
        let mut stmt = connection.prepare_cached("SELECT id FROM categories WHERE name = ?1")?;
        let id: Option<i64> = stmt
            .query_row(params![category.as_str()], |row| row.get(0))
            .optional()?;
        Ok(id.map(|id| CategoryRecord::new(id, category)))
    }

    /// Number of stored category rows; exposed for diagnostics.
    pub fn category_count(&self) -> StoreResult<usize> {
        let conn = self.connection.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation
                && inner.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl CalendarStore for SqliteCalendarStore {
    fn find_category(&self, category: Category) -> StoreResult<Option<CategoryRecord>> {
        let conn = self.connection.lock();
        Self::select_category(&conn, category)
    }

    fn ensure_category(&self, category: Category) -> StoreResult<CategoryRecord> {
        let conn = self.connection.lock();
        conn.execute(
            "INSERT INTO categories (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![category.as_str()],
        )?;
        Self::select_category(&conn, category)?.ok_or_else(|| {
            StoreError::InvalidData(format!("category {category} missing after insert"))
        })
    }

    fn exists_between(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<bool> {
        let conn = self.connection.lock();
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM day_entries WHERE date BETWEEN ?1 AND ?2)",
            params![start, end],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn find_between(&self, start: NaiveDate, end: NaiveDate) -> StoreResult<Vec<DayEntry>> {
        let conn = self.connection.lock();
        let mut stmt = conn.prepare(
            "SELECT d.id, d.date, c.id, c.name, d.description
             FROM day_entries d
             JOIN categories c ON c.id = d.category_id
             WHERE d.date BETWEEN ?1 AND ?2
             ORDER BY d.date ASC",
        )?;
        let rows = stmt.query_map(params![start, end], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, NaiveDate>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, date, category_id, name, description) = row?;
            let name = name
                .parse::<Category>()
                .map_err(|err| StoreError::InvalidData(err.to_string()))?;
            entries.push(DayEntry {
                id,
                date,
                category: CategoryRecord::new(category_id, name),
                description,
            });
        }
        Ok(entries)
    }

    fn save_entries(&self, entries: &[NewDayEntry]) -> StoreResult<usize> {
        super::ensure_unique_dates(entries)?;
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO day_entries (date, category_id, description) VALUES (?1, ?2, ?3)",
            )?;
            for entry in entries {
                stmt.execute(params![entry.date, entry.category.id, entry.description])
                    .map_err(|err| {
                        if is_unique_violation(&err) {
                            StoreError::DuplicateDate(entry.date)
                        } else {
                            StoreError::Sqlite(err)
                        }
                    })?;
            }
        }
        tx.commit()?;
        Ok(entries.len())
    }
}
