//! Database queries for memory operations
//!
//! CRUD plus the query executor that lowers a [`SearchFilters`] bundle
//! into one bounded, recency-ordered SQL query.

use chrono::{DateTime, Datelike, Utc};
use rusqlite::{params, Connection, Row};

use crate::error::{MemoirError, Result};
use crate::query::{DateFilter, SearchFilters};
use crate::types::{Memory, NewMemory};

/// Parse a memory from a database row
pub fn memory_from_row(row: &Row) -> rusqlite::Result<Memory> {
    let id: i64 = row.get("id")?;
    let owner_id: String = row.get("owner_id")?;
    let title: String = row.get("title")?;
    let description: String = row.get("description")?;
    let transcript: String = row.get("transcript")?;
    let emotion_str: Option<String> = row.get("emotion_tag")?;
    let has_audio: i32 = row.get("has_audio")?;
    let has_photos: i32 = row.get("has_photos")?;
    let has_files: i32 = row.get("has_files")?;
    let created_at: String = row.get("created_at")?;

    Ok(Memory {
        id,
        owner_id,
        title,
        description,
        transcript,
        emotion: emotion_str.and_then(|s| s.parse().ok()),
        has_audio: has_audio != 0,
        has_photos: has_photos != 0,
        has_files: has_files != 0,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

/// Create a new memory
pub fn create_memory(conn: &Connection, input: &NewMemory) -> Result<Memory> {
    if input.owner_id.is_empty() {
        return Err(MemoirError::InvalidInput(
            "Memory owner cannot be empty".to_string(),
        ));
    }

    let now = Utc::now();
    conn.execute(
        "INSERT INTO memories (owner_id, title, description, transcript, emotion_tag,
                               has_audio, has_photos, has_files, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            input.owner_id,
            input.title,
            input.description,
            input.transcript,
            input.emotion.map(|e| e.as_str()),
            input.has_audio,
            input.has_photos,
            input.has_files,
            now.to_rfc3339(),
        ],
    )?;

    get_memory(conn, conn.last_insert_rowid())
}

/// Get a memory by ID
pub fn get_memory(conn: &Connection, id: i64) -> Result<Memory> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, owner_id, title, description, transcript, emotion_tag,
                has_audio, has_photos, has_files, created_at
         FROM memories
         WHERE id = ?",
    )?;

    stmt.query_row(params![id], memory_from_row)
        .map_err(|_| MemoirError::NotFound(id))
}

/// Delete a memory by ID
pub fn delete_memory(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn.execute("DELETE FROM memories WHERE id = ?", params![id])?;
    if deleted == 0 {
        return Err(MemoirError::NotFound(id));
    }
    Ok(())
}

/// List an owner's memories, newest first
pub fn list_memories(conn: &Connection, owner_id: &str, limit: i64) -> Result<Vec<Memory>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, owner_id, title, description, transcript, emotion_tag,
                has_audio, has_photos, has_files, created_at
         FROM memories
         WHERE owner_id = ?
         ORDER BY created_at DESC
         LIMIT ?",
    )?;

    let memories: Vec<Memory> = stmt
        .query_map(params![owner_id, limit], memory_from_row)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(memories)
}

/// Count an owner's memories
pub fn count_memories(conn: &Connection, owner_id: &str) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM memories WHERE owner_id = ?",
        params![owner_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Count memories created at or after the given moment
pub fn count_memories_since(
    conn: &Connection,
    owner_id: &str,
    since: DateTime<Utc>,
) -> Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM memories WHERE owner_id = ? AND created_at >= ?",
        params![owner_id, since.to_rfc3339()],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Count memories created in the calendar month containing `now`
pub fn count_memories_this_month(
    conn: &Connection,
    owner_id: &str,
    now: DateTime<Utc>,
) -> Result<i64> {
    let start = DateFilter::Month {
        year: now.year(),
        month: now.month(),
    }
    .to_range()?
    .start;
    count_memories_since(conn, owner_id, start)
}

/// Execute a filter bundle as one bounded, recency-ordered query
///
/// Set filters combine with AND; the keyword alone fans out across
/// title, description, and transcript with OR. The result cap is applied
/// after `ORDER BY created_at DESC`, never before.
pub fn query_memories(
    conn: &Connection,
    owner_id: &str,
    filters: &SearchFilters,
) -> Result<Vec<Memory>> {
    let mut sql = String::from(
        "SELECT id, owner_id, title, description, transcript, emotion_tag,
                has_audio, has_photos, has_files, created_at
         FROM memories",
    );

    let mut conditions = vec!["owner_id = ?".to_string()];
    let mut sql_params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner_id.to_string())];

    if let Some(emotion) = filters.emotion {
        conditions.push("emotion_tag = ?".to_string());
        sql_params.push(Box::new(emotion.as_str().to_string()));
    }

    if let Some(ref keyword) = filters.keyword {
        conditions.push("(title LIKE ? OR description LIKE ? OR transcript LIKE ?)".to_string());
        let pattern = format!("%{}%", keyword);
        sql_params.push(Box::new(pattern.clone()));
        sql_params.push(Box::new(pattern.clone()));
        sql_params.push(Box::new(pattern));
    }

    if let Some(ref date) = filters.date {
        let range = date.to_range()?;
        conditions.push("created_at >= ?".to_string());
        sql_params.push(Box::new(range.start.to_rfc3339()));
        // Day windows are closed at their upper bound, month/year half-open
        if range.end_inclusive {
            conditions.push("created_at <= ?".to_string());
        } else {
            conditions.push("created_at < ?".to_string());
        }
        sql_params.push(Box::new(range.end.to_rfc3339()));
    }

    if filters.has_audio {
        conditions.push("has_audio = 1".to_string());
    }
    if filters.has_photos {
        conditions.push("has_photos = 1".to_string());
    }

    sql.push_str(" WHERE ");
    sql.push_str(&conditions.join(" AND "));
    sql.push_str(" ORDER BY created_at DESC LIMIT ?");
    sql_params.push(Box::new(filters.limit()));

    let param_refs: Vec<&dyn rusqlite::ToSql> = sql_params.iter().map(|b| b.as_ref()).collect();
    let mut stmt = conn.prepare(&sql)?;

    let memories: Vec<Memory> = stmt
        .query_map(param_refs.as_slice(), memory_from_row)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(memories)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::RECENT_LIMIT;
    use crate::types::Emotion;
    use pretty_assertions::assert_eq;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::storage::run_migrations(&conn).unwrap();
        conn
    }

    fn seed(conn: &Connection, title: &str, emotion: Option<Emotion>, created_at: &str) -> i64 {
        conn.execute(
            "INSERT INTO memories (owner_id, title, description, transcript, emotion_tag,
                                   has_audio, has_photos, has_files, created_at)
             VALUES ('alice', ?, '', '', ?, 0, 0, 0, ?)",
            params![title, emotion.map(|e| e.as_str()), created_at],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn test_create_get_delete() {
        let conn = test_conn();
        let memory = create_memory(
            &conn,
            &NewMemory {
                owner_id: "alice".to_string(),
                title: "First day at the lake".to_string(),
                emotion: Some(Emotion::Peaceful),
                has_photos: true,
                ..Default::default()
            },
        )
        .unwrap();

        let fetched = get_memory(&conn, memory.id).unwrap();
        assert_eq!(fetched.title, "First day at the lake");
        assert_eq!(fetched.emotion, Some(Emotion::Peaceful));
        assert!(fetched.has_photos);
        assert!(!fetched.has_audio);

        delete_memory(&conn, memory.id).unwrap();
        assert!(matches!(
            get_memory(&conn, memory.id),
            Err(MemoirError::NotFound(_))
        ));
    }

    #[test]
    fn test_create_requires_owner() {
        let conn = test_conn();
        let result = create_memory(&conn, &NewMemory::default());
        assert!(matches!(result, Err(MemoirError::InvalidInput(_))));
    }

    #[test]
    fn test_counts_are_owner_scoped() {
        let conn = test_conn();
        seed(&conn, "one", None, "2024-03-01T10:00:00+00:00");
        seed(&conn, "two", None, "2024-05-01T10:00:00+00:00");
        conn.execute(
            "INSERT INTO memories (owner_id, title, created_at)
             VALUES ('bob', 'not alices', '2024-05-01T10:00:00+00:00')",
            [],
        )
        .unwrap();

        assert_eq!(count_memories(&conn, "alice").unwrap(), 2);
        assert_eq!(count_memories(&conn, "bob").unwrap(), 1);

        let since = "2024-04-01T00:00:00Z".parse().unwrap();
        assert_eq!(count_memories_since(&conn, "alice", since).unwrap(), 1);
    }

    #[test]
    fn test_this_month_count_excludes_earlier_months() {
        let conn = test_conn();
        seed(&conn, "graduation", None, "2024-06-02T10:00:00+00:00");
        seed(&conn, "first of the month", None, "2024-06-01T00:00:00+00:00");
        seed(&conn, "last month", None, "2024-05-31T23:59:59+00:00");
        seed(&conn, "last year", None, "2023-06-15T10:00:00+00:00");

        let now = "2024-06-15T12:00:00Z".parse().unwrap();
        assert_eq!(count_memories_this_month(&conn, "alice", now).unwrap(), 2);
    }

    #[test]
    fn test_emotion_filter() {
        let conn = test_conn();
        seed(
            &conn,
            "graduation",
            Some(Emotion::Proud),
            "2024-06-01T10:00:00+00:00",
        );
        seed(&conn, "rainy day", Some(Emotion::Sad), "2024-06-02T10:00:00+00:00");

        let filters = SearchFilters {
            emotion: Some(Emotion::Proud),
            ..Default::default()
        };
        let results = query_memories(&conn, "alice", &filters).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "graduation");
    }

    #[test]
    fn test_keyword_matches_any_text_column() {
        let conn = test_conn();
        conn.execute(
            "INSERT INTO memories (owner_id, title, description, transcript, created_at)
             VALUES ('alice', 'Trip', 'we saw the ocean', '', '2024-06-01T10:00:00+00:00'),
                    ('alice', 'Ocean sunset', '', '', '2024-06-02T10:00:00+00:00'),
                    ('alice', 'Dinner', '', 'talked about the ocean all night', '2024-06-03T10:00:00+00:00'),
                    ('alice', 'Hike', 'up the mountain', '', '2024-06-04T10:00:00+00:00')",
            [],
        )
        .unwrap();

        let filters = SearchFilters {
            keyword: Some("ocean".to_string()),
            ..Default::default()
        };
        let results = query_memories(&conn, "alice", &filters).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let conn = test_conn();
        seed(&conn, "Grandma's garden", None, "2024-06-01T10:00:00+00:00");

        let filters = SearchFilters {
            keyword: Some("GRANDMA".to_string()),
            ..Default::default()
        };
        assert_eq!(query_memories(&conn, "alice", &filters).unwrap().len(), 1);
    }

    #[test]
    fn test_year_filter_bounds() {
        let conn = test_conn();
        seed(&conn, "early", None, "2024-01-01T00:00:00+00:00");
        seed(&conn, "late", None, "2024-12-31T23:59:59+00:00");
        seed(&conn, "before", None, "2023-12-31T23:59:59+00:00");
        seed(&conn, "after", None, "2025-01-01T00:00:00+00:00");
        seed(&conn, "mid", None, "2024-07-04T12:00:00+00:00");

        let filters = SearchFilters {
            date: Some(DateFilter::Year { year: 2024 }),
            ..Default::default()
        };
        let results = query_memories(&conn, "alice", &filters).unwrap();
        let titles: Vec<&str> = results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["late", "mid", "early"]);
    }

    #[test]
    fn test_day_filter_includes_end_of_day() {
        let conn = test_conn();
        seed(&conn, "last second", None, "2023-10-05T23:59:59.500+00:00");
        seed(&conn, "next day", None, "2023-10-06T00:00:00+00:00");

        let filters = SearchFilters {
            date: Some(DateFilter::Day {
                year: 2023,
                month: 10,
                day: 5,
            }),
            ..Default::default()
        };
        let results = query_memories(&conn, "alice", &filters).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "last second");
    }

    #[test]
    fn test_filters_combine_with_and() {
        let conn = test_conn();
        conn.execute(
            "INSERT INTO memories (owner_id, title, emotion_tag, has_photos, created_at)
             VALUES ('alice', 'happy with photos', 'happy', 1, '2024-06-01T10:00:00+00:00'),
                    ('alice', 'happy no photos', 'happy', 0, '2024-06-02T10:00:00+00:00'),
                    ('alice', 'photos not happy', 'sad', 1, '2024-06-03T10:00:00+00:00')",
            [],
        )
        .unwrap();

        let filters = SearchFilters {
            emotion: Some(Emotion::Happy),
            has_photos: true,
            ..Default::default()
        };
        let results = query_memories(&conn, "alice", &filters).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "happy with photos");
    }

    #[test]
    fn test_recent_caps_after_ordering() {
        let conn = test_conn();
        for day in 1..=9 {
            seed(
                &conn,
                &format!("entry {}", day),
                None,
                &format!("2024-06-0{}T10:00:00+00:00", day),
            );
        }

        let filters = SearchFilters {
            recent: true,
            ..Default::default()
        };
        let results = query_memories(&conn, "alice", &filters).unwrap();
        assert_eq!(results.len() as i64, RECENT_LIMIT);
        // Most recent first: the cap never cuts newer entries
        assert_eq!(results[0].title, "entry 9");
        assert_eq!(results[4].title, "entry 5");
    }

    #[test]
    fn test_ordering_is_newest_first() {
        let conn = test_conn();
        seed(&conn, "old", None, "2024-01-01T10:00:00+00:00");
        seed(&conn, "new", None, "2024-06-01T10:00:00+00:00");
        seed(&conn, "middle", None, "2024-03-01T10:00:00+00:00");

        let results = query_memories(&conn, "alice", &SearchFilters {
            keyword: Some("xyz-no-match".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(results.is_empty());

        let results = list_memories(&conn, "alice", 50).unwrap();
        let titles: Vec<&str> = results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "middle", "old"]);
    }
}
