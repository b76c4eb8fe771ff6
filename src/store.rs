//! Durable, thread-safe persistence for pages, the link graph, keyword
//! postings, and PageRank scores.
//!
//! Backed by a single `rusqlite::Connection` guarded by a `Mutex`, the same
//! device the crawler uses to share a single-writer resource (`IndexWriter`)
//! across tasks. Writers and readers both serialize on the mutex; simplest
//! correct thing that works at this crawl scale.

use std::collections::HashMap;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;

/// A single (doc_id, term_frequency, url, title, pagerank, cleaned_text) row
/// produced by joining keywords against pages for one word.
#[derive(Debug, Clone, PartialEq)]
pub struct PostingRow {
    pub doc_id: i64,
    pub term_frequency: i64,
    pub url: String,
    pub title: Option<String>,
    pub pagerank: f64,
    pub cleaned_text: Option<String>,
}

pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens (and migrates, idempotently) the store at `path`. Use
    /// `":memory:"` for an ephemeral, test-only store.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT UNIQUE NOT NULL,
                title TEXT,
                content TEXT,
                cleaned_text TEXT,
                pagerank REAL NOT NULL DEFAULT 0.0 CHECK (pagerank >= 0),
                crawled_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS links (
                source_id INTEGER NOT NULL,
                target_id INTEGER NOT NULL,
                PRIMARY KEY (source_id, target_id),
                FOREIGN KEY (source_id) REFERENCES pages(id),
                FOREIGN KEY (target_id) REFERENCES pages(id)
            );

            CREATE TABLE IF NOT EXISTS keywords (
                word TEXT NOT NULL,
                doc_id INTEGER NOT NULL,
                term_frequency INTEGER NOT NULL,
                PRIMARY KEY (word, doc_id),
                FOREIGN KEY (doc_id) REFERENCES pages(id)
            );

            CREATE INDEX IF NOT EXISTS idx_keywords_word ON keywords(word);
            CREATE INDEX IF NOT EXISTS idx_pages_url ON pages(url);
            ",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Inserts a new page or updates the one keyed by `url`, returning its
    /// id either way. When `title`, `content`, and `cleaned_text` are all
    /// `None` this is a placeholder insert that leaves an existing row
    /// untouched; otherwise all three fields overwrite unconditionally.
    pub fn upsert_page(
        &self,
        url: &str,
        title: Option<&str>,
        content: Option<&str>,
        cleaned_text: Option<&str>,
    ) -> Result<i64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        let is_placeholder = title.is_none() && content.is_none() && cleaned_text.is_none();

        if is_placeholder {
            conn.execute(
                "INSERT INTO pages (url) VALUES (?1) ON CONFLICT(url) DO NOTHING",
                params![url],
            )?;
        } else {
            conn.execute(
                "INSERT INTO pages (url, title, content, cleaned_text) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(url) DO UPDATE SET
                    title = excluded.title,
                    content = excluded.content,
                    cleaned_text = excluded.cleaned_text,
                    crawled_at = CURRENT_TIMESTAMP",
                params![url, title, content, cleaned_text],
            )?;
        }

        let id = conn.query_row("SELECT id FROM pages WHERE url = ?1", params![url], |row| {
            row.get(0)
        })?;
        Ok(id)
    }

    pub fn get_page_id(&self, url: &str) -> Result<Option<i64>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        let id = conn
            .query_row("SELECT id FROM pages WHERE url = ?1", params![url], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(id)
    }

    /// Idempotent; a no-op for self-loops or an already-existing edge.
    pub fn add_link(&self, source_id: i64, target_id: i64) -> Result<(), StoreError> {
        if source_id == target_id {
            return Ok(());
        }
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        conn.execute(
            "INSERT OR IGNORE INTO links (source_id, target_id) VALUES (?1, ?2)",
            params![source_id, target_id],
        )?;
        Ok(())
    }

    pub fn list_pages(&self) -> Result<Vec<(i64, String)>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        let mut stmt = conn.prepare("SELECT id, url FROM pages")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn get_cleaned_text(&self, id: i64) -> Result<Option<String>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        let text = conn
            .query_row(
                "SELECT cleaned_text FROM pages WHERE id = ?1",
                params![id],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten();
        Ok(text)
    }

    pub fn update_pagerank(&self, id: i64, score: f64) -> Result<(), StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        conn.execute(
            "UPDATE pages SET pagerank = ?1 WHERE id = ?2",
            params![score, id],
        )?;
        Ok(())
    }

    pub fn get_pagerank(&self, id: i64) -> Result<f64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        let score = conn.query_row(
            "SELECT pagerank FROM pages WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(score)
    }

    /// Upserts every (word, doc_id) to the given term frequency, atomically
    /// across the whole map, for one document.
    pub fn save_postings(
        &self,
        doc_id: i64,
        word_freqs: &HashMap<String, usize>,
    ) -> Result<(), StoreError> {
        if word_freqs.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO keywords (word, doc_id, term_frequency) VALUES (?1, ?2, ?3)
                 ON CONFLICT(word, doc_id) DO UPDATE SET term_frequency = excluded.term_frequency",
            )?;
            for (word, tf) in word_freqs {
                stmt.execute(params![word, doc_id, *tf as i64])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn document_count(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        let count = conn.query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn doc_frequency(&self, word: &str) -> Result<i64, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        let df = conn.query_row(
            "SELECT COUNT(DISTINCT doc_id) FROM keywords WHERE word = ?1",
            params![word],
            |row| row.get(0),
        )?;
        Ok(df)
    }

    pub fn posting_list(&self, word: &str) -> Result<Vec<PostingRow>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        let mut stmt = conn.prepare(
            "SELECT k.doc_id, k.term_frequency, p.url, p.title, p.pagerank, p.cleaned_text
             FROM keywords k JOIN pages p ON k.doc_id = p.id
             WHERE k.word = ?1",
        )?;
        let rows = stmt
            .query_map(params![word], |row| {
                Ok(PostingRow {
                    doc_id: row.get(0)?,
                    term_frequency: row.get(1)?,
                    url: row.get(2)?,
                    title: row.get(3)?,
                    pagerank: row.get(4)?,
                    cleaned_text: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn iter_links(&self) -> Result<Vec<(i64, i64)>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Lock)?;
        let mut stmt = conn.prepare("SELECT source_id, target_id FROM links")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_store() -> Store {
        Store::open(":memory:").unwrap()
    }

    #[test]
    fn upsert_page_is_idempotent_on_id() {
        let store = mem_store();
        let id1 = store
            .upsert_page("https://example.com", Some("t"), Some("c"), Some("c"))
            .unwrap();
        let id2 = store
            .upsert_page("https://example.com", Some("t2"), Some("c2"), Some("c2"))
            .unwrap();
        assert_eq!(id1, id2);
    }

    #[test]
    fn placeholder_does_not_clobber_existing_content() {
        let store = mem_store();
        let id = store
            .upsert_page("https://example.com", Some("Title"), Some("<html>"), Some("text"))
            .unwrap();
        let id2 = store.upsert_page("https://example.com", None, None, None).unwrap();
        assert_eq!(id, id2);
        assert_eq!(store.get_cleaned_text(id).unwrap().as_deref(), Some("text"));
    }

    #[test]
    fn placeholder_creates_row_when_absent() {
        let store = mem_store();
        let id = store.upsert_page("https://example.com", None, None, None).unwrap();
        assert_eq!(store.get_page_id("https://example.com").unwrap(), Some(id));
        assert_eq!(store.get_cleaned_text(id).unwrap(), None);
    }

    #[test]
    fn add_link_rejects_self_loops() {
        let store = mem_store();
        let id = store.upsert_page("https://a.com", Some("a"), Some("a"), Some("a")).unwrap();
        store.add_link(id, id).unwrap();
        assert!(store.iter_links().unwrap().is_empty());
    }

    #[test]
    fn add_link_is_idempotent() {
        let store = mem_store();
        let a = store.upsert_page("https://a.com", Some("a"), Some("a"), Some("a")).unwrap();
        let b = store.upsert_page("https://b.com", Some("b"), Some("b"), Some("b")).unwrap();
        store.add_link(a, b).unwrap();
        store.add_link(a, b).unwrap();
        assert_eq!(store.iter_links().unwrap(), vec![(a, b)]);
    }

    #[test]
    fn save_postings_overwrites_on_rebuild() {
        let store = mem_store();
        let id = store.upsert_page("https://a.com", Some("a"), Some("a"), Some("foo")).unwrap();
        let mut freqs = HashMap::new();
        freqs.insert("foo".to_string(), 1);
        store.save_postings(id, &freqs).unwrap();
        freqs.insert("foo".to_string(), 5);
        store.save_postings(id, &freqs).unwrap();
        let postings = store.posting_list("foo").unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].term_frequency, 5);
    }

    #[test]
    fn schema_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.db");
        let path = path.to_str().unwrap();

        let id = {
            let store = Store::open(path).unwrap();
            store
                .upsert_page("https://a.com", Some("A"), Some("<html>"), Some("text"))
                .unwrap()
        };

        let reopened = Store::open(path).unwrap();
        assert_eq!(reopened.get_page_id("https://a.com").unwrap(), Some(id));
        assert_eq!(reopened.get_cleaned_text(id).unwrap().as_deref(), Some("text"));
    }

    #[test]
    fn document_count_and_doc_frequency() {
        let store = mem_store();
        let a = store.upsert_page("https://a.com", Some("a"), Some("a"), Some("a")).unwrap();
        let b = store.upsert_page("https://b.com", Some("b"), Some("b"), Some("b")).unwrap();
        assert_eq!(store.document_count().unwrap(), 2);
        let mut freqs = HashMap::new();
        freqs.insert("foo".to_string(), 1);
        store.save_postings(a, &freqs).unwrap();
        store.save_postings(b, &freqs).unwrap();
        assert_eq!(store.doc_frequency("foo").unwrap(), 2);
        assert_eq!(store.doc_frequency("missing").unwrap(), 0);
    }
}
