use chrono::{DateTime, Duration, Utc};
use mobc::{Manager, Pool};
use rusqlite::{params, Connection, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

/// Cached entries older than this are treated as misses and refetched.
pub fn cache_ttl() -> Duration {
    Duration::days(7)
}

pub fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - fetched_at < cache_ttl()
}

/// The three independent cache namespaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    /// Fetched page bodies, keyed by URL.
    Pages,
    /// robots.txt bodies, keyed by scheme + authority.
    Robots,
    /// Extracted email/phone sets, keyed by the crawl's start URL.
    ContactSets,
}

impl CacheKind {
    fn table(&self) -> &'static str {
        match self {
            CacheKind::Pages => "pages",
            CacheKind::Robots => "robots",
            CacheKind::ContactSets => "contact_sets",
        }
    }
}

/// Payload stored in the contact-set namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSet {
    pub emails: Vec<String>,
    pub phone: String,
}

pub struct SqliteManager {
    db_path: String,
}

impl SqliteManager {
    pub fn new(db_path: String) -> Self {
        debug!("🔧 Creating SqliteManager for path: {}", db_path);
        Self { db_path }
    }
}

#[async_trait::async_trait]
impl Manager for SqliteManager {
    type Connection = Connection;
    type Error = rusqlite::Error;

    async fn connect(&self) -> Result<Self::Connection, Self::Error> {
        let conn = Connection::open(&self.db_path)?;

        // Some PRAGMA statements return a row; query_row handles both shapes.
        let exec_pragma = |conn: &Connection, pragma: &str| -> Result<(), rusqlite::Error> {
            match conn.execute(pragma, []) {
                Ok(_) => Ok(()),
                Err(rusqlite::Error::ExecuteReturnedResults) => {
                    conn.query_row(pragma, [], |_| Ok(()))
                }
                Err(e) => Err(e),
            }
        };

        exec_pragma(&conn, "PRAGMA journal_mode=WAL")?;
        exec_pragma(&conn, "PRAGMA synchronous=NORMAL")?;
        exec_pragma(&conn, "PRAGMA temp_store=memory")?;

        init_cache_schema(&conn)?;
        Ok(conn)
    }

    async fn check(&self, conn: Self::Connection) -> Result<Self::Connection, Self::Error> {
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(conn)
    }
}

fn init_cache_schema(conn: &Connection) -> SqliteResult<()> {
    for kind in [CacheKind::Pages, CacheKind::Robots, CacheKind::ContactSets] {
        conn.execute(
            &format!(
                r#"
                CREATE TABLE IF NOT EXISTS {} (
                    key TEXT PRIMARY KEY,
                    payload TEXT NOT NULL,
                    fetched_at TEXT NOT NULL
                )
                "#,
                kind.table()
            ),
            [],
        )?;
    }
    Ok(())
}

pub type CachePool = Pool<SqliteManager>;

pub async fn create_cache_pool(
    db_path: &str,
) -> Result<CachePool, Box<dyn std::error::Error + Send + Sync>> {
    if let Some(parent) = Path::new(db_path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let manager = SqliteManager::new(db_path.to_string());
    let pool = Pool::builder().max_open(4).max_idle(2).build(manager);

    info!("✓ Cache database ready: {}", db_path);
    Ok(pool)
}

/// Persistent TTL cache shared by the fetcher, the robots checker, and the
/// site crawler. Every failure is swallowed: a broken cache degrades to a
/// cache that is always empty, never to an error.
#[derive(Clone)]
pub struct CrawlCache {
    pool: CachePool,
}

impl CrawlCache {
    pub fn new(pool: CachePool) -> Self {
        Self { pool }
    }

    /// Raw read: payload plus its capture timestamp, freshness not checked.
    pub async fn get(&self, kind: CacheKind, key: &str) -> Option<(String, DateTime<Utc>)> {
        let conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Cache unavailable, treating {} read as miss: {}", kind.table(), e);
                return None;
            }
        };

        conn.query_row(
            &format!(
                "SELECT payload, fetched_at FROM {} WHERE key = ?1",
                kind.table()
            ),
            params![key],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .ok()
    }

    /// Read that applies the TTL; a stale row is a miss.
    pub async fn get_fresh(&self, kind: CacheKind, key: &str) -> Option<String> {
        let (payload, fetched_at) = self.get(kind, key).await?;
        if is_fresh(fetched_at, Utc::now()) {
            debug!("📦 Cache hit ({}): {}", kind.table(), key);
            Some(payload)
        } else {
            debug!("⏳ Cache entry expired ({}): {}", kind.table(), key);
            None
        }
    }

    /// Last-write-wins upsert; failures are logged and ignored.
    pub async fn put(&self, kind: CacheKind, key: &str, payload: &str) {
        let conn = match self.pool.get().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Cache unavailable, dropping {} write: {}", kind.table(), e);
                return;
            }
        };

        let result = conn.execute(
            &format!(
                r#"
                INSERT INTO {} (key, payload, fetched_at) VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE
                SET payload = excluded.payload, fetched_at = excluded.fetched_at
                "#,
                kind.table()
            ),
            params![key, payload, Utc::now()],
        );
        if let Err(e) = result {
            warn!("Failed to write {} cache entry for {}: {}", kind.table(), key, e);
        }
    }

    /// Row count for one namespace; 0 when the cache is unreachable.
    pub async fn count(&self, kind: CacheKind) -> i64 {
        let Ok(conn) = self.pool.get().await else {
            return 0;
        };
        conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", kind.table()),
            [],
            |row| row.get(0),
        )
        .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_just_inside_ttl_is_fresh() {
        let now = Utc::now();
        let fetched_at = now - (cache_ttl() - Duration::seconds(1));
        assert!(is_fresh(fetched_at, now));
    }

    #[test]
    fn entry_just_past_ttl_is_stale() {
        let now = Utc::now();
        let fetched_at = now - (cache_ttl() + Duration::seconds(1));
        assert!(!is_fresh(fetched_at, now));
    }

    async fn temp_cache(dir: &tempfile::TempDir) -> CrawlCache {
        let db_path = dir.path().join("cache.db");
        let pool = create_cache_pool(db_path.to_str().unwrap()).await.unwrap();
        CrawlCache::new(pool)
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let cache = temp_cache(&dir).await;

        cache
            .put(CacheKind::Pages, "http://example.com", "<html></html>")
            .await;
        let (payload, fetched_at) = cache
            .get(CacheKind::Pages, "http://example.com")
            .await
            .unwrap();
        assert_eq!(payload, "<html></html>");
        assert!(is_fresh(fetched_at, Utc::now()));

        let fresh = cache
            .get_fresh(CacheKind::Pages, "http://example.com")
            .await;
        assert_eq!(fresh.as_deref(), Some("<html></html>"));
    }

    #[tokio::test]
    async fn rewrites_are_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let cache = temp_cache(&dir).await;

        cache.put(CacheKind::Robots, "example.com", "first").await;
        cache.put(CacheKind::Robots, "example.com", "second").await;

        let (payload, _) = cache.get(CacheKind::Robots, "example.com").await.unwrap();
        assert_eq!(payload, "second");
        assert_eq!(cache.count(CacheKind::Robots).await, 1);
    }

    #[tokio::test]
    async fn namespaces_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let cache = temp_cache(&dir).await;

        cache.put(CacheKind::Pages, "k", "page").await;
        assert!(cache.get(CacheKind::Robots, "k").await.is_none());
        assert!(cache.get(CacheKind::ContactSets, "k").await.is_none());
    }
}
