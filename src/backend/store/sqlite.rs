//! # SQLite Store
//!
//! Persistent `NodeStore` + `PoemStore` on top of an `sqlx::SqlitePool`.
//!
//! ## Layout
//!
//! - `poetry_nodes.children` holds the ordered child list as a JSON array
//!   of id strings, mirroring the document shape the API exposes.
//! - `poetry_nodes.parent_id` is the reverse index used by `find_parent`.
//!   It is never exposed; every statement that edits a child list also
//!   updates it inside the same transaction.
//! - Timestamps are RFC 3339 strings with microsecond precision, so
//!   lexical order equals chronological order.
//!
//! Child-list edits are single `UPDATE` statements built on SQLite's JSON
//! functions, so two concurrent appends to the same parent cannot lose
//! each other.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use super::{NodeFilter, NodeSort, NodeStore, PoemStore, StoreError};
use crate::shared::{NewNode, NewPoem, NodeId, NodeUpdate, PoemId, PoemUpdate, PoetryNode, PrivatePoem};

const NODE_COLUMNS: &str = "id, text, author, is_anonymous, is_root, color, children, created_at";
const POEM_COLUMNS: &str = "id, title, content, author_nickname, created_at, updated_at";

/// Result type for SQLite store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Store backed by a SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open or create the database at `database_url` and initialize the schema
    ///
    /// Uses WAL mode so readers are not blocked by the single writer.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::unavailable(e.to_string()))?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// A private in-memory database, mostly for tests.
    ///
    /// Pinned to one connection that never expires, since every SQLite
    /// memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Platform data directory location used for `sqlite://default`
    pub fn default_db_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
        path.push("poetree");
        path.push("poetree.db");
        path
    }

    /// Create all tables and indexes if they do not exist yet
    async fn init_schema(&self) -> Result<()> {
        sqlx::raw_sql(include_str!("schema.sql")).execute(&self.pool).await?;
        tracing::debug!("[Store] SQLite schema ready");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn fetch_node<'e, E>(executor: E, id: NodeId) -> Result<Option<PoetryNode>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, NodeRow>(&format!(
            "SELECT {} FROM poetry_nodes WHERE id = ?",
            NODE_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?;
        row.map(PoetryNode::try_from).transpose()
    }

    async fn fetch_poem<'e, E>(executor: E, id: PoemId) -> Result<Option<PrivatePoem>>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, PoemRow>(&format!(
            "SELECT {} FROM private_poems WHERE id = ?",
            POEM_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(executor)
        .await?;
        row.map(PrivatePoem::try_from).transpose()
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn encode_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_time(id: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StoreError::corrupt(id, format!("bad timestamp '{}': {}", value, e)))
}

fn decode_id(value: &str) -> Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| StoreError::corrupt(value, format!("bad id: {}", e)))
}

fn encode_children(children: &[NodeId]) -> Result<String> {
    serde_json::to_string(children).map_err(|e| StoreError::corrupt("children", e.to_string()))
}

#[derive(sqlx::FromRow)]
struct NodeRow {
    id: String,
    text: String,
    author: String,
    is_anonymous: bool,
    is_root: bool,
    color: Option<String>,
    children: String,
    created_at: String,
}

impl TryFrom<NodeRow> for PoetryNode {
    type Error = StoreError;

    fn try_from(row: NodeRow) -> Result<Self> {
        let children: Vec<NodeId> = serde_json::from_str(&row.children)
            .map_err(|e| StoreError::corrupt(&row.id, format!("bad children list: {}", e)))?;
        Ok(PoetryNode {
            id: decode_id(&row.id)?,
            created_at: decode_time(&row.id, &row.created_at)?,
            text: row.text,
            author: row.author,
            is_anonymous: row.is_anonymous,
            is_root: row.is_root,
            color: row.color,
            children,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PoemRow {
    id: String,
    title: String,
    content: String,
    author_nickname: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<PoemRow> for PrivatePoem {
    type Error = StoreError;

    fn try_from(row: PoemRow) -> Result<Self> {
        Ok(PrivatePoem {
            id: decode_id(&row.id)?,
            created_at: decode_time(&row.id, &row.created_at)?,
            updated_at: decode_time(&row.id, &row.updated_at)?,
            title: row.title,
            content: row.content,
            author_nickname: row.author_nickname,
        })
    }
}

#[async_trait]
impl NodeStore for SqliteStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    async fn get(&self, id: NodeId) -> Result<Option<PoetryNode>> {
        Self::fetch_node(&self.pool, id).await
    }

    async fn create(&self, node: NewNode) -> Result<PoetryNode> {
        let node = node.into_node(Uuid::new_v4(), now());
        sqlx::query(
            "INSERT INTO poetry_nodes (id, text, author, is_anonymous, is_root, color, children, parent_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, '[]', NULL, ?)",
        )
        .bind(node.id.to_string())
        .bind(&node.text)
        .bind(&node.author)
        .bind(node.is_anonymous)
        .bind(node.is_root)
        .bind(&node.color)
        .bind(encode_time(&node.created_at))
        .execute(&self.pool)
        .await?;
        Ok(node)
    }

    async fn update_fields(&self, id: NodeId, update: NodeUpdate) -> Result<Option<PoetryNode>> {
        let children_json = update.children.as_deref().map(encode_children).transpose()?;
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            "UPDATE poetry_nodes SET text = COALESCE(?, text), children = COALESCE(?, children) WHERE id = ?",
        )
        .bind(&update.text)
        .bind(&children_json)
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if affected == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        if let Some(children) = &update.children {
            sqlx::query("UPDATE poetry_nodes SET parent_id = NULL WHERE parent_id = ?")
                .bind(id.to_string())
                .execute(&mut *tx)
                .await?;
            for child in children {
                sqlx::query("UPDATE poetry_nodes SET parent_id = ? WHERE id = ?")
                    .bind(id.to_string())
                    .bind(child.to_string())
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let node = Self::fetch_node(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(node)
    }

    async fn delete(&self, id: NodeId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;
        let affected = sqlx::query("DELETE FROM poetry_nodes WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("UPDATE poetry_nodes SET parent_id = NULL WHERE parent_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(affected > 0)
    }

    async fn find_where(&self, filter: NodeFilter, sort: Option<NodeSort>) -> Result<Vec<PoetryNode>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM poetry_nodes WHERE 1 = 1", NODE_COLUMNS));
        if let Some(is_root) = filter.is_root {
            builder.push(" AND is_root = ").push_bind(is_root);
        }
        if let Some(child) = filter.has_child {
            builder
                .push(" AND EXISTS (SELECT 1 FROM json_each(poetry_nodes.children) AS je WHERE je.value = ")
                .push_bind(child.to_string())
                .push(")");
        }
        builder.push(match sort {
            Some(NodeSort::CreatedAtDesc) => " ORDER BY created_at DESC, rowid DESC",
            None => " ORDER BY rowid ASC",
        });

        let rows = builder.build_query_as::<NodeRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(PoetryNode::try_from).collect()
    }

    async fn push_child(&self, parent: NodeId, child: NodeId) -> Result<Option<PoetryNode>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE poetry_nodes SET children = json_insert(children, '$[#]', ?1)
             WHERE id = ?2
               AND NOT EXISTS (SELECT 1 FROM json_each(poetry_nodes.children) AS je WHERE je.value = ?1)",
        )
        .bind(child.to_string())
        .bind(parent.to_string())
        .execute(&mut *tx)
        .await?;

        let Some(node) = Self::fetch_node(&mut *tx, parent).await? else {
            tx.rollback().await?;
            return Ok(None);
        };

        sqlx::query("UPDATE poetry_nodes SET parent_id = ? WHERE id = ?")
            .bind(parent.to_string())
            .bind(child.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(node))
    }

    async fn pull_child(&self, parent: NodeId, child: NodeId) -> Result<Option<PoetryNode>> {
        let mut tx = self.pool.begin().await?;
        let affected = sqlx::query(
            "UPDATE poetry_nodes SET children = (
                 SELECT json_group_array(je.value) FROM json_each(poetry_nodes.children) AS je WHERE je.value != ?1
             )
             WHERE id = ?2",
        )
        .bind(child.to_string())
        .bind(parent.to_string())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if affected == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("UPDATE poetry_nodes SET parent_id = NULL WHERE id = ? AND parent_id = ?")
            .bind(child.to_string())
            .bind(parent.to_string())
            .execute(&mut *tx)
            .await?;
        let node = Self::fetch_node(&mut *tx, parent).await?;
        tx.commit().await?;
        Ok(node)
    }

    async fn find_parent(&self, child: NodeId) -> Result<Option<PoetryNode>> {
        let row = sqlx::query_as::<_, NodeRow>(&format!(
            "SELECT {} FROM poetry_nodes WHERE id = (SELECT parent_id FROM poetry_nodes WHERE id = ?)",
            NODE_COLUMNS
        ))
        .bind(child.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(PoetryNode::try_from).transpose()
    }
}

#[async_trait]
impl PoemStore for SqliteStore {
    async fn get_poem(&self, id: PoemId) -> Result<Option<PrivatePoem>> {
        Self::fetch_poem(&self.pool, id).await
    }

    async fn create_poem(&self, poem: NewPoem) -> Result<PrivatePoem> {
        let poem = poem.into_poem(Uuid::new_v4(), now());
        sqlx::query(
            "INSERT INTO private_poems (id, title, content, author_nickname, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(poem.id.to_string())
        .bind(&poem.title)
        .bind(&poem.content)
        .bind(&poem.author_nickname)
        .bind(encode_time(&poem.created_at))
        .bind(encode_time(&poem.updated_at))
        .execute(&self.pool)
        .await?;
        Ok(poem)
    }

    async fn update_poem(&self, id: PoemId, update: PoemUpdate) -> Result<Option<PrivatePoem>> {
        let mut tx = self.pool.begin().await?;
        let affected = sqlx::query(
            "UPDATE private_poems
             SET title = COALESCE(?, title), content = COALESCE(?, content), updated_at = ?
             WHERE id = ?",
        )
        .bind(&update.title)
        .bind(&update.content)
        .bind(encode_time(&now()))
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if affected == 0 {
            tx.rollback().await?;
            return Ok(None);
        }
        let poem = Self::fetch_poem(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(poem)
    }

    async fn delete_poem(&self, id: PoemId) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM private_poems WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    async fn poems_by_author(&self, author_nickname: &str) -> Result<Vec<PrivatePoem>> {
        let rows = sqlx::query_as::<_, PoemRow>(&format!(
            "SELECT {} FROM private_poems WHERE author_nickname = ? ORDER BY updated_at DESC, rowid DESC",
            POEM_COLUMNS
        ))
        .bind(author_nickname)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(PrivatePoem::try_from).collect()
    }
}
