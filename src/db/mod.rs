mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::models::*;
use crate::widget::{ContentSource, WidgetSettingsStore};

/// Post metadata key holding the feature-until date as Unix seconds.
pub const FEATURE_DATE_KEY: &str = "_hotsheet_date";

fn post_select() -> String {
    format!(
        "SELECT p.id, p.title, p.url, m.meta_value, p.created_at, p.updated_at
         FROM posts p
         LEFT JOIN post_meta m ON m.post_id = p.id AND m.meta_key = '{FEATURE_DATE_KEY}'"
    )
}

// Equal dates fall back to creation order so the result is deterministic.
const FEATURED_ORDER: &str = "ORDER BY m.meta_value, p.created_at, p.id";

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    // ============================================================
    // Post operations
    // ============================================================

    pub fn get_all_posts(&self) -> Result<Vec<Post>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let sql = format!("{} ORDER BY p.title", post_select());
        query_posts(&conn, &sql, [])
    }

    pub fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        find_post(&conn, id)
    }

    pub fn create_post(&self, input: CreatePostInput) -> Result<Post> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let id = Uuid::new_v4();
        let now = Utc::now();
        let categories = normalize_categories(input.categories);

        let tx = conn.transaction()?;
        ensure_categories_exist(&tx, &categories)?;
        tx.execute(
            "INSERT INTO posts (id, title, url, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            (
                id.to_string(),
                &input.title,
                &input.url,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;
        replace_categories(&tx, id, &categories)?;
        tx.commit()?;

        Ok(Post {
            id,
            title: input.title,
            url: input.url,
            categories,
            feature_until: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<Option<Post>> {
        let mut conn = self.conn.lock().expect("database lock poisoned");
        let Some(existing) = find_post(&conn, id)? else {
            return Ok(None);
        };

        let now = Utc::now();
        let title = input.title.unwrap_or(existing.title);
        let url = input.url.unwrap_or(existing.url);
        let categories = input
            .categories
            .map(normalize_categories)
            .unwrap_or(existing.categories);

        let tx = conn.transaction()?;
        ensure_categories_exist(&tx, &categories)?;
        tx.execute(
            "UPDATE posts SET title = ?, url = ?, updated_at = ? WHERE id = ?",
            (&title, &url, now.to_rfc3339(), id.to_string()),
        )?;
        replace_categories(&tx, id, &categories)?;
        tx.commit()?;

        Ok(Some(Post {
            id,
            title,
            url,
            categories,
            feature_until: existing.feature_until,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }

    pub fn delete_post(&self, id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM posts WHERE id = ?", [id.to_string()])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Category operations
    // ============================================================

    pub fn get_all_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY name, id")?;

        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    pub fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let category = conn
            .query_row(
                "SELECT id, name FROM categories WHERE id = ?",
                [id],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(category)
    }

    pub fn create_category(&self, input: CreateCategoryInput) -> Result<Category> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute("INSERT INTO categories (name) VALUES (?)", [&input.name])?;

        Ok(Category {
            id: conn.last_insert_rowid(),
            name: input.name,
        })
    }

    /// Delete a category. Posts lose their membership but are kept.
    pub fn delete_category(&self, id: CategoryId) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM categories WHERE id = ?", [id])?;
        Ok(rows > 0)
    }

    // ============================================================
    // Feature date (post metadata)
    // ============================================================

    pub fn get_feature_until(&self, post_id: Uuid) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let value: Option<i64> = conn
            .query_row(
                "SELECT meta_value FROM post_meta WHERE post_id = ? AND meta_key = ?",
                (post_id.to_string(), FEATURE_DATE_KEY),
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.and_then(parse_timestamp))
    }

    /// Store the feature date. Returns `false` if the post does not exist.
    pub fn set_feature_until(&self, post_id: Uuid, until: DateTime<Utc>) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        if !post_exists(&conn, post_id)? {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO post_meta (post_id, meta_key, meta_value) VALUES (?, ?, ?)
             ON CONFLICT(post_id, meta_key) DO UPDATE SET meta_value = excluded.meta_value",
            (post_id.to_string(), FEATURE_DATE_KEY, until.timestamp()),
        )?;
        Ok(true)
    }

    /// Remove the feature date. Returns `false` if the post does not exist.
    pub fn clear_feature_until(&self, post_id: Uuid) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        if !post_exists(&conn, post_id)? {
            return Ok(false);
        }

        conn.execute(
            "DELETE FROM post_meta WHERE post_id = ? AND meta_key = ?",
            (post_id.to_string(), FEATURE_DATE_KEY),
        )?;
        Ok(true)
    }

    /// Posts carrying a feature date, ordered by that date ascending.
    ///
    /// Expired posts are included; deciding what is still featured is the
    /// selector's job.
    pub fn get_featured_candidates(&self, filter: CategoryFilter) -> Result<Vec<Post>> {
        let conn = self.conn.lock().expect("database lock poisoned");

        match filter.category() {
            Some(category_id) => {
                let sql = format!(
                    "{}
                     WHERE m.meta_value IS NOT NULL
                       AND EXISTS (SELECT 1 FROM post_categories pc
                                   WHERE pc.post_id = p.id AND pc.category_id = ?)
                     {FEATURED_ORDER}",
                    post_select()
                );
                query_posts(&conn, &sql, [category_id])
            }
            None => {
                let sql = format!(
                    "{} WHERE m.meta_value IS NOT NULL {FEATURED_ORDER}",
                    post_select()
                );
                query_posts(&conn, &sql, [])
            }
        }
    }

    // ============================================================
    // Widget settings
    // ============================================================

    pub fn load_widget_config(&self, widget_id: &str) -> Result<Option<WidgetConfig>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let config = conn
            .query_row(
                "SELECT title, category_id FROM widget_settings WHERE widget_id = ?",
                [widget_id],
                |row| {
                    Ok(WidgetConfig {
                        title: row.get(0)?,
                        category_id: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(config)
    }

    pub fn save_widget_config(&self, widget_id: &str, config: &WidgetConfig) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        conn.execute(
            "INSERT INTO widget_settings (widget_id, title, category_id, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(widget_id) DO UPDATE SET
                title = excluded.title,
                category_id = excluded.category_id,
                updated_at = excluded.updated_at",
            (
                widget_id,
                &config.title,
                config.category_id,
                Utc::now().to_rfc3339(),
            ),
        )?;
        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

impl ContentSource for Database {
    fn featured_candidates(&self, filter: CategoryFilter) -> Result<Vec<Post>> {
        self.get_featured_candidates(filter)
    }
}

impl WidgetSettingsStore for Database {
    fn load_config(&self, widget_id: &str) -> Result<Option<WidgetConfig>> {
        self.load_widget_config(widget_id)
    }

    fn save_config(&self, widget_id: &str, config: &WidgetConfig) -> Result<()> {
        self.save_widget_config(widget_id, config)
    }
}

/// Location of the database when no path is given.
pub fn default_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "hotsheet")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join("hotsheet.db"))
}

fn find_post(conn: &Connection, id: Uuid) -> Result<Option<Post>> {
    let sql = format!("{} WHERE p.id = ?", post_select());
    Ok(query_posts(conn, &sql, [id.to_string()])?.into_iter().next())
}

fn query_posts<P: rusqlite::Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Post>> {
    let mut stmt = conn.prepare(sql)?;
    let mut posts = stmt
        .query_map(params, |row| {
            Ok(Post {
                id: parse_uuid(row.get::<_, String>(0)?),
                title: row.get(1)?,
                url: row.get(2)?,
                categories: Vec::new(),
                feature_until: row.get::<_, Option<i64>>(3)?.and_then(parse_timestamp),
                created_at: parse_datetime(row.get::<_, String>(4)?),
                updated_at: parse_datetime(row.get::<_, String>(5)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(
        "SELECT category_id FROM post_categories WHERE post_id = ? ORDER BY category_id",
    )?;
    for post in &mut posts {
        post.categories = stmt
            .query_map([post.id.to_string()], |row| row.get(0))?
            .collect::<Result<Vec<CategoryId>, _>>()?;
    }

    Ok(posts)
}

fn post_exists(conn: &Connection, id: Uuid) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM posts WHERE id = ?",
        [id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

fn ensure_categories_exist(conn: &Connection, categories: &[CategoryId]) -> Result<()> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM categories WHERE id = ?")?;
    for id in categories {
        let count: i64 = stmt.query_row([id], |row| row.get(0))?;
        if count == 0 {
            anyhow::bail!("Category {} not found", id);
        }
    }
    Ok(())
}

fn replace_categories(conn: &Connection, post_id: Uuid, categories: &[CategoryId]) -> Result<()> {
    conn.execute(
        "DELETE FROM post_categories WHERE post_id = ?",
        [post_id.to_string()],
    )?;
    let mut stmt =
        conn.prepare("INSERT INTO post_categories (post_id, category_id) VALUES (?, ?)")?;
    for id in categories {
        stmt.execute(params![post_id.to_string(), id])?;
    }
    Ok(())
}

fn normalize_categories(mut categories: Vec<CategoryId>) -> Vec<CategoryId> {
    categories.sort_unstable();
    categories.dedup();
    categories
}

fn parse_uuid(s: String) -> Uuid {
    Uuid::parse_str(&s).unwrap_or_else(|_| Uuid::nil())
}

fn parse_timestamp(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
