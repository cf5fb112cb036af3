//! Database repository for birthday and wish records.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Birthday, BirthdaySummary, NewBirthday, NewWish, Wish};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

/// Fixed-width UTC timestamp; lexical order matches chronological order.
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== BIRTHDAY OPERATIONS ====================

    /// Insert a new birthday.
    pub async fn create_birthday(&self, new: &NewBirthday) -> Result<Birthday, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = now_timestamp();

        sqlx::query(
            "INSERT INTO birthdays (id, name, image_url, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(new.name())
        .bind(new.image_url())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Birthday {
            id,
            name: new.name().to_string(),
            image_url: new.image_url().to_string(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get a birthday by ID.
    pub async fn get_birthday(&self, id: &str) -> Result<Option<Birthday>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, image_url, created_at, updated_at FROM birthdays WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(birthday_from_row))
    }

    /// List every birthday with its wish count, newest first.
    ///
    /// Birthdays without wishes are included with a count of zero.
    pub async fn list_birthdays_with_wish_counts(
        &self,
    ) -> Result<Vec<BirthdaySummary>, AppError> {
        let rows = sqlx::query(
            r#"SELECT b.id, b.name, b.image_url, b.created_at, COUNT(w.id) AS wish_count
               FROM birthdays b
               LEFT JOIN wishes w ON w.birthday_id = b.id
               GROUP BY b.id
               ORDER BY b.created_at DESC, b.rowid DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(summary_from_row).collect())
    }

    // ==================== WISH OPERATIONS ====================

    /// Insert a new wish under an existing birthday.
    ///
    /// The existence check and the insert are one statement, so a wish is
    /// never stored against a birthday that is absent at write time.
    pub async fn create_wish(&self, new: &NewWish) -> Result<Wish, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = now_timestamp();

        let result = sqlx::query(
            r#"INSERT INTO wishes (id, birthday_id, name, message, created_at, updated_at)
               SELECT ?, id, ?, ?, ?, ? FROM birthdays WHERE id = ?"#,
        )
        .bind(&id)
        .bind(new.name())
        .bind(new.message())
        .bind(&now)
        .bind(&now)
        .bind(new.page_id())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::birthday_not_found());
        }

        Ok(Wish {
            id,
            page_id: new.page_id().to_string(),
            name: new.name().to_string(),
            message: new.message().to_string(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// List wishes for a birthday, newest first.
    pub async fn list_wishes_for_birthday(&self, birthday_id: &str) -> Result<Vec<Wish>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, birthday_id, name, message, created_at, updated_at
               FROM wishes WHERE birthday_id = ?
               ORDER BY created_at DESC, rowid DESC"#,
        )
        .bind(birthday_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(wish_from_row).collect())
    }
}

// Helper functions for row conversion

fn birthday_from_row(row: &sqlx::sqlite::SqliteRow) -> Birthday {
    Birthday {
        id: row.get("id"),
        name: row.get("name"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn summary_from_row(row: &sqlx::sqlite::SqliteRow) -> BirthdaySummary {
    BirthdaySummary {
        id: row.get("id"),
        name: row.get("name"),
        image_url: row.get("image_url"),
        wish_count: row.get("wish_count"),
        created_at: row.get("created_at"),
    }
}

fn wish_from_row(row: &sqlx::sqlite::SqliteRow) -> Wish {
    Wish {
        id: row.get("id"),
        page_id: row.get("birthday_id"),
        name: row.get("name"),
        message: row.get("message"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        (Repository::new(pool), temp_dir)
    }

    fn birthday(name: &str) -> NewBirthday {
        NewBirthday::new(Some(name), "").unwrap()
    }

    fn wish(page_id: &str, message: &str) -> NewWish {
        NewWish::new(Some(page_id), Some("Bob"), Some(message)).unwrap()
    }

    #[tokio::test]
    async fn test_listing_is_empty_without_birthdays() {
        let (repo, _dir) = repo().await;
        assert!(repo.list_birthdays_with_wish_counts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wish_counts_per_birthday() {
        let (repo, _dir) = repo().await;
        let ada = repo.create_birthday(&birthday("Ada")).await.unwrap();
        let grace = repo.create_birthday(&birthday("Grace")).await.unwrap();

        for i in 0..3 {
            repo.create_wish(&wish(&ada.id, &format!("wish {i}")))
                .await
                .unwrap();
        }

        let listing = repo.list_birthdays_with_wish_counts().await.unwrap();
        assert_eq!(listing.len(), 2);
        // Newest first
        assert_eq!(listing[0].id, grace.id);
        assert_eq!(listing[0].wish_count, 0);
        assert_eq!(listing[1].id, ada.id);
        assert_eq!(listing[1].wish_count, 3);
    }

    #[tokio::test]
    async fn test_wishes_are_listed_newest_first() {
        let (repo, _dir) = repo().await;
        let ada = repo.create_birthday(&birthday("Ada")).await.unwrap();

        let first = repo.create_wish(&wish(&ada.id, "first")).await.unwrap();
        let second = repo.create_wish(&wish(&ada.id, "second")).await.unwrap();

        let wishes = repo.list_wishes_for_birthday(&ada.id).await.unwrap();
        let ids: Vec<_> = wishes.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
        assert!(wishes
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn test_wish_for_missing_birthday_is_not_stored() {
        let (repo, _dir) = repo().await;

        let err = repo.create_wish(&wish("missing", "hello")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(repo.list_wishes_for_birthday("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_birthday_is_none() {
        let (repo, _dir) = repo().await;
        assert!(repo.get_birthday("never-created").await.unwrap().is_none());
    }
}
