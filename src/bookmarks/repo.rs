use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Bookmark {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        description: Option<&str>,
        link: &str,
    ) -> anyhow::Result<Bookmark> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (user_id, title, description, link)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, link, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(link)
        .fetch_one(db)
        .await?;
        Ok(bookmark)
    }

    /// All bookmarks owned by `user_id`, store-default order.
    pub async fn list_by_owner(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Bookmark>> {
        let rows = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, description, link, created_at, updated_at
            FROM bookmarks
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Bookmark>> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            SELECT id, user_id, title, description, link, created_at, updated_at
            FROM bookmarks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(bookmark)
    }

    /// Apply a partial patch; absent fields keep their value.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        link: Option<&str>,
    ) -> anyhow::Result<Bookmark> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            UPDATE bookmarks
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                link = COALESCE($4, link),
                updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, title, description, link, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(link)
        .fetch_one(db)
        .await?;
        Ok(bookmark)
    }

    /// Remove the bookmark and return the deleted row.
    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<Bookmark> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            DELETE FROM bookmarks
            WHERE id = $1
            RETURNING id, user_id, title, description, link, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(bookmark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bookmark_serializes_with_camel_case_fields() {
        let bookmark = Bookmark {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "t".into(),
            description: None,
            link: "https://e.com".into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };

        let json = serde_json::to_value(&bookmark).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["link"], "https://e.com");
        assert_eq!(json["description"], serde_json::Value::Null);
    }
}
