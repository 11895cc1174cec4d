use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo::User;

impl User {
    /// Apply a partial profile update; absent fields keep their value.
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                updated_at = now()
            WHERE id = $1
            RETURNING id, email, password_hash, is_email_verified,
                      email_verification_token, first_name, last_name,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
