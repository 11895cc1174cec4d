use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database. Hash and verification token never leave
/// the server in JSON.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_email_verified: bool,
    #[serde(skip_serializing)]
    pub email_verification_token: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const USER_COLUMNS: &str = "id, email, password_hash, is_email_verified, \
     email_verification_token, first_name, last_name, created_at, updated_at";

impl User {
    /// Create a new unverified user with a pending verification token.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        verification_token: &str,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, email_verification_token)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(email)
        .bind(password_hash)
        .bind(verification_token)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1
            "#,
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Flip the verification flag and clear the token in one conditional
    /// update; a second use of the same token matches zero rows.
    pub async fn consume_verification_token(db: &PgPool, token: &str) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_email_verified = TRUE,
                email_verification_token = NULL,
                updated_at = now()
            WHERE email_verification_token = $1
            "#,
        )
        .bind(token)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_fields_are_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "test@example.com".into(),
            password_hash: "$argon2id$...".into(),
            is_email_verified: false,
            email_verification_token: Some("123456".into()),
            first_name: None,
            last_name: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("emailVerificationToken").is_none());
        assert_eq!(json["email"], "test@example.com");
        assert_eq!(json["isEmailVerified"], false);
    }
}
