use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Row of `users`. Never sent to clients; see `PublicUser`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string
    pub created_at: OffsetDateTime,
}
