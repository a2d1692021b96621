use sqlx::{postgres::PgPoolOptions, PgPool};

/// Single long-lived connection pool, opened once at startup and closed
/// explicitly on every exit path.
pub struct Database {
    pub pool: PgPool,
}

impl Database {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        // Fail startup early if the store is unreachable
        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self { pool })
    }
}
