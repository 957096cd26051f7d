//! CLI subcommands.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Invalid(String),
}

/// Resolve a database URL from `key`, falling back to `DATABASE_URL`.
fn database_url(key: &'static str) -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var(key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar(key))
}

/// Connect a pool for a CLI command.
async fn connect(key: &'static str) -> Result<PgPool, CommandError> {
    let url = database_url(key)?;
    Ok(anara_admin::db::create_pool(&url).await?)
}
