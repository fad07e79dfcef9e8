//! Migrate command - manages the `users` schema.

use sea_orm::DbErr;
use sea_orm_migration::MigratorTrait;

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Migrator};

fn migration_failed(e: DbErr) -> AppError {
    AppError::internal(format!("Migration failed: {}", e))
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    run(&db, args.action).await
}

/// Apply one migrate action against an open database.
pub async fn run(db: &Database, action: MigrateAction) -> AppResult<()> {
    let conn = db.connection();

    match action {
        MigrateAction::Up => {
            Migrator::up(conn, None).await.map_err(migration_failed)?;
            tracing::info!("Users schema is up to date");
        }
        MigrateAction::Down => {
            Migrator::down(conn, Some(1)).await.map_err(migration_failed)?;
            tracing::info!("Rolled back the latest migration");
        }
        MigrateAction::Status => {
            for status in db.migration_status().await.map_err(migration_failed)? {
                println!("{}", status);
            }
        }
        MigrateAction::Fresh { yes } => {
            if !yes {
                return Err(AppError::validation(
                    "`migrate fresh` drops every registered user; pass --yes to confirm",
                ));
            }
            tracing::warn!("Dropping the users table and re-creating it");
            Migrator::fresh(conn).await.map_err(migration_failed)?;
        }
    }

    Ok(())
}
