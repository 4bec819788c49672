pub use sea_orm::{ConnectionTrait, DatabaseConnection};
pub use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Statement;

mod m20260801_000001_init; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260801_000001_init::Migration)]
    }
}

#[derive(Debug)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

/// Migration entrypoint shared by the CLI and tests. Takes an already-built
/// connection so environment parsing stays with the caller.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let backend = format!("{:?}", db.get_database_backend());
    let applied_before = count_applied_migrations(db).await.unwrap_or(0);

    tracing::info!(
        "▶ cmd={command:?} backend={backend} defined={} applied={applied_before}",
        Migrator::migrations().len()
    );

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Reset => Migrator::reset(db).await,
        MigrationCommand::Refresh => Migrator::refresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            if !matches!(command, MigrationCommand::Status) {
                let applied_after = count_applied_migrations(db).await.unwrap_or(0);
                tracing::info!("▶ AFTER: {applied_after} migration(s) applied");
            }
            tracing::info!("✅ {command:?} OK ({backend})");
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ {command:?} failed ({backend}): {e}");
            Err(e)
        }
    }
}

/// Count applied migrations, treating a missing migration table as zero.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0), // Migration table doesn't exist yet
        Err(e) => Err(e),
    }
}

/// Name of the database this connection points at, for startup logging.
pub async fn current_database_name(db: &DatabaseConnection) -> Result<String, DbErr> {
    let name = match db.get_database_backend() {
        sea_orm::DatabaseBackend::Postgres => {
            let stmt = Statement::from_string(
                db.get_database_backend(),
                String::from("select current_database() as name"),
            );
            match db.query_one(stmt).await? {
                Some(row) => row.try_get("", "name")?,
                None => "<unknown>".to_string(),
            }
        }
        sea_orm::DatabaseBackend::Sqlite => {
            let stmt = Statement::from_string(
                db.get_database_backend(),
                String::from("SELECT file FROM pragma_database_list WHERE name = 'main'"),
            );
            match db.query_one(stmt).await? {
                Some(row) => {
                    let file: String = row.try_get("", "file").unwrap_or_default();
                    if file.is_empty() {
                        ":memory:".to_string()
                    } else {
                        file
                    }
                }
                None => "<unknown>".to_string(),
            }
        }
        _ => "<unsupported>".to_string(),
    };
    Ok(name)
}
