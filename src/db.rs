use std::{str::FromStr, time::Duration};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
    SqlitePool,
};

use crate::{errors::AppError, structs::Technician, AppState};

const TECHNICIAN_COLUMNS: &str = "id, name, image, cashapp_qr, venmo_qr, zelle_qr";

pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
    let opts = SqliteConnectOptions::from_str(database_url)?;
    connect_with(opts).await
}

pub async fn connect_with(opts: SqliteConnectOptions) -> Result<SqlitePool, AppError> {
    let opts = opts
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .read_only(false)
        .busy_timeout(Duration::from_secs(5));

    let db_pool = SqlitePool::connect_with(opts).await?;
    sqlx::migrate!().run(&db_pool).await?;
    log::info!("Database migrated successfully");
    Ok(db_pool)
}

pub async fn get_all_technicians(state: &AppState) -> Result<Vec<Technician>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let technicians = sqlx::query_as::<_, Technician>(&format!(
        "SELECT {} FROM technicians ORDER BY id",
        TECHNICIAN_COLUMNS
    ))
    .fetch_all(&pool)
    .await?;
    Ok(technicians)
}

pub async fn get_technician_by_id(
    state: &AppState,
    id: i64,
) -> Result<Option<Technician>, sqlx::Error> {
    let pool = state.db_pool.clone();
    let technician = sqlx::query_as::<_, Technician>(&format!(
        "SELECT {} FROM technicians WHERE id = $1",
        TECHNICIAN_COLUMNS
    ))
    .bind(id)
    .fetch_optional(&pool)
    .await?;
    Ok(technician)
}

/// Inserts the record, ignoring its `id`, and returns the id the database assigned.
pub async fn insert_technician(
    state: &AppState,
    technician: &Technician,
) -> Result<i64, sqlx::Error> {
    let pool = state.db_pool.clone();
    let result = sqlx::query(
        "INSERT INTO technicians (name, image, cashapp_qr, venmo_qr, zelle_qr) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&technician.name)
    .bind(&technician.image)
    .bind(&technician.cashapp_qr)
    .bind(&technician.venmo_qr)
    .bind(&technician.zelle_qr)
    .execute(&pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn update_technician(
    state: &AppState,
    technician: &Technician,
) -> Result<u64, sqlx::Error> {
    let pool = state.db_pool.clone();
    let result = sqlx::query(
        "UPDATE technicians SET name = $1, image = $2, cashapp_qr = $3, venmo_qr = $4, zelle_qr = $5 WHERE id = $6",
    )
    .bind(&technician.name)
    .bind(&technician.image)
    .bind(&technician.cashapp_qr)
    .bind(&technician.venmo_qr)
    .bind(&technician.zelle_qr)
    .bind(technician.id)
    .execute(&pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_technician(state: &AppState, id: i64) -> Result<u64, sqlx::Error> {
    let pool = state.db_pool.clone();
    let result = sqlx::query("DELETE FROM technicians WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await?;
    Ok(result.rows_affected())
}
