//! Technician records and the image files attached to them.
//!
//! File writes and row writes are not transactional: a failure between the two
//! can leave an orphaned upload or a reference to a removed file. Concurrent
//! requests on the same id are not serialized either.

use crate::{
    db,
    errors::AppError,
    structs::{FileDirective, FileSlot, Technician, TechnicianForm},
    AppState,
};

pub async fn list_technicians(state: &AppState) -> Result<Vec<Technician>, AppError> {
    let technicians = db::get_all_technicians(state).await.map_err(|e| {
        log::error!("Failed to list technicians: {}", e);
        AppError::DatabaseError(e)
    })?;
    Ok(technicians)
}

pub async fn get_technician(state: &AppState, id: i64) -> Result<Technician, AppError> {
    db::get_technician_by_id(state, id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Stores every provided file and inserts the row. Returns the new id.
pub async fn create_technician(
    state: &AppState,
    mut form: TechnicianForm,
) -> Result<i64, AppError> {
    let mut technician = Technician::draft(form.name.take().unwrap_or_default());

    for slot in FileSlot::ALL {
        // nothing to clear on a fresh record
        if let FileDirective::Replace(upload) = form.take_directive(slot) {
            let reference = state.uploads.save(&upload).await.map_err(|e| {
                log_orphans(&technician);
                e
            })?;
            technician.set_file(slot, Some(reference));
        }
    }

    let id = db::insert_technician(state, &technician)
        .await
        .map_err(|e| {
            log_orphans(&technician);
            AppError::DatabaseError(e)
        })?;

    log::info!("Technician {} created: {:?}", id, technician.name);
    Ok(id)
}

/// Applies each slot's directive on its own, then writes the row. Returns rows affected.
pub async fn update_technician(
    state: &AppState,
    id: i64,
    mut form: TechnicianForm,
) -> Result<u64, AppError> {
    let mut technician = get_technician(state, id).await?;

    if let Some(name) = form.name.take() {
        technician.name = name;
    }

    for slot in FileSlot::ALL {
        match form.take_directive(slot) {
            FileDirective::Keep => {}
            FileDirective::Clear => {
                if let Some(old) = technician.take_file(slot) {
                    state.uploads.remove(&old).await;
                }
            }
            FileDirective::Replace(upload) => {
                // old file goes first; a failed write leaves the slot pointing nowhere
                if let Some(old) = technician.take_file(slot) {
                    state.uploads.remove(&old).await;
                }
                let reference = state.uploads.save(&upload).await?;
                technician.set_file(slot, Some(reference));
            }
        }
    }

    let rows_affected = db::update_technician(state, &technician)
        .await
        .map_err(|e| {
            log_orphans(&technician);
            AppError::DatabaseError(e)
        })?;

    log::info!("Technician {} updated ({} row)", id, rows_affected);
    Ok(rows_affected)
}

/// Deletes the row, then every file it referenced. Returns rows affected.
pub async fn delete_technician(state: &AppState, id: i64) -> Result<u64, AppError> {
    let technician = get_technician(state, id).await?;

    let rows_affected = db::delete_technician(state, id).await?;

    for slot in FileSlot::ALL {
        if let Some(reference) = technician.file(slot) {
            state.uploads.remove(reference).await;
        }
    }

    log::info!("Technician {} deleted", id);
    Ok(rows_affected)
}

fn log_orphans(technician: &Technician) {
    for reference in FileSlot::ALL.into_iter().filter_map(|slot| technician.file(slot)) {
        log::error!("Technician not stored, upload left orphaned: {}", reference);
    }
}
