use actix_multipart::{Field, Multipart};
use actix_web::web::BytesMut;
use futures::StreamExt;

use crate::{
    errors::AppError,
    structs::{FileDirective, FileSlot, TechnicianForm, Upload},
};

/// Form value asking for a file slot to be emptied.
pub const REMOVE_SENTINEL: &str = "remove";

/// Read the multipart stream into a name and one directive per file slot.
pub async fn read_technician_form(
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<TechnicianForm, AppError> {
    let mut form = TechnicianForm::default();

    while let Some(item) = payload.next().await {
        let mut field = item?;

        let Some(field_name) = field.name().map(str::to_owned) else {
            return Err(AppError::Validation(
                "multipart part without a field name".to_owned(),
            ));
        };
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        let data = read_field(&mut field, max_bytes).await?;

        if field_name == "name" {
            let name = String::from_utf8(data.to_vec())
                .map_err(|_| AppError::Validation("name is not valid UTF-8".to_owned()))?;
            form.name = Some(name);
            continue;
        }

        let Some(slot) = FileSlot::from_form_field(&field_name) else {
            log::warn!("Ignoring unknown form field '{}'", field_name);
            continue;
        };

        let directive = match file_name {
            // an untouched file input still submits an empty part
            Some(file_name) if file_name.is_empty() && data.is_empty() => FileDirective::Keep,
            Some(file_name) => FileDirective::Replace(Upload {
                original_name: file_name,
                data: data.freeze(),
            }),
            None => directive_from_text(slot, &data)?,
        };
        form.set_directive(slot, directive);
    }

    Ok(form)
}

async fn read_field(field: &mut Field, max_bytes: usize) -> Result<BytesMut, AppError> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if data.len() + chunk.len() > max_bytes {
            return Err(AppError::PayloadTooLarge(max_bytes));
        }
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Interpret a plain-text value sent for a file slot.
pub fn directive_from_text(slot: FileSlot, raw: &[u8]) -> Result<FileDirective, AppError> {
    match std::str::from_utf8(raw).map(str::trim) {
        Ok(REMOVE_SENTINEL) => Ok(FileDirective::Clear),
        Ok("") => Ok(FileDirective::Keep),
        _ => Err(AppError::Validation(format!(
            "{} expects a file or '{}'",
            slot.form_field(),
            REMOVE_SENTINEL
        ))),
    }
}
