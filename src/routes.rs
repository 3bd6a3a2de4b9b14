use std::io::ErrorKind;

use actix_files::NamedFile;
use actix_identity::Identity;
use actix_multipart::Multipart;
use actix_web::{
    delete, get,
    http::{Method, StatusCode},
    post, put,
    web::{self, Data},
    Either, HttpMessage, HttpRequest, HttpResponse, Responder,
};

use crate::{
    errors::AppError,
    forms::read_technician_form,
    structs::{
        AccessCode, AccessVerdict, RowsAffected, TechnicianCreated, TechnicianEnvelope,
        TechnicianList,
    },
    technicians, utils, AppState,
};

/// Identity stored in the session once the access code was entered.
const KIOSK_ADMIN: &str = "kiosk-admin";

pub const TIP_PAGE: &str = "tip-page.html";
pub const ADMIN_PAGE: &str = "admin-page.html";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .service(list_technicians_handler)
    .service(create_technician_handler)
    .service(get_technician_handler)
    .service(update_technician_handler)
    .service(delete_technician_handler)
    .service(verify_access_code_handler)
    .service(logout_handler)
    .service(admin_handler)
    .service(admin_page_redirect_handler)
    .service(index_handler);
}

#[get("/technicians")]
pub async fn list_technicians_handler(state: Data<AppState>) -> Result<impl Responder, AppError> {
    let technicians = technicians::list_technicians(&state).await?;
    Ok(HttpResponse::Ok().json(TechnicianList { technicians }))
}

#[get("/technicians/{id}")]
pub async fn get_technician_handler(
    state: Data<AppState>,
    id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let technician = technicians::get_technician(&state, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TechnicianEnvelope { technician }))
}

#[post("/technicians")]
pub async fn create_technician_handler(
    state: Data<AppState>,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let form = read_technician_form(payload, state.max_upload_bytes).await?;
    let technician_id = technicians::create_technician(&state, form).await?;
    Ok(HttpResponse::Ok().json(TechnicianCreated { technician_id }))
}

#[put("/technicians/{id}")]
pub async fn update_technician_handler(
    state: Data<AppState>,
    id: web::Path<i64>,
    payload: Multipart,
) -> Result<impl Responder, AppError> {
    let form = read_technician_form(payload, state.max_upload_bytes).await?;
    let rows_affected = technicians::update_technician(&state, id.into_inner(), form).await?;
    Ok(HttpResponse::Ok().json(RowsAffected {
        message: "Technician updated successfully".to_owned(),
        rows_affected,
    }))
}

#[delete("/technicians/{id}")]
pub async fn delete_technician_handler(
    state: Data<AppState>,
    id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let rows_affected = technicians::delete_technician(&state, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(RowsAffected {
        message: "Technician deleted successfully".to_owned(),
        rows_affected,
    }))
}

#[post("/verify-access-code")]
pub async fn verify_access_code_handler(
    web::Json(body): web::Json<AccessCode>,
    state: Data<AppState>,
    request: HttpRequest,
) -> Result<impl Responder, AppError> {
    let success = utils::verify_access_code(&body.code, &state.access_code);
    if success {
        Identity::login(&request.extensions(), KIOSK_ADMIN.to_owned())?;
    } else {
        log::warn!("Rejected access code attempt");
    }
    Ok(HttpResponse::Ok().json(AccessVerdict { success }))
}

#[post("/logout")]
pub async fn logout_handler(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    HttpResponse::Ok().json(AccessVerdict { success: true })
}

/// Admin page, only for sessions that entered the access code.
#[get("/admin")]
pub async fn admin_handler(
    state: Data<AppState>,
    identity: Option<Identity>,
) -> Result<impl Responder, AppError> {
    if identity.is_none() {
        return Ok(Either::Left(see_other("/")));
    }
    Ok(Either::Right(open_page(&state, ADMIN_PAGE).await?))
}

/// The admin page is never served as a plain file.
#[get("/admin-page.html")]
pub async fn admin_page_redirect_handler() -> impl Responder {
    see_other("/admin")
}

#[get("/")]
pub async fn index_handler(state: Data<AppState>) -> Result<impl Responder, AppError> {
    open_page(&state, TIP_PAGE).await
}

async fn open_page(state: &AppState, page: &str) -> Result<NamedFile, AppError> {
    NamedFile::open_async(state.public_dir.join(page))
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::PageNotFound(page.to_owned()),
            _ => AppError::IoError(e),
        })
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header(("Location", location))
        .finish()
}

pub async fn default_handler(
    req_method: Method,
    state: Data<AppState>,
) -> Result<impl Responder, AppError> {
    match req_method {
        Method::GET => match NamedFile::open_async(state.public_dir.join("404.html")).await {
            Ok(file) => Ok(Either::Left(
                file.customize().with_status(StatusCode::NOT_FOUND),
            )),
            Err(_) => Ok(Either::Right(
                HttpResponse::NotFound().json(serde_json::json!({ "error": "Not found" })),
            )),
        },
        _ => Ok(Either::Right(HttpResponse::MethodNotAllowed().finish())),
    }
}
