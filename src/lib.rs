#[macro_use]
extern crate lazy_static;

use std::path::{Path, PathBuf};

use actix_files::Files;
use actix_web::web::{self, Data};
use sqlx::SqlitePool;

pub mod config;
pub mod db;
pub mod errors;
pub mod forms;
pub mod routes;
pub mod structs;
pub mod technicians;
pub mod uploads;
pub mod utils;

pub use errors::AppError;
use uploads::{UploadStore, UPLOAD_ROUTE};

#[derive(Debug, Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub uploads: UploadStore,
    pub access_code: String,
    pub public_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        db_pool: SqlitePool,
        uploads: UploadStore,
        access_code: impl Into<String>,
        public_dir: impl Into<PathBuf>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            db_pool,
            uploads,
            access_code: access_code.into(),
            public_dir: public_dir.into(),
            max_upload_bytes,
        }
    }
}

/// Registers state, API routes, the static file mounts and the fallback on an `App`.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let uploads = Files::new(&format!("/{}", UPLOAD_ROUTE), state.uploads.root())
            .default_handler(web::to(routes::default_handler));
        let assets = public_files("/static", &state.public_dir);
        // the root mount catches every remaining path, so it goes last
        let pages = public_files("/", &state.public_dir);
        cfg.app_data(Data::new(state));
        routes::configure(cfg);
        cfg.service(uploads)
            .service(assets)
            .service(pages)
            .default_service(web::to(routes::default_handler));
    }
}

/// Serves the kiosk pages and their assets, except the session-gated admin page.
fn public_files(mount: &str, dir: &Path) -> Files {
    Files::new(mount, dir)
        .path_filter(|path, _| path != Path::new(routes::ADMIN_PAGE))
        .default_handler(web::to(routes::default_handler))
}
