#![allow(dead_code)]

use std::path::PathBuf;

use sqlx::sqlite::SqliteConnectOptions;
use tempfile::TempDir;
use tipjar_kiosk::{db, uploads::UploadStore, AppState};

pub const BOUNDARY: &str = "kiosk-test-boundary";
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

/// Builds the full application around `state`, sessions included.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_identity::IdentityMiddleware::default())
                .wrap(actix_session::SessionMiddleware::new(
                    actix_session::storage::CookieSessionStore::default(),
                    actix_web::cookie::Key::generate(),
                ))
                .configure(tipjar_kiosk::configure_app($state.clone())),
        )
        .await
    };
}

pub struct TestEnv {
    pub state: AppState,
    pub dir: TempDir,
}

impl TestEnv {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let pool = db::connect_with(
            SqliteConnectOptions::new().filename(dir.path().join("technicians.db")),
        )
        .await
        .expect("open database");

        let uploads = UploadStore::new(dir.path().join("uploads"));
        uploads.ensure_dir().await.expect("create upload dir");

        let public_dir = dir.path().join("public");
        std::fs::create_dir_all(&public_dir).expect("create public dir");
        std::fs::write(public_dir.join("tip-page.html"), "<h1>tips</h1>").unwrap();
        std::fs::write(public_dir.join("admin-page.html"), "<h1>admin</h1>").unwrap();

        let state = AppState::new(pool, uploads, "1234", public_dir, MAX_UPLOAD_BYTES);
        Self { state, dir }
    }

    /// On-disk location of a stored `uploads/...` reference.
    pub fn path_of(&self, reference: &str) -> PathBuf {
        self.dir.path().join(reference)
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

/// Encodes `parts` as a multipart/form-data body; returns (content type, body).
pub fn multipart(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (
        format!("multipart/form-data; boundary={}", BOUNDARY),
        body,
    )
}
