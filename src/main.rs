use actix_identity::IdentityMiddleware;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{cookie::Key, middleware, App, HttpServer};
use log::info;

use tipjar_kiosk::{
    config::{Config, CONFIG},
    db,
    uploads::UploadStore,
    AppState,
};

fn get_session_key(config: &Config) -> Key {
    match config.session_key.as_deref() {
        Some(key_str) => match Key::try_from(key_str.as_bytes()) {
            Ok(key) => key,
            Err(e) => {
                log::error!("FATAL: SESSION_KEY is unusable: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            log::warn!("SESSION_KEY not set; admin sessions will not survive a restart");
            Key::generate()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config: &Config = &CONFIG;

    let db_pool = db::connect(&config.database_url).await?;

    let uploads = UploadStore::new(&config.upload_dir);
    uploads.ensure_dir().await?;
    info!("Serving uploads from {}", uploads.root().display());

    let state = AppState::new(
        db_pool,
        uploads,
        config.access_code.as_str(),
        &config.public_dir,
        config.max_upload_bytes,
    );
    let session_key = get_session_key(config);

    info!(
        "Starting HTTP server on http://{}:{}/",
        config.host, config.port
    );

    HttpServer::new(move || {
        App::new()
            // enable automatic response compression - usually register this first
            .wrap(middleware::Compress::default())
            .wrap(IdentityMiddleware::default())
            .wrap(SessionMiddleware::new(
                CookieSessionStore::default(),
                session_key.clone(),
            ))
            // enable logger - always register Actix Web Logger middleware last
            .wrap(middleware::Logger::default())
            .configure(tipjar_kiosk::configure_app(state.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
