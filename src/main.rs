use std::io;
use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;

use simplex_editor::config::Config;
use simplex_editor::domain::solver::create_solver;
use simplex_editor::handlers::{self, AppState};
use simplex_editor::store::{FileStore, SessionStore};

// ---------- Server bootstrap ----------
#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();

    let store = FileStore::open(&config.store_dir).map_err(io::Error::other)?;
    let solver = create_solver(&config.solver_url).map_err(io::Error::other)?;
    log::info!(
        "Using {} solver at {}; storing state in {}",
        solver.name(),
        config.solver_url,
        config.store_dir.display()
    );

    let state = web::Data::new(AppState::new(SessionStore::new(Arc::new(store)), solver));
    let payload_limit = config.payload_limit;

    log::info!("Starting server on http://127.0.0.1:{}", config.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(handlers::json_config(payload_limit))
            .app_data(web::FormConfig::default().limit(payload_limit))
            .configure(handlers::configure)
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
