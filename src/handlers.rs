use actix_web::{web, HttpResponse, Responder};
use parking_lot::Mutex;
use serde::Deserialize;

use crate::domain::sanitize::sanitize;
use crate::domain::solver::Solver;
use crate::editor::{self, EditorAction, EditorState, SubmitError};
use crate::page;
use crate::store::SessionStore;

/// State shared by every worker
pub struct AppState {
    pub editor: Mutex<EditorState>,
    pub store: SessionStore,
    pub solver: Box<dyn Solver>,
}

impl AppState {
    /// Build the state, restoring the editor from the store
    pub fn new(store: SessionStore, solver: Box<dyn Solver>) -> Self {
        AppState {
            editor: Mutex::new(EditorState::restore(&store)),
            store,
            solver,
        }
    }
}

/// Register every route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(editor_page))
        .route("/editor", web::post().to(editor_action))
        .route("/graph", web::get().to(graph))
        .route("/tablas", web::get().to(tables_page))
        .route("/tablas/clear", web::post().to(clear_tables))
        .route("/api/sanitize", web::post().to(sanitize_field))
        .route("/health", web::get().to(health_check));
}

/// JSON extractor settings: size limit and a JSON error body
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _| {
            let err_string = err.to_string();
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(serde_json::json!({ "error": err_string })),
            )
            .into()
        })
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header(("Location", location))
        .finish()
}

// ---------- Route handlers ----------

/// GET /
pub async fn editor_page(data: web::Data<AppState>) -> impl Responder {
    let body = page::editor_page(&data.editor.lock());
    html(body)
}

/// POST /editor
pub async fn editor_action(
    data: web::Data<AppState>,
    form: web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let inputs = form.into_inner();
    let action = inputs
        .iter()
        .find(|(name, _)| name == "action")
        .and_then(|(_, value)| EditorAction::parse(value));

    {
        let mut editor = data.editor.lock();
        editor.apply_inputs(&inputs);
        if let Some(action) = action {
            editor.apply_action(action);
        }
    }

    if action == Some(EditorAction::Solve) {
        // The outcome, good or bad, is already in the results region.
        if let Err(e) = editor::submit(&data.editor, &data.store, data.solver.as_ref()).await {
            log::debug!("Submission ended without a result: {}", e);
        }
    }

    see_other("/")
}

/// GET /graph
pub async fn graph(data: web::Data<AppState>) -> impl Responder {
    match editor::fetch_graph(&data.editor, data.solver.as_ref()).await {
        // Trusted document from the solver, served as is.
        Ok(Some(document)) => html(document),
        Ok(None) => HttpResponse::NotFound()
            .content_type("text/plain; charset=utf-8")
            .body("A graph is only available for problems with exactly 2 variables."),
        Err(SubmitError::Transport(e)) => {
            log::error!("Error fetching graph: {}", e);
            HttpResponse::BadGateway()
                .content_type("text/plain; charset=utf-8")
                .body(e.to_string())
        }
        Err(e) => HttpResponse::BadRequest()
            .content_type("text/plain; charset=utf-8")
            .body(e.to_string()),
    }
}

/// GET /tablas
pub async fn tables_page(data: web::Data<AppState>) -> impl Responder {
    html(page::tables_page(data.store.result.read()))
}

/// POST /tablas/clear
pub async fn clear_tables(data: web::Data<AppState>) -> impl Responder {
    data.store.result.clear();
    see_other("/tablas")
}

#[derive(Deserialize)]
pub struct SanitizeRequest {
    text: String,
    /// Defaults to the end of the text
    cursor: Option<usize>,
}

/// POST /api/sanitize
pub async fn sanitize_field(req: web::Json<SanitizeRequest>) -> impl Responder {
    let cursor = req.cursor.unwrap_or_else(|| req.text.chars().count());
    HttpResponse::Ok().json(sanitize(&req.text, cursor))
}

/// GET /health
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().body("OK")
}
