use actix_web::{error::InternalError, get, http::header, post, web, HttpResponse};
use serde::Deserialize;
use todo_store::normalize_search;

use crate::error::AppError;
use crate::server::AppState;

/// Configure todo routes
pub fn config(cfg: &mut web::ServiceConfig) {
    // Ids that do not parse are unknown ids: plain 404, no parser message.
    let path_config = web::PathConfig::default().error_handler(|err, _req| {
        InternalError::from_response(err, HttpResponse::NotFound().finish()).into()
    });

    cfg.app_data(path_config)
        .service(index)
        .service(add_todo)
        .service(toggle_todo)
        .service(delete_todo);
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
struct AddTodoForm {
    #[serde(default)]
    title: String,
}

fn redirect_to_index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// GET / - List todos, optionally filtered by `q`
#[get("/")]
pub async fn index(
    app_state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let todos = app_state.todos.list(&query.q).await?;
    let html = app_state
        .renderer
        .render_index(&todos, normalize_search(&query.q).unwrap_or_default())?;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// POST /add - Create a todo; blank titles are ignored
#[post("/add")]
pub async fn add_todo(
    app_state: web::Data<AppState>,
    form: web::Form<AddTodoForm>,
) -> Result<HttpResponse, AppError> {
    app_state.todos.add(&form.title).await?;
    Ok(redirect_to_index())
}

/// POST /toggle/{id} - Flip the done flag
#[post("/toggle/{id}")]
pub async fn toggle_todo(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    app_state.todos.toggle(path.into_inner()).await?;
    Ok(redirect_to_index())
}

/// POST /delete/{id} - Remove a todo permanently
#[post("/delete/{id}")]
pub async fn delete_todo(
    app_state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    app_state.todos.delete(path.into_inner()).await?;
    Ok(redirect_to_index())
}
