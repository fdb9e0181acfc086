use std::path::Path;

use axum::{
    body::Body,
    extract::{FromRequest, Path as AxumPath, Request, State},
    http::{header, HeaderValue, Method, Response, StatusCode},
    response::{Html, IntoResponse},
    Form,
};
use serde::Deserialize;

use crate::components::View;
use crate::errors::NotesError;
use crate::routing::{self, Action, PageId};
use crate::types::{AppState, IndexContext, Page};
use crate::utils::{content_type_for, current_year, is_safe_relative_path};

const USERNAME_REQUIRED: &str = "Please enter a username.";

#[derive(Debug, Deserialize)]
pub struct SaveForm {
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct UsernameForm {
    #[serde(default)]
    pub username: String,
}

/// 302 redirect
fn found(location: &str) -> Response<Body> {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => NotesError::NotFound.into_response(),
    }
}

fn index_context(state: &AppState) -> IndexContext {
    IndexContext {
        title: "Index".to_string(),
        links: state.index.list(&state.page_extension),
        year: current_year(),
        username: state.settings.username(),
        ..Default::default()
    }
}

/// Handle `GET /`: list every stored page
pub async fn handle_root(State(state): State<AppState>) -> Result<impl IntoResponse, NotesError> {
    let context = index_context(&state);
    log::info!("Serving index with {} pages", context.links.len());
    Ok(Html(state.templates.render_index(&context)?))
}

/// Handle `POST /`: update the configured username
pub async fn handle_update_username(
    State(state): State<AppState>,
    Form(form): Form<UsernameForm>,
) -> Result<Response<Body>, NotesError> {
    if form.username.is_empty() {
        log::warn!("Rejected empty username");
        let mut context = index_context(&state);
        context.errors.insert("Username".to_string(), USERNAME_REQUIRED.to_string());
        return Ok(Html(state.templates.render_index(&context)?).into_response());
    }

    state.settings.update_username(&form.username)?;
    Ok(found("/"))
}

/// Any other method on `/` goes back to the index
pub async fn redirect_root() -> Response<Body> {
    found("/")
}

/// Dispatch `/<action>/<identifier>` requests; everything else is not found
pub async fn handle_page(State(state): State<AppState>, request: Request) -> Response<Body> {
    let (action, id) = match routing::resolve(request.method(), request.uri().path()) {
        Ok(route) => route,
        Err(e) => {
            log::warn!("{} {} rejected: {}", request.method(), request.uri().path(), e);
            return e.into_response();
        }
    };
    log::info!("{} request for page '{}'", action, id);
    let is_head = *request.method() == Method::HEAD;

    let result = match action {
        Action::View => view_page(&state, id),
        Action::Edit => edit_page(&state, id),
        Action::Save => match Form::<SaveForm>::from_request(request, &state).await {
            Ok(Form(form)) => save_page(&state, id, form),
            Err(rejection) => return rejection.into_response(),
        },
    };
    let response = result.unwrap_or_else(IntoResponse::into_response);
    if is_head {
        let (parts, _) = response.into_parts();
        return Response::from_parts(parts, Body::empty());
    }
    response
}

fn view_page(state: &AppState, id: PageId) -> Result<Response<Body>, NotesError> {
    match state.pages.load(&id) {
        Ok(page) => Ok(Html(state.templates.render_page(View::View, &page)?).into_response()),
        Err(NotesError::NotFound) => {
            log::debug!("Page '{}' missing, redirecting to editor", id);
            Ok(found(&format!("/edit/{}", id)))
        }
        Err(e) => Err(e),
    }
}

fn edit_page(state: &AppState, id: PageId) -> Result<Response<Body>, NotesError> {
    let page = match state.pages.load(&id) {
        Ok(page) => page,
        Err(NotesError::NotFound) => Page::empty(id),
        Err(e) => return Err(e),
    };
    Ok(Html(state.templates.render_page(View::Edit, &page)?).into_response())
}

fn save_page(state: &AppState, id: PageId, form: SaveForm) -> Result<Response<Body>, NotesError> {
    let page = Page::new(id, form.body);
    state.pages.save(&page)?;
    Ok(found(&format!("/view/{}", page.id)))
}

pub async fn handle_favicon(State(state): State<AppState>) -> Result<Response<Body>, NotesError> {
    serve_static(&state.img_dir, "favicon.ico")
}

pub async fn handle_assets(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, NotesError> {
    serve_static(&state.assets_dir, &path)
}

pub async fn handle_css(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, NotesError> {
    serve_static(&state.css_dir, &path)
}

pub async fn handle_img(
    State(state): State<AppState>,
    AxumPath(path): AxumPath<String>,
) -> Result<Response<Body>, NotesError> {
    serve_static(&state.img_dir, &path)
}

fn serve_static(dir: &Path, req_path: &str) -> Result<Response<Body>, NotesError> {
    if !is_safe_relative_path(req_path) {
        log::warn!("Rejected static path '{}'", req_path);
        return Err(NotesError::NotFound);
    }
    let requested = dir.join(req_path);
    if !requested.is_file() {
        return Err(NotesError::NotFound);
    }

    let bytes = std::fs::read(&requested)?;
    let mut resp = Response::new(Body::from(bytes));
    resp.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type_for(&requested)),
    );
    Ok(resp)
}
