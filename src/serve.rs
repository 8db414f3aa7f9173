//! Purpose: Provide the HTTP/JSON server for hyperpage.
//! Exports: `ServeConfig`, `serve`, `router`.
//! Role: Axum-based loopback server exposing slice, hypermedia, and resilient pagination.
//! Invariants: Error envelopes keep the CLI error kinds; every response carries `hyperpage-version`.
//! Invariants: Loopback-only unless explicitly allowed.
//! Notes: One `Pager` is shared by all handlers; pager calls run on the blocking pool.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::IntoFuture;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hyperpage::api::{
    DEFAULT_PAGE_SIZE, Error, ErrorKind, Pager, position_arg, positive_arg,
};

#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub bind: SocketAddr,
    pub data_file: PathBuf,
    pub allow_non_loopback: bool,
}

struct AppState {
    pager: Arc<Pager>,
}

pub async fn serve(config: ServeConfig) -> Result<(), Error> {
    validate_config(&config)?;

    init_tracing();

    let app = router(Arc::new(Pager::new(config.data_file.clone())));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to bind server")
                .with_source(err)
        })?;
    info!(
        bind = %config.bind,
        file = %config.data_file.display(),
        "listening"
    );

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("server failed")
                    .with_source(err)
            })?;
        }
        _ = shutdown_signal() => {
            let _ = shutdown_tx.send(());
            match tokio::time::timeout(Duration::from_secs(10), &mut server).await {
                Ok(result) => result.map_err(|err| {
                    Error::new(ErrorKind::Io)
                        .with_message("server failed")
                        .with_source(err)
                })?,
                Err(_) => {
                    return Err(Error::new(ErrorKind::Io).with_message("server shutdown timed out"));
                }
            }
        }
    };
    info!("server stopped");
    Ok(())
}

pub fn router(pager: Arc<Pager>) -> Router {
    let state = Arc::new(AppState { pager });
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v0/info", get(dataset_info))
        .route("/v0/page", get(get_page))
        .route("/v0/hyper", get(get_hyper))
        .route("/v0/hyper_index", get(get_hyper_index))
        .route("/v0/rows/:position", delete(remove_row))
        .route("/v0/groups", get(get_groups))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn is_loopback(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(addr) => addr.is_loopback(),
        IpAddr::V6(addr) => addr.is_loopback(),
    }
}

fn validate_config(config: &ServeConfig) -> Result<(), Error> {
    if !is_loopback(config.bind.ip()) && !config.allow_non_loopback {
        return Err(Error::new(ErrorKind::Usage)
            .with_message("non-loopback bind requires explicit opt-in")
            .with_hint("Re-run with --allow-non-loopback or use a loopback address."));
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<i64>,
    page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct IndexQuery {
    index: Option<i64>,
    page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GroupQuery {
    by: Option<String>,
    list: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    kind: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<u64>,
}

async fn healthz() -> Response {
    json_response(json!({ "ok": true }))
}

async fn dataset_info(State(state): State<Arc<AppState>>) -> Response {
    let result = with_pager(&state, |pager| {
        let dataset = pager.dataset()?;
        let indexed = pager.indexed_dataset()?;
        Ok(json!({
            "file": pager.path().display().to_string(),
            "rows": dataset.len(),
            "header": dataset.header(),
            "bound": indexed.bound(),
            "live": indexed.live_len(),
        }))
    })
    .await;
    respond(result)
}

async fn get_page(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Response {
    let (page, page_size) = match page_args(query) {
        Ok(args) => args,
        Err(err) => return error_response(err),
    };
    let result = with_pager(&state, move |pager| {
        let data = pager.get_page(page, page_size)?;
        Ok(json!({ "data": data }))
    })
    .await;
    respond(result)
}

async fn get_hyper(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Response {
    let (page, page_size) = match page_args(query) {
        Ok(args) => args,
        Err(err) => return error_response(err),
    };
    let result = with_pager(&state, move |pager| {
        let hyper = pager.get_hyper(page, page_size)?;
        to_value(&hyper)
    })
    .await;
    respond(result)
}

async fn get_hyper_index(
    State(state): State<Arc<AppState>>,
    query: Result<Query<IndexQuery>, QueryRejection>,
) -> Response {
    let args = query.map_err(query_error).and_then(|Query(query)| {
        let index = query.index.map(position_arg).transpose()?;
        let page_size = optional_positive("page_size", query.page_size, DEFAULT_PAGE_SIZE)?;
        Ok((index, page_size))
    });
    let (index, page_size) = match args {
        Ok(args) => args,
        Err(err) => return error_response(err),
    };
    let result = with_pager(&state, move |pager| {
        let page = pager.get_hyper_index(index, page_size)?;
        to_value(&page)
    })
    .await;
    respond(result)
}

async fn remove_row(
    State(state): State<Arc<AppState>>,
    position: Result<AxumPath<i64>, PathRejection>,
) -> Response {
    let position = match position {
        Ok(AxumPath(position)) => position,
        Err(rejection) => {
            return error_response(
                Error::new(ErrorKind::Usage)
                    .with_message("position must be an integer")
                    .with_source(rejection),
            );
        }
    };
    let position = match position_arg(position) {
        Ok(position) => position,
        Err(err) => return error_response(err),
    };
    let result = with_pager(&state, move |pager| {
        let removed = pager.remove(position)?;
        Ok(json!({ "position": position, "removed": removed.is_some() }))
    })
    .await;
    respond(result)
}

async fn get_groups(
    State(state): State<Arc<AppState>>,
    query: Result<Query<GroupQuery>, QueryRejection>,
) -> Response {
    let args = query.map_err(query_error).and_then(|Query(query)| {
        match (query.by, query.list) {
            (Some(by), Some(list)) => Ok((by, list)),
            _ => Err(Error::new(ErrorKind::Usage)
                .with_message("groups requires `by` and `list` query parameters")
                .with_hint("Use /v0/groups?by=<column>&list=<column>.")),
        }
    });
    let (by, list) = match args {
        Ok(args) => args,
        Err(err) => return error_response(err),
    };
    let result = with_pager(&state, move |pager| {
        let groups = pager.group_by(&by, &list)?;
        to_value(&groups)
    })
    .await;
    respond(result)
}

fn page_args(query: Result<Query<PageQuery>, QueryRejection>) -> Result<(usize, usize), Error> {
    let Query(query) = query.map_err(query_error)?;
    let page = optional_positive("page", query.page, 1)?;
    let page_size = optional_positive("page_size", query.page_size, DEFAULT_PAGE_SIZE)?;
    Ok((page, page_size))
}

fn optional_positive(name: &str, value: Option<i64>, default: usize) -> Result<usize, Error> {
    value.map_or(Ok(default), |value| positive_arg(name, value))
}

fn query_error(rejection: QueryRejection) -> Error {
    Error::new(ErrorKind::Usage)
        .with_message("invalid query parameters")
        .with_hint("Numeric parameters must be integers.")
        .with_source(rejection)
}

async fn with_pager<T, F>(state: &Arc<AppState>, f: F) -> Result<T, Error>
where
    F: FnOnce(&Pager) -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    let pager = Arc::clone(&state.pager);
    tokio::task::spawn_blocking(move || f(&pager))
        .await
        .map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("pager task failed")
                .with_source(err)
        })?
}

fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode response")
            .with_source(err)
    })
}

fn respond(result: Result<serde_json::Value, Error>) -> Response {
    match result {
        Ok(value) => json_response(value),
        Err(err) => error_response(err),
    }
}

fn json_response(payload: serde_json::Value) -> Response {
    let mut response = Json(payload).into_response();
    response
        .headers_mut()
        .insert("hyperpage-version", HeaderValue::from_static("0"));
    response
}

fn error_response(err: Error) -> Response {
    let status = match err.kind() {
        ErrorKind::Usage | ErrorKind::OutOfRange => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Corrupt | ErrorKind::Io | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let body = ErrorEnvelope {
        error: ErrorBody {
            kind: format!("{:?}", err.kind()),
            message: err.message().unwrap_or("error").to_string(),
            hint: err.hint().map(str::to_string),
            path: err.path().map(|path| path.to_string_lossy().to_string()),
            position: err.position(),
        },
    };
    let mut response = (status, Json(body)).into_response();
    response
        .headers_mut()
        .insert("hyperpage-version", HeaderValue::from_static("0"));
    response
}
