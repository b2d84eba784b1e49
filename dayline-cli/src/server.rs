//! Local web dashboard: JSON API plus one static page.
//!
//! Every request is a separate load-modify-save against the JSON files.
//! Two requests racing on a write can lose one update; acceptable for a
//! single local user.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dayline_core::{GoalId, GoalPatch, NewGoal, time::parse_iso_date};
use dayline_store::{Clock, ConfigRepository, GoalRepository, JsonStore, Planner, StoreError};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

const DASHBOARD_HTML: &str = include_str!("dashboard.html");
const MAX_BODY_BYTES: usize = 64 * 1024;

type ApiResponse = Response<Full<Bytes>>;

pub async fn serve(store: JsonStore, addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("bind {}", addr))?;
    info!(%addr, data_dir = %store.root().display(), "dashboard listening");
    println!("Dashboard: http://{}", addr);

    let planner = Arc::new(Planner::new(store));

    loop {
        let (stream, peer) = tokio::select! {
            accepted = listener.accept() => accepted.context("accept connection")?,
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                return Ok(());
            }
        };

        let planner = planner.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let svc = service_fn(move |req| handle(planner.clone(), req));
            if let Err(e) = http1::Builder::new().serve_connection(io, svc).await {
                debug!(%peer, error = %e, "connection ended with error");
            }
        });
    }
}

async fn handle(
    planner: Arc<Planner<JsonStore>>,
    req: Request<Incoming>,
) -> Result<ApiResponse, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);

    let body = match read_body(req.into_body()).await {
        Ok(bytes) => bytes,
        Err(resp) => return Ok(resp),
    };

    let resp = route(&planner, &method, &path, query.as_deref(), &body);
    debug!(%method, %path, status = resp.status().as_u16(), "request");
    Ok(resp)
}

/// Read a request body, refusing anything over `MAX_BODY_BYTES`.
async fn read_body<B>(body: B) -> Result<Bytes, ApiResponse>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(error_json(
            StatusCode::PAYLOAD_TOO_LARGE,
            &format!("request body exceeds {MAX_BODY_BYTES} bytes"),
        )),
        Err(e) => Err(error_json(
            StatusCode::BAD_REQUEST,
            &format!("unreadable request body: {e}"),
        )),
    }
}

#[derive(Debug, Default, Deserialize)]
struct SkipBody {
    #[serde(default)]
    reason: Option<String>,
}

/// Dispatch one request. Synchronous so it can be exercised without a socket.
pub fn route<R, C>(
    planner: &Planner<R, C>,
    method: &Method,
    path: &str,
    query: Option<&str>,
    body: &[u8],
) -> ApiResponse
where
    R: GoalRepository + ConfigRepository,
    C: Clock,
{
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        (&Method::GET, [""]) | (&Method::GET, ["index.html"]) => html(DASHBOARD_HTML),

        (&Method::GET, ["api", "goals"]) => reply(StatusCode::OK, planner.goals()),
        (&Method::POST, ["api", "goals"]) => match parse_body::<NewGoal>(body) {
            Ok(draft) => reply(StatusCode::CREATED, planner.add_goal(draft)),
            Err(resp) => resp,
        },

        (&Method::PATCH, ["api", "goals", id]) => {
            with_id(id, |id| match parse_body::<GoalPatch>(body) {
                Ok(patch) => reply(StatusCode::OK, planner.update_goal(id, &patch)),
                Err(resp) => resp,
            })
        }
        (&Method::DELETE, ["api", "goals", id]) => {
            with_id(id, |id| reply(StatusCode::OK, planner.delete_goal(id)))
        }
        (&Method::POST, ["api", "goals", id, "complete"]) => {
            with_id(id, |id| reply(StatusCode::OK, planner.complete(id)))
        }
        (&Method::POST, ["api", "goals", id, "skip"]) => with_id(id, |id| {
            let parsed = if body.iter().all(u8::is_ascii_whitespace) {
                Ok(SkipBody::default())
            } else {
                parse_body::<SkipBody>(body)
            };
            match parsed {
                Ok(skip) => reply(StatusCode::OK, planner.skip(id, skip.reason.as_deref())),
                Err(resp) => resp,
            }
        }),

        (&Method::GET, ["api", "config"]) => reply(StatusCode::OK, planner.config()),
        (&Method::GET, ["api", "schedule"]) => match schedule_date(query) {
            Ok(Some(date)) => reply(StatusCode::OK, planner.schedule_for(date)),
            Ok(None) => reply(StatusCode::OK, planner.schedule()),
            Err(msg) => error_json(StatusCode::BAD_REQUEST, &msg),
        },

        _ => error_json(StatusCode::NOT_FOUND, &format!("no route for {} {}", method, path)),
    }
}

fn with_id<F>(raw: &str, f: F) -> ApiResponse
where
    F: FnOnce(GoalId) -> ApiResponse,
{
    match raw.parse::<GoalId>() {
        Ok(id) => f(id),
        Err(_) => error_json(StatusCode::BAD_REQUEST, &format!("invalid goal id '{}'", raw)),
    }
}

fn schedule_date(query: Option<&str>) -> Result<Option<NaiveDate>, String> {
    let Some(q) = query else { return Ok(None) };
    for pair in q.split('&') {
        if let Some(value) = pair.strip_prefix("date=") {
            return parse_iso_date(value).map(Some).map_err(|e| e.to_string());
        }
    }
    Ok(None)
}

fn parse_body<T: for<'de> Deserialize<'de>>(body: &[u8]) -> Result<T, ApiResponse> {
    serde_json::from_slice(body)
        .map_err(|e| error_json(StatusCode::BAD_REQUEST, &format!("invalid JSON body: {e}")))
}

fn reply<T: Serialize>(ok: StatusCode, result: dayline_store::Result<T>) -> ApiResponse {
    match result {
        Ok(value) => match serde_json::to_vec(&value) {
            Ok(bytes) => respond(ok, "application/json", bytes),
            Err(e) => error_json(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
        },
        Err(e) => store_error(e),
    }
}

fn store_error(e: StoreError) -> ApiResponse {
    if e.is_not_found() {
        error_json(StatusCode::NOT_FOUND, &e.to_string())
    } else if e.is_validation() {
        error_json(StatusCode::BAD_REQUEST, &e.to_string())
    } else {
        error!(error = %e, "store failure");
        error_json(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
    }
}

fn error_json(status: StatusCode, msg: &str) -> ApiResponse {
    let body = json!({ "error": msg }).to_string();
    respond(status, "application/json", body.into_bytes())
}

fn html(page: &'static str) -> ApiResponse {
    respond(StatusCode::OK, "text/html; charset=utf-8", page.as_bytes().to_vec())
}

fn respond(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> ApiResponse {
    let mut resp = Response::new(Full::new(Bytes::from(body)));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    resp
}
