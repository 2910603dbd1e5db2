//! In-process stand-in for the repository contents API.
//!
//! Serves directory listings, commit history, and raw file bodies for a small
//! fixture tree under `{OWNER}/{REPO}/{ROOT}`.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{Context, Result};
use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Notify;

use gallery::model::GalleryConfig;
use gallery::remote::encode_segment;

pub const OWNER: &str = "acme";
pub const REPO: &str = "widgets";
pub const ROOT: &str = "packages/Plug and play";

#[derive(Clone, Debug, Default)]
pub struct Fixture {
    /// Folder name and its (file name, body) pairs, in listing order.
    pub folders: Vec<(String, Vec<(String, Vec<u8>)>)>,
    /// Folder name -> commit dates.
    pub commits: BTreeMap<String, Vec<String>>,
    /// Folders whose listing answers 500.
    pub failing: BTreeSet<String>,
    pub history_fails: bool,
    pub root_missing: bool,
    /// Holds the first listing of one folder until released.
    pub gate: Option<Gate>,
}

/// Parks the first listing request for `folder` until `release` is notified.
/// `entered` is notified once the request is parked.
#[derive(Clone, Debug)]
pub struct Gate {
    pub folder: String,
    /// Answer the held request with 500 instead of the listing.
    pub fail: bool,
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl Gate {
    pub fn new(folder: &str, fail: bool) -> Self {
        Self {
            folder: folder.to_string(),
            fail,
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }
}

impl Fixture {
    pub fn folder(mut self, name: &str, files: &[(&str, &str)]) -> Self {
        let files = files
            .iter()
            .map(|(n, body)| (n.to_string(), body.as_bytes().to_vec()))
            .collect();
        self.folders.push((name.to_string(), files));
        self
    }

    pub fn commits(mut self, folder: &str, dates: &[&str]) -> Self {
        self.commits.insert(
            folder.to_string(),
            dates.iter().map(|d| d.to_string()).collect(),
        );
        self
    }

    pub fn failing(mut self, folder: &str) -> Self {
        self.failing.insert(folder.to_string());
        self
    }

    pub fn gated(mut self, gate: Gate) -> Self {
        self.gate = Some(gate);
        self
    }
}

/// The folder pair most tests start from.
pub fn two_widgets() -> Fixture {
    Fixture::default()
        .folder(
            "[UI] Widget A",
            &[
                ("preview.png", "png-bytes"),
                (
                    "README.md",
                    "# Widget A\n\n<img src=\"shot one.png\" width=\"200\">\n",
                ),
                ("config.json", "{\"widget\":\"a\"}"),
            ],
        )
        .folder("Widget B", &[("config.json", "{\"widget\":\"b\"}")])
}

#[derive(Debug, Default)]
pub struct Hits {
    pub listings: AtomicUsize,
    pub commits: AtomicUsize,
    pub raw: AtomicUsize,
    pub authorized: AtomicUsize,
}

impl Hits {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

struct MockState {
    base_url: String,
    fixture: Fixture,
    hits: Arc<Hits>,
    gate_used: AtomicBool,
}

pub struct ServerGuard {
    pub base_url: String,
    pub hits: Arc<Hits>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl ServerGuard {
    /// A configuration pointing every host at this server.
    pub fn config(&self) -> GalleryConfig {
        GalleryConfig {
            api_url: self.base_url.clone(),
            html_url: format!("{}/html", self.base_url),
            raw_url: format!("{}/raw", self.base_url),
            owner: OWNER.to_string(),
            repo: REPO.to_string(),
            path: ROOT.to_string(),
            ..GalleryConfig::default()
        }
    }

    /// Raw URL of a fixture file, encoded the way listings encode it.
    pub fn raw_file_url(&self, folder: &str, file: &str) -> String {
        format!(
            "{}/raw/{}/{}/main/{}",
            self.base_url,
            OWNER,
            REPO,
            encode_path(&format!("{}/{}/{}", ROOT, folder, file))
        )
    }
}

pub async fn spawn_server(fixture: Fixture) -> Result<ServerGuard> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind mock listener")?;
    let addr = listener.local_addr().context("mock local addr")?;
    let base_url = format!("http://{}", addr);
    let hits = Arc::new(Hits::default());

    let state = Arc::new(MockState {
        base_url: base_url.clone(),
        fixture,
        hits: hits.clone(),
        gate_used: AtomicBool::new(false),
    });
    let app = Router::new()
        .route("/repos/:owner/:repo/contents/*path", get(contents))
        .route("/repos/:owner/:repo/commits", get(commits))
        .route("/raw/:owner/:repo/:reference/*path", get(raw))
        .with_state(state);

    let task = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(ServerGuard {
        base_url,
        hits,
        task,
    })
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_segment)
        .collect::<Vec<_>>()
        .join("/")
}

fn count_auth(state: &MockState, headers: &HeaderMap) {
    if headers.contains_key(header::AUTHORIZATION) {
        state.hits.authorized.fetch_add(1, Ordering::SeqCst);
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

fn folder_of_path(path: &str) -> Option<&str> {
    path.strip_prefix(ROOT)
        .and_then(|rest| rest.strip_prefix('/'))
}

async fn contents(
    State(state): State<Arc<MockState>>,
    Path((_owner, _repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    state.hits.listings.fetch_add(1, Ordering::SeqCst);
    count_auth(&state, &headers);
    let fx = &state.fixture;
    let path = path.trim_matches('/');

    if path == ROOT {
        if fx.root_missing {
            return not_found();
        }
        let mut entries: Vec<serde_json::Value> = fx
            .folders
            .iter()
            .map(|(name, _)| {
                json!({
                    "name": name,
                    "path": format!("{}/{}", ROOT, name),
                    "type": "dir",
                    "download_url": null,
                    "html_url": null,
                })
            })
            .collect();
        entries.push(json!({
            "name": "LICENSE",
            "path": format!("{}/LICENSE", ROOT),
            "type": "file",
            "download_url": format!("{}/raw/{}/{}/main/LICENSE", state.base_url, OWNER, REPO),
            "html_url": null,
        }));
        return Json(entries).into_response();
    }

    let Some(folder) = folder_of_path(path) else {
        return not_found();
    };
    if let Some(gate) = fx.gate.as_ref().filter(|g| g.folder == folder)
        && !state.gate_used.swap(true, Ordering::SeqCst)
    {
        gate.entered.notify_one();
        gate.release.notified().await;
        if gate.fail {
            return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
        }
    }
    if fx.failing.contains(folder) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let Some((_, files)) = fx.folders.iter().find(|(n, _)| n == folder) else {
        return not_found();
    };

    let entries: Vec<serde_json::Value> = files
        .iter()
        .map(|(name, _)| {
            let full = encode_path(&format!("{}/{}/{}", ROOT, folder, name));
            json!({
                "name": name,
                "path": format!("{}/{}/{}", ROOT, folder, name),
                "type": "file",
                "download_url": format!("{}/raw/{}/{}/main/{}", state.base_url, OWNER, REPO, full),
                "html_url": format!("{}/html/{}/{}/blob/main/{}", state.base_url, OWNER, REPO, full),
            })
        })
        .collect();
    Json(entries).into_response()
}

#[derive(Debug, Deserialize)]
struct CommitsQuery {
    path: String,
}

async fn commits(
    State(state): State<Arc<MockState>>,
    Query(q): Query<CommitsQuery>,
    headers: HeaderMap,
) -> Response {
    state.hits.commits.fetch_add(1, Ordering::SeqCst);
    count_auth(&state, &headers);
    let fx = &state.fixture;
    if fx.history_fails {
        return (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response();
    }

    let folder = folder_of_path(&q.path).unwrap_or_default();
    let entries: Vec<serde_json::Value> = fx
        .commits
        .get(folder)
        .into_iter()
        .flatten()
        .map(|d| json!({ "commit": { "committer": { "date": d }, "author": { "date": d } } }))
        .collect();
    Json(entries).into_response()
}

async fn raw(
    State(state): State<Arc<MockState>>,
    Path((_owner, _repo, _reference, path)): Path<(String, String, String, String)>,
    headers: HeaderMap,
) -> Response {
    state.hits.raw.fetch_add(1, Ordering::SeqCst);
    count_auth(&state, &headers);
    let path = path.trim_matches('/');
    let Some((folder, file)) = folder_of_path(path).and_then(|rest| rest.rsplit_once('/')) else {
        return not_found();
    };

    let body = state
        .fixture
        .folders
        .iter()
        .find(|(n, _)| n == folder)
        .and_then(|(_, files)| files.iter().find(|(n, _)| n == file))
        .map(|(_, body)| body.clone());
    match body {
        Some(body) => body.into_response(),
        None => not_found(),
    }
}
