// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use axum::routing::get;
use maud::html;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::cmd::list::listing;
use crate::collection::Collection;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::report::Format;
use crate::report::page_template;
use crate::report::render_page;
use crate::types::date::Date;
use crate::types::page::Page;
use crate::view::View;

#[derive(Clone)]
struct ServerState {
    today: Date,
    collection: Arc<Mutex<Collection>>,
}

pub struct ServeArgs {
    pub port: u16,
    pub today: Date,
    pub open_browser: bool,
}

pub async fn start_server(directory: Option<String>, args: ServeArgs) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    log::debug!("Serving {}", collection.directory.display());
    let state = ServerState {
        today: args.today,
        collection: Arc::new(Mutex::new(collection)),
    };
    let app = Router::new();
    let app = app.route("/", get(all_handler));
    let app = app.route("/due", get(due_handler));
    let app = app.route("/page/{page}", get(page_handler));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state);
    let bind = format!("127.0.0.1:{}", args.port);

    if args.open_browser {
        // Open the browser once the server is accepting connections.
        let url = format!("http://{bind}/due");
        let probe = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&probe).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn all_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    listing_page(&state, View::All)
}

async fn due_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    listing_page(&state, View::Due)
}

async fn page_handler(
    State(state): State<ServerState>,
    Path(page): Path<String>,
) -> (StatusCode, Html<String>) {
    let page: Page = match page.parse() {
        Ok(page) => page,
        Err(_) => return not_found_handler().await,
    };
    let coll = state.collection.lock().unwrap();
    let result = coll
        .page(page, state.today)
        .and_then(|(rows, summary)| render_page(Format::Html, page, &rows, summary.as_ref()));
    respond(result)
}

fn listing_page(state: &ServerState, view: View) -> (StatusCode, Html<String>) {
    let coll = state.collection.lock().unwrap();
    respond(listing(&coll, view, Format::Html, state.today))
}

fn respond(result: Fallible<String>) -> (StatusCode, Html<String>) {
    match result {
        Ok(html) => (StatusCode::OK, Html(html)),
        Err(e) => {
            log::error!("{e}");
            error_page(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
    }
}

fn error_page(status: StatusCode, e: ErrorReport) -> (StatusCode, Html<String>) {
    let body = html! {
        h1 { "Something went wrong" }
        p { (e) }
    };
    (status, Html(page_template("Error", body).into_string()))
}

async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("serve/style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

async fn not_found_handler() -> (StatusCode, Html<String>) {
    let body = html! {
        h1 { "Not Found" }
    };
    (
        StatusCode::NOT_FOUND,
        Html(page_template("Not Found", body).into_string()),
    )
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use tempfile::tempdir;
    use tokio::spawn;

    use super::*;
    use crate::types::date::date;
    use crate::types::revision::Revision;

    #[tokio::test]
    async fn test_start_server_on_non_existent_directory() {
        let args = ServeArgs {
            port: 0,
            today: date(2024, 1, 1),
            open_browser: false,
        };
        let result = start_server(Some("./derpherp".to_string()), args).await;
        let err = result.err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("error: directory does not exist."));
    }

    #[tokio::test]
    async fn test_e2e() -> Fallible<()> {
        let dir = tempdir()?;
        let directory = dir.path().display().to_string();
        {
            let mut coll = Collection::new(Some(directory.clone()))?;
            let r = Revision::new(date(2024, 1, 1), 0, 0, 0);
            coll.db.add_revision(Page::new(5)?, &r)?;
            coll.db.add_revision(Page::new(6)?, &Revision { previous_interval: 90, ..r })?;
        }

        let port = portpicker::pick_unused_port().ok_or_else(|| ErrorReport::new("no port"))?;
        let args = ServeArgs {
            port,
            today: date(2024, 1, 3),
            open_browser: false,
        };
        spawn(async move { start_server(Some(directory), args).await });
        let bind = format!("127.0.0.1:{port}");
        loop {
            if let Ok(stream) = TcpStream::connect(&bind).await {
                drop(stream);
                break;
            }
            sleep(Duration::from_millis(1)).await;
        }
        let base = format!("http://{bind}");

        let get = |path: &str| reqwest::get(format!("{base}{path}"));

        let response = get("/style.css").await.map_err(http_error)?;
        assert!(response.status().is_success());
        assert_eq!(
            response.headers().get("content-type").map(|v| v.as_bytes()),
            Some(&b"text/css"[..])
        );

        let response = get("/").await.map_err(http_error)?;
        assert!(response.status().is_success());
        let html = response.text().await.map_err(http_error)?;
        assert!(html.contains("All Pages"));
        assert!(html.contains("href=\"/page/5\""));
        assert!(html.contains("href=\"/page/6\""));

        let response = get("/due").await.map_err(http_error)?;
        assert!(response.status().is_success());
        let html = response.text().await.map_err(http_error)?;
        assert!(html.contains("href=\"/page/5\""));
        assert!(!html.contains("href=\"/page/6\""));

        let response = get("/page/5").await.map_err(http_error)?;
        assert!(response.status().is_success());
        let html = response.text().await.map_err(http_error)?;
        assert!(html.contains("Page 5"));
        assert!(html.contains("2024-01-01"));

        let response = get("/page/700").await.map_err(http_error)?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get("/herp-derp").await.map_err(http_error)?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }

    fn http_error(e: reqwest::Error) -> ErrorReport {
        ErrorReport::new(format!("HTTP error: {e}"))
    }
}
