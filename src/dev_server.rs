/* src/dev_server.rs */

// Local preview server: the static output tree, plus a live reload
// WebSocket channel the dev watchers push into.

use std::path::PathBuf;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::ui::{self, BLUE, RESET};

const RELOAD_PATH: &str = "/__reload";

/// Reconnecting reload client injected into the served index page.
const LIVE_RELOAD_SCRIPT: &str = concat!(
  r#"<script>(function(){function connect(){"#,
  r#"var proto=location.protocol==="https:"?"wss:":"ws:";"#,
  r#"var ws=new WebSocket(proto+"//"+location.host+"/__reload");"#,
  r#"ws.onmessage=function(){location.reload()};"#,
  r#"ws.onclose=function(){setTimeout(connect,1000)};"#,
  r#"}connect();})();</script>"#
);

/// Fan-out from the watchers to every connected browser. Cloning shares
/// the underlying channel.
#[derive(Clone)]
pub struct ReloadHub {
  tx: broadcast::Sender<()>,
}

impl ReloadHub {
  pub fn new() -> Self {
    let (tx, _) = broadcast::channel(16);
    Self { tx }
  }

  /// Tell every connected client to refresh. A hub with no listeners is
  /// fine; the signal just evaporates.
  pub fn notify(&self) {
    let _ = self.tx.send(());
  }

  pub fn subscribe(&self) -> broadcast::Receiver<()> {
    self.tx.subscribe()
  }
}

impl Default for ReloadHub {
  fn default() -> Self {
    Self::new()
  }
}

#[derive(Clone)]
struct ServerState {
  static_dir: PathBuf,
  hub: ReloadHub,
}

/// Bind and serve until the process ends. With a hub the index page gets
/// the reload client injected and `/__reload` speaks WebSocket; without
/// one this is a plain static server.
pub async fn start_dev_server(
  static_dir: PathBuf,
  port: u16,
  reload: Option<ReloadHub>,
) -> Result<()> {
  let listener = TcpListener::bind(format!("0.0.0.0:{port}"))
    .await
    .with_context(|| format!("failed to bind port {port}"))?;
  ui::detail(&format!("serving at {BLUE}http://localhost:{port}{RESET}"));
  ui::blank();
  serve_on(listener, static_dir, reload).await
}

async fn serve_on(
  listener: TcpListener,
  static_dir: PathBuf,
  reload: Option<ReloadHub>,
) -> Result<()> {
  let serve_dir = ServeDir::new(&static_dir);
  let app = match reload {
    Some(hub) => Router::new()
      .route("/", get(serve_index))
      .route("/index.html", get(serve_index))
      .route(RELOAD_PATH, get(reload_upgrade))
      .fallback_service(serve_dir)
      .with_state(ServerState { static_dir, hub }),
    None => Router::new().fallback_service(serve_dir),
  };
  axum::serve(listener, app).await?;
  Ok(())
}

/// Serve the index page with the reload client injected. Read per
/// request so a rebuild behind the server's back still shows up.
async fn serve_index(State(state): State<ServerState>) -> Response {
  let path = state.static_dir.join("index.html");
  match tokio::fs::read_to_string(&path).await {
    Ok(html) => Html(inject_reload_script(&html)).into_response(),
    Err(_) => (StatusCode::NOT_FOUND, "index.html not found").into_response(),
  }
}

/// Insert the reload client just before `</body>`, or append when the
/// document has no closing body tag.
fn inject_reload_script(html: &str) -> String {
  match html.rfind("</body>") {
    Some(pos) => {
      let mut out = String::with_capacity(html.len() + LIVE_RELOAD_SCRIPT.len());
      out.push_str(&html[..pos]);
      out.push_str(LIVE_RELOAD_SCRIPT);
      out.push_str(&html[pos..]);
      out
    }
    None => format!("{html}{LIVE_RELOAD_SCRIPT}"),
  }
}

async fn reload_upgrade(State(state): State<ServerState>, ws: WebSocketUpgrade) -> Response {
  let hub = state.hub.clone();
  ws.on_upgrade(move |socket| handle_reload_socket(socket, hub))
}

async fn handle_reload_socket(socket: WebSocket, hub: ReloadHub) {
  use futures_util::{SinkExt as _, StreamExt as _};

  let (mut ws_sender, mut ws_receiver) = socket.split();
  let mut signals = hub.subscribe();

  loop {
    tokio::select! {
      signal = signals.recv() => {
        match signal {
          Err(broadcast::error::RecvError::Closed) => break,
          // a lagged receiver missed signals; one reload catches it up
          _ => {
            if ws_sender.send(Message::Text("reload".into())).await.is_err() {
              break;
            }
          }
        }
      }
      msg = ws_receiver.next() => {
        match msg {
          Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
          _ => {}
        }
      }
    }
  }

  let _ = ws_sender.close().await;
}
