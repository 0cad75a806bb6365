//! Minimal live-reload server.
//!
//! Browsers connect with an `EventSource`; every successful rebuild in the
//! watch loop broadcasts a `reload` event naming the rebuilt artifact.
//!
//! - `GET /livereload.js` serves a client script that reloads the page on
//!   every event.
//! - Any other `GET` opens a `text/event-stream` of events.

use std::io;
use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

const CLIENT_SCRIPT: &str = r#"(function () {
  var script = document.currentScript;
  var base = script ? script.src.replace(/livereload\.js.*$/, '') : '/';
  var source = new EventSource(base + 'events');
  source.addEventListener('reload', function () {
    window.location.reload();
  });
})();
"#;

const MAX_REQUEST_HEAD: usize = 8 * 1024;

/// A running live-reload server. Dropping it stops accepting connections.
#[derive(Debug)]
pub struct LiveReloadServer {
  addr: SocketAddr,
  events: broadcast::Sender<String>,
  accept_loop: JoinHandle<()>,
}

impl LiveReloadServer {
  /// Bind and start serving in the background.
  pub async fn bind(addr: impl ToSocketAddrs) -> io::Result<Self> {
    let listener = TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;
    let (events, _) = broadcast::channel(16);

    let accept_events = events.clone();
    let accept_loop = tokio::spawn(async move {
      loop {
        match listener.accept().await {
          Ok((stream, peer)) => {
            trace!(peer = %peer, "live reload connection");
            let events = accept_events.subscribe();
            tokio::spawn(async move {
              if let Err(e) = serve(stream, events).await {
                debug!(peer = %peer, error = %e, "live reload connection closed");
              }
            });
          }
          Err(e) => debug!(error = %e, "live reload accept failed"),
        }
      }
    });

    info!(addr = %addr, "live reload listening");
    Ok(Self {
      addr,
      events,
      accept_loop,
    })
  }

  pub fn local_addr(&self) -> SocketAddr {
    self.addr
  }

  /// Tell connected browsers that `path` was rebuilt.
  ///
  /// Returns the number of connections the event was delivered to.
  pub fn notify(&self, path: &str) -> usize {
    let delivered = self.events.send(path.to_string()).unwrap_or(0);
    debug!(path = %path, clients = delivered, "live reload notified");
    delivered
  }
}

impl Drop for LiveReloadServer {
  fn drop(&mut self) {
    self.accept_loop.abort();
  }
}

async fn serve(mut stream: TcpStream, mut events: broadcast::Receiver<String>) -> io::Result<()> {
  let Some((method, path)) = read_request_line(&mut stream).await? else {
    return Ok(());
  };

  if method != "GET" {
    stream
      .write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
      .await?;
    return Ok(());
  }

  if path.starts_with("/livereload.js") {
    let response = format!(
      "HTTP/1.1 200 OK\r\nContent-Type: application/javascript\r\nContent-Length: {}\r\nAccess-Control-Allow-Origin: *\r\nConnection: close\r\n\r\n{}",
      CLIENT_SCRIPT.len(),
      CLIENT_SCRIPT
    );
    stream.write_all(response.as_bytes()).await?;
    return Ok(());
  }

  stream
    .write_all(
      b"HTTP/1.1 200 OK\r\nContent-Type: text/event-stream\r\nCache-Control: no-cache\r\nConnection: keep-alive\r\nAccess-Control-Allow-Origin: *\r\n\r\n: connected\n\n",
    )
    .await?;

  loop {
    match events.recv().await {
      Ok(changed) => {
        let message = format!("event: reload\ndata: {changed}\n\n");
        stream.write_all(message.as_bytes()).await?;
      }
      Err(broadcast::error::RecvError::Lagged(_)) => continue,
      Err(broadcast::error::RecvError::Closed) => return Ok(()),
    }
  }
}

/// Read up to the end of the request head and return method and path.
async fn read_request_line(stream: &mut TcpStream) -> io::Result<Option<(String, String)>> {
  let mut head = Vec::with_capacity(512);
  let mut buf = [0u8; 512];

  while !head.windows(4).any(|w| w == b"\r\n\r\n") {
    let n = stream.read(&mut buf).await?;
    if n == 0 {
      return Ok(None);
    }
    head.extend_from_slice(&buf[..n]);
    if head.len() > MAX_REQUEST_HEAD {
      return Ok(None);
    }
  }

  let head = String::from_utf8_lossy(&head);
  let mut parts = head.lines().next().unwrap_or_default().split_whitespace();
  match (parts.next(), parts.next()) {
    (Some(method), Some(path)) => Ok(Some((method.to_string(), path.to_string()))),
    _ => Ok(None),
  }
}
