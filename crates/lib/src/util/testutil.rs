//! Test utilities for pipewright-lib.
//!
//! Helpers for building throwaway projects and shell-backed stand-ins for the
//! external tools (linters, bundlers, minifiers) a real pipeline would call.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::config::BuildMetadata;
use crate::task::ToolCommand;

/// A tool that runs `script` through the shell, with `$1..` bound to `args`.
#[cfg(unix)]
pub fn shell_tool<I, S>(script: &str, args: I) -> ToolCommand
where
  I: IntoIterator<Item = S>,
  S: Into<String>,
{
  let mut full = vec!["-c".to_string(), script.to_string(), "sh".to_string()];
  full.extend(args.into_iter().map(Into::into));
  ToolCommand::new("/bin/sh").with_args(full)
}

/// A tool that copies its first argument to its second, like a trivial bundler.
#[cfg(unix)]
pub fn copy_tool() -> ToolCommand {
  shell_tool(
    "mkdir -p \"$(dirname \"$2\")\" && cp \"$1\" \"$2\"",
    ["$${input:0}", "$${out}"],
  )
}

/// A tool that prints `message` to stderr and exits with `code`.
#[cfg(unix)]
pub fn failing_tool(message: &str, code: i32) -> ToolCommand {
  shell_tool(&format!("echo '{message}' >&2; exit {code}"), Vec::<String>::new())
}

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
  let path = root.join(rel);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).unwrap();
  }
  fs::write(path, content).unwrap();
}

/// Read `root/rel` as a string.
pub fn read_file(root: &Path, rel: &str) -> String {
  fs::read_to_string(root.join(rel)).unwrap()
}

/// Metadata for the stock equation-editor package.
pub fn metadata(version: &str, build: Option<&str>) -> BuildMetadata {
  BuildMetadata::new("equation-editor", version, build.map(str::to_string)).unwrap()
}

/// Open a connection to a live-reload server and send a bare `GET path`.
pub async fn http_get(addr: SocketAddr, path: &str) -> TcpStream {
  let mut stream = TcpStream::connect(addr).await.unwrap();
  stream
    .write_all(format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n").as_bytes())
    .await
    .unwrap();
  stream
}

/// Read from `stream` until the received text contains `needle`.
pub async fn read_until(stream: &mut TcpStream, needle: &str) -> String {
  let mut received = Vec::new();
  let mut buf = [0u8; 1024];
  tokio::time::timeout(Duration::from_secs(5), async {
    while !String::from_utf8_lossy(&received).contains(needle) {
      let n = stream.read(&mut buf).await.unwrap();
      assert!(n > 0, "connection closed early");
      received.extend_from_slice(&buf[..n]);
    }
  })
  .await
  .expect("timed out waiting for response");
  String::from_utf8_lossy(&received).to_string()
}
