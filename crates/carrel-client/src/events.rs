//! The drowsiness alert feed.
//!
//! The backend publishes a `drowsinessAlert` event on its SSE endpoint each
//! time the detector fires. [`SseParser`] handles the `text/event-stream`
//! wire format incrementally; [`spawn_alert_feed`] wraps it in a task that
//! reconnects on stream drop and stops on cancellation.

use std::time::Duration;

use carrel_core::alerts::DrowsinessAlert;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{client::ApiClient, error::ApiError};

/// Event name the backend uses for detector firings.
pub const ALERT_EVENT: &str = "drowsinessAlert";

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// One complete SSE frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
  pub name: String,
  pub data: String,
}

/// Incremental parser for the `text/event-stream` format.
///
/// Feed raw chunks in whatever split the transport produces; complete
/// events come out as the blank line that terminates them arrives. Buffers
/// bytes, not text, so a UTF-8 character split across chunks survives.
#[derive(Debug, Default)]
pub struct SseParser {
  buffer: Vec<u8>,
  name:   Option<String>,
  data:   Vec<String>,
}

impl SseParser {
  pub fn new() -> Self {
    Self::default()
  }

  /// Feed one chunk and collect the events it completes.
  pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
    self.buffer.extend_from_slice(chunk);
    let mut out = Vec::new();
    while let Some(idx) = self.buffer.iter().position(|&b| b == b'\n') {
      let raw: Vec<u8> = self.buffer.drain(..=idx).collect();
      let line = String::from_utf8_lossy(&raw);
      let line = line.trim_end_matches('\n').trim_end_matches('\r');
      self.line(line, &mut out);
    }
    out
  }

  fn line(&mut self, line: &str, out: &mut Vec<SseEvent>) {
    if line.is_empty() {
      // Blank line terminates the pending event. No data, no dispatch.
      if !self.data.is_empty() {
        out.push(SseEvent {
          name: self.name.take().unwrap_or_else(|| "message".to_owned()),
          data: self.data.join("\n"),
        });
      }
      self.name = None;
      self.data.clear();
      return;
    }
    if line.starts_with(':') {
      // Comment line, typically a keepalive.
      return;
    }
    let (field, value) = match line.split_once(':') {
      Some((f, v)) => (f, v.strip_prefix(' ').unwrap_or(v)),
      None => (line, ""),
    };
    match field {
      "event" => self.name = Some(value.to_owned()),
      "data" => self.data.push(value.to_owned()),
      // id, retry and anything else the backend may add.
      _ => {}
    }
  }
}

/// Spawn the alert feed and return its delivery channel.
///
/// The task reopens the stream after a short delay whenever it drops, and
/// stops when `shutdown` is cancelled, when the receiver is gone, or when
/// the backend rejects the session.
pub fn spawn_alert_feed(
  client: ApiClient,
  shutdown: CancellationToken,
) -> mpsc::Receiver<DrowsinessAlert> {
  let (tx, rx) = mpsc::channel(32);
  tokio::spawn(run_feed(client, tx, shutdown));
  rx
}

async fn run_feed(
  client: ApiClient,
  tx: mpsc::Sender<DrowsinessAlert>,
  shutdown: CancellationToken,
) {
  loop {
    let opened = tokio::select! {
      biased;
      _ = shutdown.cancelled() => return,
      r = client.open_alert_stream() => r,
    };

    match opened {
      Ok(resp) => {
        let mut parser = SseParser::new();
        let mut chunks = resp.bytes_stream();
        loop {
          let chunk = tokio::select! {
            biased;
            _ = shutdown.cancelled() => return,
            c = chunks.next() => c,
          };
          match chunk {
            Some(Ok(bytes)) => {
              for event in parser.feed(&bytes) {
                if event.name != ALERT_EVENT {
                  continue;
                }
                match serde_json::from_str::<DrowsinessAlert>(&event.data) {
                  Ok(alert) => {
                    if tx.send(alert).await.is_err() {
                      warn!("alert consumer gone, stopping feed");
                      return;
                    }
                  }
                  Err(e) => warn!(error = %e, "undecodable alert payload"),
                }
              }
            }
            Some(Err(e)) => {
              warn!(error = %e, "alert stream broke");
              break;
            }
            None => {
              debug!("alert stream ended");
              break;
            }
          }
        }
      }
      Err(ApiError::Unauthorized) => {
        debug!("alert feed unauthorized, stopping");
        return;
      }
      Err(e) => warn!(error = %e, "alert stream connect failed"),
    }

    tokio::select! {
      biased;
      _ = shutdown.cancelled() => return,
      _ = tokio::time::sleep(RECONNECT_DELAY) => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn single_event_in_one_chunk() {
    let mut p = SseParser::new();
    let events = p.feed(b"event: drowsinessAlert\ndata: {\"x\":1}\n\n");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "drowsinessAlert");
    assert_eq!(events[0].data, "{\"x\":1}");
  }

  #[test]
  fn event_split_across_chunks() {
    let mut p = SseParser::new();
    assert!(p.feed(b"event: drowsi").is_empty());
    assert!(p.feed(b"nessAlert\ndata: hi").is_empty());
    let events = p.feed(b"\n\n");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, "hi");
  }

  #[test]
  fn utf8_character_split_across_chunks() {
    let frame = "event: drowsinessAlert\ndata: 홍길동\n\n".as_bytes();
    // Split inside the first multi-byte character of the payload.
    let cut = frame.iter().position(|&b| b > 0x7f).unwrap() + 1;
    let mut p = SseParser::new();
    assert!(p.feed(&frame[..cut]).is_empty());
    let events = p.feed(&frame[cut..]);
    assert_eq!(events[0].data, "홍길동");
  }

  #[test]
  fn comments_and_unknown_fields_are_skipped() {
    let mut p = SseParser::new();
    let events = p.feed(
      b": keepalive\nid: 7\nretry: 3000\nevent: other\ndata: x\n\n",
    );
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "other");
  }

  #[test]
  fn multi_line_data_joins_with_newline() {
    let mut p = SseParser::new();
    let events = p.feed(b"data: one\ndata: two\n\n");
    assert_eq!(events[0].data, "one\ntwo");
    assert_eq!(events[0].name, "message");
  }

  #[test]
  fn crlf_line_endings_are_accepted() {
    let mut p = SseParser::new();
    let events = p.feed(b"event: drowsinessAlert\r\ndata: hi\r\n\r\n");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].data, "hi");
  }

  #[test]
  fn blank_line_without_data_dispatches_nothing() {
    let mut p = SseParser::new();
    assert!(p.feed(b"event: drowsinessAlert\n\n").is_empty());
  }

  #[test]
  fn incomplete_event_stays_buffered() {
    let mut p = SseParser::new();
    assert!(p.feed(b"data: pending\n").is_empty());
    let events = p.feed(b"\n");
    assert_eq!(events.len(), 1);
  }

  #[test]
  fn consecutive_events_in_one_chunk() {
    let mut p = SseParser::new();
    let events = p.feed(b"event: a\ndata: 1\n\nevent: b\ndata: 2\n\n");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name, "a");
    assert_eq!(events[1].name, "b");
  }
}
