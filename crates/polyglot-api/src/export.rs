//! Streamed JSON export of every translation.
//!
//! A spawned producer walks the export cursor row by row, encodes records into
//! a JSON array buffer and hands full buffers to the response body through a
//! bounded channel. A slow client therefore throttles the cursor, and a gone
//! client makes the next send fail, which ends the producer and drops the
//! cursor with its pooled connection.

use axum::body::{Body, Bytes};
use axum::BoxError;
use futures_util::{Stream, StreamExt};
use serde::Serialize;
use sqlx::AnyPool;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use polyglot_db::repository::translations;

/// Buffered bytes that trigger a flush to the client.
pub const FLUSH_THRESHOLD: usize = 16 * 1024;

/// Chunks that may wait in the channel before the producer blocks.
pub const CHANNEL_CAPACITY: usize = 8;

type Chunk = Result<Bytes, BoxError>;

/// Incremental encoder for a JSON array: `[` first, comma separators, `]` last.
#[derive(Debug)]
pub struct ArrayWriter {
    buf: Vec<u8>,
    empty: bool,
}

impl Default for ArrayWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArrayWriter {
    pub fn new() -> Self {
        let mut buf = Vec::with_capacity(FLUSH_THRESHOLD + 1024);
        buf.push(b'[');
        Self { buf, empty: true }
    }

    /// Append one element. Non-ASCII text is written as-is, not `\u` escaped.
    pub fn push<T: Serialize>(&mut self, value: &T) -> serde_json::Result<()> {
        if !self.empty {
            self.buf.push(b',');
        }
        serde_json::to_writer(&mut self.buf, value)?;
        self.empty = false;
        Ok(())
    }

    pub fn should_flush(&self) -> bool {
        self.buf.len() >= FLUSH_THRESHOLD
    }

    /// Take everything buffered so far.
    pub fn take(&mut self) -> Bytes {
        Bytes::from(std::mem::take(&mut self.buf))
    }

    /// Close the array and return the remaining bytes.
    pub fn finish(mut self) -> Bytes {
        self.buf.push(b']');
        Bytes::from(self.buf)
    }
}

/// How a producer run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Completed { records: usize },
    Disconnected { records: usize },
    Failed,
}

/// Response body for `GET /translations/export/json`.
pub fn export_body(pool: AnyPool) -> Body {
    let (tx, rx) = mpsc::channel::<Chunk>(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let outcome = write_array(translations::export_stream(&pool), &tx).await;
        match outcome {
            ExportOutcome::Completed { records } => {
                tracing::info!(records, "Translation export complete");
            }
            ExportOutcome::Disconnected { records } => {
                tracing::info!(records, "Translation export abandoned by client");
            }
            ExportOutcome::Failed => {}
        }
    });

    Body::from_stream(ReceiverStream::new(rx))
}

/// Drain `records` into `tx` as one JSON array.
///
/// A record error is forwarded to the body, which aborts the response.
pub async fn write_array<S, T, E>(mut records: S, tx: &mpsc::Sender<Chunk>) -> ExportOutcome
where
    S: Stream<Item = Result<T, E>> + Unpin,
    T: Serialize,
    E: Into<BoxError>,
{
    let mut writer = ArrayWriter::new();
    let mut count = 0usize;

    while let Some(row) = records.next().await {
        let pushed = match row {
            Ok(record) => writer.push(&record).map_err(BoxError::from),
            Err(e) => Err(e.into()),
        };
        if let Err(e) = pushed {
            tracing::error!(error = %e, records = count, "Translation export failed");
            let _ = tx.send(Err(e)).await;
            return ExportOutcome::Failed;
        }
        count += 1;

        if writer.should_flush() && tx.send(Ok(writer.take())).await.is_err() {
            return ExportOutcome::Disconnected { records: count };
        }
    }

    if tx.send(Ok(writer.finish())).await.is_err() {
        return ExportOutcome::Disconnected { records: count };
    }
    ExportOutcome::Completed { records: count }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use polyglot_common::models::ExportRecord;

    fn record(i: usize, content: &str) -> ExportRecord {
        ExportRecord {
            key: format!("key.{i}"),
            locale: Some("en".into()),
            content: content.into(),
            tags: vec!["web".into()],
        }
    }

    async fn collect(mut rx: mpsc::Receiver<Chunk>) -> (Vec<u8>, usize) {
        let mut out = Vec::new();
        let mut chunks = 0;
        while let Some(chunk) = rx.recv().await {
            out.extend_from_slice(&chunk.unwrap());
            chunks += 1;
        }
        (out, chunks)
    }

    #[test]
    fn writer_emits_commas_only_between_elements() {
        let mut writer = ArrayWriter::new();
        writer.push(&1).unwrap();
        writer.push(&2).unwrap();
        writer.push(&3).unwrap();
        assert_eq!(&writer.finish()[..], b"[1,2,3]");

        assert_eq!(&ArrayWriter::new().finish()[..], b"[]");
    }

    #[test]
    fn writer_keeps_unicode_unescaped() {
        let mut writer = ArrayWriter::new();
        writer.push(&record(1, "こんにちは ¡Hola!")).unwrap();
        let text = String::from_utf8(writer.finish().to_vec()).unwrap();
        assert!(text.contains("こんにちは ¡Hola!"));
    }

    #[tokio::test]
    async fn large_exports_flush_in_several_chunks() {
        let content = "x".repeat(200);
        let records: Vec<Result<ExportRecord, sqlx::Error>> =
            (0..500).map(|i| Ok(record(i, &content))).collect();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        let collector = tokio::spawn(collect(rx));
        let outcome = write_array(stream::iter(records), &tx).await;
        drop(tx);
        let (bytes, chunks) = collector.await.unwrap();

        assert_eq!(outcome, ExportOutcome::Completed { records: 500 });
        assert!(chunks > 1);
        let parsed: Vec<ExportRecord> = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed.len(), 500);
        assert_eq!(parsed[0].key, "key.0");
        assert_eq!(parsed[499].key, "key.499");
    }

    #[tokio::test]
    async fn closed_receiver_stops_the_producer() {
        let content = "x".repeat(FLUSH_THRESHOLD);
        let records: Vec<Result<ExportRecord, sqlx::Error>> =
            (0..100).map(|i| Ok(record(i, &content))).collect();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        drop(rx);

        let outcome = write_array(stream::iter(records), &tx).await;
        assert_eq!(outcome, ExportOutcome::Disconnected { records: 1 });
    }

    #[tokio::test]
    async fn record_errors_abort_the_body() {
        let records: Vec<Result<ExportRecord, sqlx::Error>> =
            vec![Ok(record(0, "a")), Err(sqlx::Error::RowNotFound)];
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);

        let outcome = write_array(stream::iter(records), &tx).await;
        drop(tx);

        assert_eq!(outcome, ExportOutcome::Failed);
        assert!(rx.recv().await.unwrap().is_err());
        assert!(rx.recv().await.is_none());
    }
}
