//! Transducer from a chunked NDJSON byte stream to a flat text stream.
//!
//! The generation backend answers with one JSON envelope per line, and chunk
//! boundaries fall anywhere, including inside a multi-byte character. The
//! assembler buffers raw bytes and only hands out whole lines; the stream
//! adapter pulls chunks on demand, so backpressure and cancellation follow
//! from ordinary `Stream` semantics (dropping the adapter drops the
//! upstream).

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::Stream;

/// Reassembles newline-terminated lines out of arbitrarily split chunks.
/// Bytes after the last newline stay buffered until a later chunk completes
/// the line; an unterminated tail at end of input is never emitted.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buf: Vec<u8>,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk; returns every line the chunk completed, in order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=pos).collect();
            // a line that is not valid UTF-8 cannot hold a valid envelope;
            // it is skipped like any other malformed line
            if let Ok(text) = std::str::from_utf8(&line[..line.len() - 1]) {
                lines.push(text.to_string());
            }
        }
        lines
    }
}

/// Pull the text fragment out of one envelope line. `None` for blank lines,
/// invalid JSON, or envelopes without a non-empty `message.content`.
pub fn extract_fragment(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let envelope: serde_json::Value = serde_json::from_str(line).ok()?;
    let content = envelope.get("message")?.get("content")?.as_str()?;
    if content.is_empty() {
        return None;
    }
    Some(content.to_string())
}

/// Stream adapter: NDJSON chunks in, plain text fragments out, arrival order
/// preserved. Malformed lines are skipped silently; an upstream error is
/// forwarded once and terminates the stream.
#[derive(Debug)]
pub struct NdjsonText<S> {
    upstream: S,
    assembler: LineAssembler,
    ready: VecDeque<String>,
    done: bool,
}

impl<S> NdjsonText<S> {
    pub fn new(upstream: S) -> Self {
        Self {
            upstream,
            assembler: LineAssembler::new(),
            ready: VecDeque::new(),
            done: false,
        }
    }
}

impl<S, E> Stream for NdjsonText<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    type Item = Result<String, E>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(text) = this.ready.pop_front() {
                return Poll::Ready(Some(Ok(text)));
            }
            if this.done {
                return Poll::Ready(None);
            }
            match Pin::new(&mut this.upstream).poll_next(cx) {
                Poll::Ready(Some(Ok(chunk))) => {
                    for line in this.assembler.push(&chunk) {
                        if let Some(fragment) = extract_fragment(&line) {
                            this.ready.push_back(fragment);
                        }
                    }
                }
                Poll::Ready(Some(Err(err))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(err)));
                }
                Poll::Ready(None) => {
                    // a dangling unterminated line is discarded, matching the
                    // line-oriented upstream contract
                    this.done = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use futures_util::stream;
    use std::convert::Infallible;

    const TWO_ENVELOPES: &str =
        "{\"message\":{\"content\":\"He\"}}\n{\"message\":{\"content\":\"llo 世界\"}}\n";

    async fn collect_ok(chunks: Vec<&[u8]>) -> String {
        let items: Vec<Result<Bytes, Infallible>> = chunks
            .into_iter()
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        let mut out = String::new();
        let mut transduced = NdjsonText::new(stream::iter(items));
        while let Some(fragment) = transduced.next().await {
            out.push_str(&fragment.expect("fragment"));
        }
        out
    }

    #[test]
    fn assembler_holds_partial_lines() {
        let mut assembler = LineAssembler::new();
        assert!(assembler.push(b"{\"a\":1").is_empty());
        assert_eq!(assembler.push(b"}\n{\"b\":2}"), vec!["{\"a\":1}"]);
        assert_eq!(assembler.push(b"\n"), vec!["{\"b\":2}"]);
    }

    #[test]
    fn fragment_extraction_skips_malformed() {
        assert_eq!(
            extract_fragment("{\"message\":{\"content\":\"hi\"}}").as_deref(),
            Some("hi")
        );
        assert_eq!(extract_fragment("not json"), None);
        assert_eq!(extract_fragment("{\"message\":{}}"), None);
        assert_eq!(extract_fragment("{\"message\":{\"content\":\"\"}}"), None);
        assert_eq!(extract_fragment("   "), None);
    }

    #[tokio::test]
    async fn reassembles_identically_for_every_split_point() {
        let bytes = TWO_ENVELOPES.as_bytes();
        for split in 0..=bytes.len() {
            let out = collect_ok(vec![&bytes[..split], &bytes[split..]]).await;
            assert_eq!(out, "Hello 世界", "split at byte {split}");
        }
    }

    #[tokio::test]
    async fn invalid_line_between_valid_lines_is_skipped() {
        let ndjson = "{\"message\":{\"content\":\"a\"}}\n{broken\n{\"message\":{\"content\":\"b\"}}\n";
        let out = collect_ok(vec![ndjson.as_bytes()]).await;
        assert_eq!(out, "ab");
    }

    #[tokio::test]
    async fn dangling_tail_without_newline_is_discarded() {
        let ndjson = "{\"message\":{\"content\":\"kept\"}}\n{\"message\":{\"content\":\"lost\"}}";
        let out = collect_ok(vec![ndjson.as_bytes()]).await;
        assert_eq!(out, "kept");
    }

    #[tokio::test]
    async fn upstream_error_terminates_the_stream() {
        let items: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"{\"message\":{\"content\":\"x\"}}\n")),
            Err(std::io::Error::other("connection reset")),
        ];
        let mut transduced = NdjsonText::new(stream::iter(items));
        assert_eq!(
            transduced.next().await.expect("first").expect("fragment"),
            "x"
        );
        assert!(transduced.next().await.expect("second").is_err());
        assert!(transduced.next().await.is_none());
    }

    #[tokio::test]
    async fn envelopes_without_content_produce_nothing() {
        let ndjson = "{\"done\":true}\n{\"message\":{\"thinking\":\"...\"}}\n";
        let out = collect_ok(vec![ndjson.as_bytes()]).await;
        assert_eq!(out, "");
    }
}
