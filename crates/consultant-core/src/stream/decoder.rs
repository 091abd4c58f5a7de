//! Incremental UTF-8 decoding and newline framing of a chunked byte stream.
//!
//! Chunk boundaries are unrelated to line boundaries: one chunk may carry
//! several lines, and a line (or a single multi-byte character) may be
//! split across chunks. The decoder keeps two carry-over buffers:
//!
//! 1. up to three bytes of an incomplete UTF-8 sequence, and
//! 2. the decoded text after the last newline seen so far.
//!
//! Invalid byte sequences become U+FFFD; decoding never fails. An
//! unterminated trailing line is dropped at end of stream.

use futures_util::{Stream, StreamExt};

const REPLACEMENT: char = '\u{FFFD}';

/// Stateful UTF-8 decoder that tolerates sequences split across chunks.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, appending the text to `out`.
    ///
    /// A trailing incomplete sequence is held back until the next call.
    pub fn decode(&mut self, chunk: &[u8], out: &mut String) {
        if self.pending.is_empty() {
            self.decode_slice(chunk, out);
        } else {
            let mut joined = std::mem::take(&mut self.pending);
            joined.extend_from_slice(chunk);
            self.decode_slice(&joined, out);
        }
    }

    /// Flush held-back bytes at end of input. An incomplete sequence
    /// decodes to a single replacement character.
    pub fn finish(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            self.pending.clear();
            out.push(REPLACEMENT);
        }
    }

    fn decode_slice(&mut self, mut input: &[u8], out: &mut String) {
        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    out.push_str(text);
                    return;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    if let Ok(text) = std::str::from_utf8(&input[..valid]) {
                        out.push_str(text);
                    }
                    match err.error_len() {
                        Some(bad) => {
                            out.push(REPLACEMENT);
                            input = &input[valid + bad..];
                        }
                        None => {
                            self.pending.extend_from_slice(&input[valid..]);
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Splits a chunked byte stream into newline-delimited frames.
#[derive(Debug, Default)]
pub struct StreamFrameDecoder {
    utf8: Utf8StreamDecoder,
    buffer: String,
}

impl StreamFrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line it completed, in order.
    ///
    /// The delimiter is a single `\n`; it is not included in the returned
    /// frames. Empty lines are returned as empty strings.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.utf8.decode(chunk, &mut self.buffer);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let complete: String = self.buffer.drain(..=last_newline).collect();
        let mut frames: Vec<String> = complete.split('\n').map(str::to_string).collect();
        // `complete` ends with the delimiter, so the final segment is always empty.
        frames.pop();
        frames
    }

    /// Text received after the last newline, not yet emitted.
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// End of stream. The unterminated remainder is discarded; its length
    /// in bytes is returned for diagnostics.
    pub fn finish(mut self) -> usize {
        let mut tail = std::mem::take(&mut self.buffer);
        self.utf8.finish(&mut tail);
        tail.len()
    }
}

/// Adapt a stream of byte chunks into a lazy stream of complete frames.
///
/// A chunk error is forwarded and ends the frame stream.
pub fn frames<S, B, E>(chunks: S) -> impl Stream<Item = Result<String, E>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + Unpin,
    B: AsRef<[u8]> + Send,
    E: Send,
{
    async_stream::try_stream! {
        let mut chunks = chunks;
        let mut decoder = StreamFrameDecoder::new();

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            for frame in decoder.push(chunk.as_ref()) {
                yield frame;
            }
        }

        let dropped = decoder.finish();
        if dropped > 0 {
            tracing::trace!(dropped_bytes = dropped, "discarding unterminated trailing frame");
        }
    }
}
