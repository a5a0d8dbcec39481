//! Server-Sent Events framing for provider streams
//!
//! Raw bytes are buffered until a full line is available, so a UTF-8
//! sequence split across reads is decoded only once complete. `data:` lines are
//! accumulated into the current event and a blank line dispatches it.
//! `event:`, `id:` and `retry:` fields as well as `:` comments are ignored.

/// End-of-stream marker sent by OpenAI-compatible providers
pub const DONE_MARKER: &str = "[DONE]";

/// A dispatched event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseFrame {
    /// Payload of one event, multi-line data joined with `\n`
    Data(String),
    /// The `[DONE]` marker
    Done,
}

/// Incremental SSE parser
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    data: Option<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes, returning every event completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(bytes);

        let mut frames = Vec::new();
        let Some(pos) = self.buffer.iter().rposition(|&b| b == b'\n') else {
            return frames;
        };

        let complete: Vec<u8> = self.buffer.drain(..=pos).collect();
        for raw in complete[..pos].split(|&b| b == b'\n') {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            let line = String::from_utf8_lossy(raw);
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flush an event left undispatched when the body ended without a blank line
    pub fn finish(&mut self) -> Option<SseFrame> {
        let rest = std::mem::take(&mut self.buffer);
        if !rest.is_empty() {
            let line = String::from_utf8_lossy(&rest);
            self.process_field(line.trim_end_matches('\r'));
        }
        self.data.take().map(Self::frame)
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.data.take().map(Self::frame);
        }
        self.process_field(line);
        None
    }

    fn process_field(&mut self, line: &str) {
        if line.starts_with(':') {
            return;
        }
        let (field, value) = match line.find(':') {
            Some(pos) => (&line[..pos], &line[pos + 1..]),
            None => (line, ""),
        };
        if field != "data" {
            return;
        }
        let value = value.strip_prefix(' ').unwrap_or(value);
        match self.data.as_mut() {
            Some(data) => {
                data.push('\n');
                data.push_str(value);
            }
            None => self.data = Some(value.to_string()),
        }
    }

    fn frame(data: String) -> SseFrame {
        if data.trim() == DONE_MARKER {
            SseFrame::Done
        } else {
            SseFrame::Data(data)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_event() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"data: {\"a\":1}\n\n");
        assert_eq!(frames, vec![SseFrame::Data("{\"a\":1}".to_string())]);
    }

    #[test]
    fn test_event_split_across_pushes() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"da").is_empty());
        assert!(parser.push(b"ta: hel").is_empty());
        assert!(parser.push(b"lo\n").is_empty());
        assert_eq!(
            parser.push(b"\n"),
            vec![SseFrame::Data("hello".to_string())]
        );
    }

    #[test]
    fn test_multibyte_character_split_across_pushes() {
        let event = "data: 你好 👋\n\n".as_bytes();
        let mut parser = SseParser::new();

        assert!(parser.push(&event[..7]).is_empty());
        assert!(parser.push(&event[7..14]).is_empty());
        assert_eq!(
            parser.push(&event[14..]),
            vec![SseFrame::Data("你好 👋".to_string())]
        );
    }

    #[test]
    fn test_multibyte_tail_flushed_on_finish() {
        let tail = "data: café".as_bytes();
        let mut parser = SseParser::new();
        assert!(parser.push(&tail[..tail.len() - 1]).is_empty());
        assert!(parser.push(&tail[tail.len() - 1..]).is_empty());
        assert_eq!(parser.finish(), Some(SseFrame::Data("café".to_string())));
    }

    #[test]
    fn test_done_marker() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"data: x\n\ndata: [DONE]\n\n");
        assert_eq!(frames, vec![SseFrame::Data("x".to_string()), SseFrame::Done]);
    }

    #[test]
    fn test_crlf_and_comments() {
        let mut parser = SseParser::new();
        let frames = parser.push(b": keep-alive\r\nevent: message\r\ndata: y\r\n\r\n");
        assert_eq!(frames, vec![SseFrame::Data("y".to_string())]);
    }

    #[test]
    fn test_multiline_data() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"data: one\ndata: two\n\n");
        assert_eq!(frames, vec![SseFrame::Data("one\ntwo".to_string())]);
    }

    #[test]
    fn test_blank_lines_without_data() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"\n\n\n").is_empty());
    }

    #[test]
    fn test_finish_flushes_pending_event() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"data: tail").is_empty());
        assert_eq!(parser.finish(), Some(SseFrame::Data("tail".to_string())));
        assert_eq!(parser.finish(), None);
    }
}
