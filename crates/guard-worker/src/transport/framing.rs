//! Message framing for the worker channel.
//!
//! Each message is one UTF-8 JSON object followed by exactly two line feeds.
//! Blank lines between frames are tolerated on input; output is strict.

use guard_worker_protocol::WorkerRequest;
use serde::Serialize;
use std::io::{self, BufRead, Write};

/// Read one frame from a buffered reader.
///
/// Returns `Ok(None)` at EOF. A frame that does not parse as a request
/// envelope is recoverable: it comes back as `Ok(Some(Err(message)))` so the
/// caller can report a protocol error and keep serving.
pub fn read_frame<R: BufRead>(reader: &mut R) -> io::Result<Option<Result<WorkerRequest, String>>> {
    let mut body = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            if body.trim().is_empty() {
                return Ok(None); // EOF between frames
            }
            break; // EOF terminates the final frame
        }
        if line.trim().is_empty() {
            if body.trim().is_empty() {
                continue; // stray blank lines between frames
            }
            break; // end of frame
        }
        body.push_str(&line);
    }

    match serde_json::from_str::<WorkerRequest>(body.trim()) {
        Ok(request) => Ok(Some(Ok(request))),
        Err(e) => Ok(Some(Err(format!("frame is not a valid request: {}", e)))),
    }
}

/// Write one frame: the serialized message plus the `\n\n` terminator.
pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, message: &T) -> io::Result<()> {
    let body = serde_json::to_string(message)?;
    writer.write_all(body.as_bytes())?;
    writer.write_all(b"\n\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_a_single_frame() {
        let mut input = Cursor::new(b"{\"id\":\"1\",\"command\":\"ping\"}\n\n".to_vec());
        let frame = read_frame(&mut input).unwrap().unwrap().unwrap();
        assert_eq!(frame.id, "1");
        assert_eq!(frame.command, "ping");
    }

    #[test]
    fn reads_consecutive_frames() {
        let raw = "{\"id\":\"1\",\"command\":\"ping\"}\n\n{\"id\":\"2\",\"command\":\"version\"}\n\n";
        let mut input = Cursor::new(raw.as_bytes().to_vec());
        assert_eq!(read_frame(&mut input).unwrap().unwrap().unwrap().id, "1");
        assert_eq!(read_frame(&mut input).unwrap().unwrap().unwrap().id, "2");
        assert!(read_frame(&mut input).unwrap().is_none());
    }

    #[test]
    fn tolerates_extra_blank_lines() {
        let raw = "\n\n\n{\"id\":\"1\",\"command\":\"ping\"}\n\n\n";
        let mut input = Cursor::new(raw.as_bytes().to_vec());
        assert_eq!(read_frame(&mut input).unwrap().unwrap().unwrap().id, "1");
        assert!(read_frame(&mut input).unwrap().is_none());
    }

    #[test]
    fn accepts_final_frame_without_terminator() {
        let mut input = Cursor::new(b"{\"id\":\"9\",\"command\":\"shutdown\"}".to_vec());
        assert_eq!(read_frame(&mut input).unwrap().unwrap().unwrap().id, "9");
    }

    #[test]
    fn reports_malformed_json_as_recoverable() {
        let mut input = Cursor::new(b"{nope\n\n".to_vec());
        let err = read_frame(&mut input).unwrap().unwrap();
        assert!(err.is_err());
    }

    #[test]
    fn eof_is_none() {
        let mut input = Cursor::new(Vec::new());
        assert!(read_frame(&mut input).unwrap().is_none());
    }

    #[test]
    fn write_frame_appends_two_newlines() {
        let mut out = Vec::new();
        write_frame(&mut out, &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(out, b"{\"a\":1}\n\n");
    }
}
