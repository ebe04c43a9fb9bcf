//! MLLP envelope construction.
//!
//! HL7 v2 segments are `CR`-delimited. Messages authored or transferred on `LF`/`CRLF`
//! systems are canonicalised before framing so receivers do not mis-segment them.

use crate::{END_BLOCK, START_BLOCK};

/// Rewrite every `CRLF` and every remaining bare `LF` to a bare `CR`.
pub fn normalize(message: &str) -> String {
    message.replace("\r\n", "\r").replace('\n', "\r")
}

/// Wrap a message in the MLLP v1 envelope: `0x0B || normalize(message) || 0x1C 0x0D`.
///
/// No checksum or length prefix is added.
pub fn frame(message: &str) -> Vec<u8> {
    let normalized = normalize(message);
    let mut framed = Vec::with_capacity(normalized.len() + 1 + END_BLOCK.len());
    framed.push(START_BLOCK);
    framed.extend_from_slice(normalized.as_bytes());
    framed.extend_from_slice(&END_BLOCK);
    framed
}

/// Strip the MLLP envelope from a framed buffer.
///
/// Returns `None` unless the buffer starts with the start byte and ends with the end pair.
pub fn deframe(framed: &[u8]) -> Option<&[u8]> {
    framed
        .strip_prefix(&[START_BLOCK])
        .and_then(|rest| rest.strip_suffix(&END_BLOCK))
}

/// First `segments` normalised segments of a message, for display.
pub fn preview(message: &str, segments: usize) -> Vec<String> {
    normalize(message)
        .split('\r')
        .take(segments)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "MSH|^~\\&|HIS|HOSP|MIRTH|FHIR|20240101120000||ADT^A01|MSG0001|P|2.5\nPID|1||P123||Doe^John||19800101|M";

    #[test]
    fn normalize_rewrites_lf_to_cr() {
        let normalized = normalize(SAMPLE);
        assert!(!normalized.contains('\n'));
        assert_eq!(normalized.split('\r').count(), 2);
        assert!(normalized.starts_with("MSH|"));
        assert!(normalized.contains("\rPID|1||P123"));
    }

    #[test]
    fn normalize_collapses_crlf_to_single_cr() {
        assert_eq!(normalize("MSH|a\r\nPID|b\r\n"), "MSH|a\rPID|b\r");
    }

    #[test]
    fn normalize_leaves_cr_delimited_input_untouched() {
        let input = "MSH|a\rPID|b\rPV1|c";
        assert_eq!(normalize(input), input);
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in [
            "",
            "\n",
            "\r\n\r\n",
            "\r\r\n\n\r",
            "\n\r",
            SAMPLE,
            "MSH|x\r\nPID|y\nPV1|z\r",
        ] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {input:?}");
        }
    }

    #[test]
    fn frame_wraps_normalized_payload() {
        let framed = frame("MSH|a\nPID|b");
        assert_eq!(framed[0], START_BLOCK);
        assert_eq!(&framed[framed.len() - 2..], &END_BLOCK[..]);
        assert_eq!(&framed[1..framed.len() - 2], b"MSH|a\rPID|b");
    }

    #[test]
    fn deframe_recovers_normalized_message() {
        let framed = frame(SAMPLE);
        let payload = deframe(&framed).expect("well-formed envelope");
        assert_eq!(payload, normalize(SAMPLE).as_bytes());
    }

    #[test]
    fn deframe_rejects_missing_envelope() {
        assert!(deframe(b"MSH|a").is_none());
        assert!(deframe(&[START_BLOCK, b'M']).is_none());
        assert!(deframe(&[b'M', 0x1C_u8, 0x0D]).is_none());
    }

    #[test]
    fn empty_message_frames_to_bare_envelope() {
        assert_eq!(frame(""), vec![0x0Bu8, 0x1C, 0x0D]);
        assert_eq!(deframe(&frame("")), Some(&b""[..]));
    }

    #[test]
    fn preview_takes_leading_segments() {
        let lines = preview("MSH|1\r\nEVN|2\nPID|3\rPV1|4", 2);
        assert_eq!(lines, vec!["MSH|1".to_string(), "EVN|2".to_string()]);
    }
}
