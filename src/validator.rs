//! Request checks for the ingest endpoint.
//!
//! Three gates run in order before anything touches the disk:
//!
//! 1. [`check_method`] - only `POST` is a write
//! 2. [`read_body`] - reads at most [`MAX_BODY_BYTES`]
//! 3. [`parse_request`] - decodes the [`SaveRequest`] fields
//!
//! None of them has side effects beyond consuming body bytes.

use crate::error::IngestError;
use crate::model::SaveRequest;
use std::io::Read;

/// The single method accepted by the ingest endpoint.
pub const WRITE_METHOD: &str = "POST";

/// Size cap for request bodies (10 MiB).
pub const MAX_BODY_BYTES: usize = 10 << 20;

/// Reject anything that is not a `POST`.
pub fn check_method(method: &str) -> Result<(), IngestError> {
    if method == WRITE_METHOD {
        Ok(())
    } else {
        Err(IngestError::MethodNotAllowed {
            method: method.to_string(),
        })
    }
}

/// Read the whole body, refusing anything above `limit` bytes.
///
/// A declared `Content-Length` over the limit is refused without reading.
/// Otherwise at most `limit + 1` bytes are pulled from `reader`, which is
/// enough to tell an exact-limit body from an oversized one.
pub fn read_body<R: Read>(
    reader: R,
    content_length: Option<u64>,
    limit: usize,
) -> Result<Vec<u8>, IngestError> {
    if content_length.is_some_and(|len| len > limit as u64) {
        return Err(IngestError::PayloadTooLarge { limit });
    }

    let capacity = content_length.map_or(0, |len| len as usize);
    let mut body = Vec::with_capacity(capacity);
    reader
        .take(limit as u64 + 1)
        .read_to_end(&mut body)
        .map_err(IngestError::BodyRead)?;

    if body.len() > limit {
        return Err(IngestError::PayloadTooLarge { limit });
    }
    Ok(body)
}

/// Decode the body into a [`SaveRequest`].
///
/// Syntax errors, a top-level value that is neither an object nor `null`, and
/// a known field of the wrong type are all [`IngestError::InvalidJson`].
pub fn parse_request(body: &[u8]) -> Result<SaveRequest, IngestError> {
    serde_json::from_slice(body).map_err(IngestError::InvalidJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "peer went away"))
        }
    }

    #[test]
    fn test_check_method() {
        assert!(check_method("POST").is_ok());
        for method in ["GET", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "post"] {
            let err = check_method(method).unwrap_err();
            assert_eq!(err.status_code(), 405, "{method}");
        }
    }

    #[test]
    fn test_read_body_exact_limit() {
        let data = vec![b'x'; 64];
        let body = read_body(&data[..], None, 64).unwrap();
        assert_eq!(body.len(), 64);
    }

    #[test]
    fn test_read_body_over_limit() {
        let data = vec![b'x'; 65];
        let err = read_body(&data[..], None, 64).unwrap_err();
        assert!(matches!(err, IngestError::PayloadTooLarge { limit: 64 }));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_read_body_declared_length_over_limit() {
        let err = read_body(&b"{}"[..], Some(MAX_BODY_BYTES as u64 + 1), MAX_BODY_BYTES)
            .unwrap_err();
        assert!(matches!(err, IngestError::PayloadTooLarge { .. }));
    }

    #[test]
    fn test_read_body_stream_over_default_cap() {
        let reader = io::repeat(b' ').take(MAX_BODY_BYTES as u64 + 10);
        let err = read_body(reader, None, MAX_BODY_BYTES).unwrap_err();
        assert!(matches!(err, IngestError::PayloadTooLarge { .. }));
    }

    #[test]
    fn test_read_body_io_failure() {
        let err = read_body(FailingReader, None, MAX_BODY_BYTES).unwrap_err();
        assert!(matches!(err, IngestError::BodyRead(_)));
        assert_eq!(err.public_message(), "Failed to read body");
    }

    #[test]
    fn test_parse_request() {
        let req = parse_request(br#"{"m": 3, "status": "done"}"#).unwrap();
        assert_eq!(req.m, 3);

        let err = parse_request(b"{not json").unwrap_err();
        assert!(matches!(err, IngestError::InvalidJson(_)));
        assert!(parse_request(b"").is_err());
        assert!(parse_request(b"{\"m\":1} trailing").is_err());
        assert_eq!(parse_request(b"null").unwrap().m, 0);
    }
}
