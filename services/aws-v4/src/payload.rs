// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
//! Resolve how the payload is represented in the signature.

use std::io::{Seek, SeekFrom};

use http::header::{CONTENT_ENCODING, CONTENT_LENGTH};
use http::HeaderValue;
use log::debug;
use reqseal_core::hash::{hex_sha256, hex_sha256_reader};
use reqseal_core::{Body, Error, Result, SigningRequest};

use crate::constants::*;
use crate::Config;

/// Resolve the payload hash of `req`, in order:
///
/// 1. Chunked framing: [`STREAMING_AWS4_HMAC_SHA256_PAYLOAD`]. `content-length`
///    is moved to `x-amz-decoded-content-length` and replaced by the framed
///    length; `aws-chunked` is added to `content-encoding`.
/// 2. The hash set on the request by the caller.
/// 3. [`UNSIGNED_PAYLOAD`] if the config asks for it.
/// 4. SHA256 of the stream, read once and rewound.
/// 5. SHA256 of the bytes, or of the form encoded query parameters when they
///    are sent as body.
///
/// The result is written to `x-amz-content-sha256` unless disabled in config.
pub fn resolve_payload_hash(req: &mut SigningRequest, config: &Config) -> Result<String> {
    let hash = if req.chunked {
        apply_chunked_headers(req, config.chunk_size)?;
        STREAMING_AWS4_HMAC_SHA256_PAYLOAD.to_string()
    } else if let Some(hash) = &req.content_sha256 {
        hash.clone()
    } else if config.unsigned_payload {
        UNSIGNED_PAYLOAD.to_string()
    } else if let Body::Stream(s) = &mut req.body {
        let start = s.stream_position().map_err(|e| {
            Error::body_unreadable("failed to get body stream position").with_source(e)
        })?;
        let hash = hex_sha256_reader(s)
            .map_err(|e| Error::body_unreadable("failed to read body stream").with_source(e))?;
        s.seek(SeekFrom::Start(start))
            .map_err(|e| Error::body_unreadable("failed to rewind body stream").with_source(e))?;
        hash
    } else if let Body::Bytes(bs) = &req.body {
        hex_sha256(bs)
    } else {
        match req.form_body()? {
            Some(form) => hex_sha256(form.as_bytes()),
            None => EMPTY_STRING_SHA256.to_string(),
        }
    };
    debug!("calculated payload hash: {hash}");

    if config.content_sha256_header {
        req.headers.insert(X_AMZ_CONTENT_SHA_256, HeaderValue::from_str(&hash)?);
    }

    Ok(hash)
}

fn apply_chunked_headers(req: &mut SigningRequest, chunk_size: usize) -> Result<()> {
    if let Some(value) = req.headers.get(CONTENT_LENGTH) {
        let length: u64 = value
            .to_str()
            .map_err(|e| Error::format_invalid("content-length is not text").with_source(e))?
            .trim()
            .parse()
            .map_err(|e| {
                Error::format_invalid("content-length is not a valid length").with_source(e)
            })?;
        let framed = chunked_content_length(length, chunk_size)?;
        debug!("chunked content-length: {length} => {framed}");

        let decoded = value.clone();
        req.headers.insert(X_AMZ_DECODED_CONTENT_LENGTH, decoded);
        req.headers.insert(CONTENT_LENGTH, HeaderValue::from(framed));
    }

    let encoding = match req.headers.get(CONTENT_ENCODING) {
        None => HeaderValue::from_static(AWS_CHUNKED),
        Some(v) => {
            let v = v.to_str()?;
            if v.split(',').any(|token| token.trim().eq_ignore_ascii_case(AWS_CHUNKED)) {
                return Ok(());
            }
            HeaderValue::from_str(&format!("{v}, {AWS_CHUNKED}"))?
        }
    };
    req.headers.insert(CONTENT_ENCODING, encoding);

    Ok(())
}

/// Framed length of one chunk carrying `size` bytes of data:
///
/// ```text
/// hex(size) ";chunk-signature=" signature "\r\n" data "\r\n"
/// ```
///
/// Saturates at `u64::MAX`.
pub fn chunk_frame_length(size: u64) -> u64 {
    chunk_frame_overhead(size).saturating_add(size)
}

fn checked_frame_length(size: u64) -> Option<u64> {
    chunk_frame_overhead(size).checked_add(size)
}

fn chunk_frame_overhead(size: u64) -> u64 {
    let hex_len = format!("{size:x}").len() as u64;

    hex_len
        + CHUNK_SIGNATURE_HEADER.len() as u64
        + CHUNK_SIGNATURE_LENGTH as u64
        + CRLF.len() as u64
        + CRLF.len() as u64
}

/// Total framed length of a body of `length` bytes sent in chunks of
/// `chunk_size`, including the final empty chunk.
pub fn chunked_content_length(length: u64, chunk_size: usize) -> Result<u64> {
    if chunk_size == 0 {
        return Err(Error::config_invalid("chunk size must be greater than 0"));
    }
    let chunk_size = chunk_size as u64;

    let full_chunks = length / chunk_size;
    let remaining = length % chunk_size;

    let total = checked_frame_length(chunk_size)
        .and_then(|frame| full_chunks.checked_mul(frame))
        .and_then(|total| match remaining {
            0 => Some(total),
            n => total.checked_add(checked_frame_length(n)?),
        })
        .and_then(|total| total.checked_add(chunk_frame_length(0)));
    total.ok_or_else(|| Error::format_invalid("content-length too large for chunked framing"))
}

/// Bytes chunk framing adds to a body of `length` bytes.
pub fn framing_overhead(length: u64, chunk_size: usize) -> Result<u64> {
    Ok(chunked_content_length(length, chunk_size)? - length)
}
