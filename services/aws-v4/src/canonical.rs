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

//! Build the canonical request.

use http::HeaderMap;
use http::Method;
use log::warn;
use percent_encoding::percent_decode_str;
use reqseal_core::utils::{compress_whitespace, percent_encode_strict, sort_ordinal};
use reqseal_core::{Result, SigningRequest};

use crate::constants::EXCLUDED_HEADERS;

/// Canonical form of the signed headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalHeaders {
    /// One `name:value` line per header, each ending with `\n`.
    pub canonical: String,
    /// Lower case header names in signing order.
    pub names: Vec<String>,
}

impl CanonicalHeaders {
    /// Header names joined by `;`.
    pub fn signed_headers(&self) -> String {
        self.names.join(";")
    }
}

/// Encode and join params as `k=v` pairs with `&`, sorted by raw name.
///
/// A param without value is written as `k=`.
pub fn canonical_query_string(params: &[(String, Option<String>)]) -> String {
    let mut params = params.to_vec();
    sort_ordinal(&mut params);

    let mut s = String::with_capacity(16);
    for (idx, (k, v)) in params.iter().enumerate() {
        if idx != 0 {
            s.push('&');
        }

        s.push_str(&percent_encode_strict(k));
        s.push('=');
        if let Some(v) = v {
            s.push_str(&percent_encode_strict(v));
        }
    }

    s
}

/// Encode every path segment, runs of `/` are collapsed.
///
/// The path is percent decoded first so an encoded path is not encoded twice.
pub fn canonical_path(path: &str) -> Result<String> {
    let decoded = percent_decode_str(path).decode_utf8()?;

    let mut s = String::with_capacity(decoded.len() + 1);
    for segment in decoded.split('/').filter(|v| !v.is_empty()) {
        s.push('/');
        s.push_str(&percent_encode_strict(segment));
    }
    if s.is_empty() || decoded.ends_with('/') {
        s.push('/');
    }

    Ok(s)
}

/// Canonicalize all headers except [`EXCLUDED_HEADERS`].
///
/// Values are trimmed and inner whitespace is collapsed. Only the last value
/// of a repeated header is signed.
pub fn canonical_headers(headers: &HeaderMap) -> Result<CanonicalHeaders> {
    let mut pairs = Vec::with_capacity(headers.keys_len());
    for name in headers.keys() {
        if EXCLUDED_HEADERS.contains(name) {
            continue;
        }

        let values = headers.get_all(name);
        if values.iter().count() > 1 {
            warn!("header {name} is repeated, only the last value is signed");
        }
        let value = match values.iter().last() {
            Some(v) => v.to_str()?,
            None => continue,
        };
        pairs.push((name.as_str().to_string(), compress_whitespace(value)));
    }
    sort_ordinal(&mut pairs);

    let mut canonical = String::with_capacity(pairs.len() * 32);
    let mut names = Vec::with_capacity(pairs.len());
    for (name, value) in pairs {
        canonical.push_str(&name);
        canonical.push(':');
        canonical.push_str(&value);
        canonical.push('\n');
        names.push(name);
    }

    Ok(CanonicalHeaders { canonical, names })
}

/// Assemble the canonical request:
///
/// ```text
/// METHOD
/// CANONICAL_PATH
/// CANONICAL_QUERY
/// CANONICAL_HEADERS (every line ends with \n)
/// SIGNED_HEADERS
/// BODY_HASH
/// ```
///
/// A missing body hash leaves the last line empty, most services will
/// reject such a signature.
pub fn canonical_request_string(
    method: &Method,
    path: &str,
    query: &str,
    headers: &CanonicalHeaders,
    payload_hash: Option<&str>,
) -> String {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    f.push_str(method.as_str());
    f.push('\n');
    f.push_str(path);
    f.push('\n');
    f.push_str(query);
    f.push('\n');
    f.push_str(&headers.canonical);
    f.push('\n');
    f.push_str(&headers.signed_headers());
    f.push('\n');
    match payload_hash {
        Some(hash) => f.push_str(hash),
        None => warn!("payload hash is not available, the canonical request is incomplete"),
    }

    f
}

/// Canonicalize `req` as it is now.
///
/// Headers must already be prepared and the payload hash resolved.
pub fn canonical_request(
    req: &SigningRequest,
    payload_hash: Option<&str>,
) -> Result<(String, CanonicalHeaders)> {
    let path = canonical_path(&req.path)?;
    let query = canonical_query_string(&req.query_params()?);
    let headers = canonical_headers(&req.headers)?;

    let creq = canonical_request_string(&req.method, &path, &query, &headers, payload_hash);
    Ok((creq, headers))
}
