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
//! Prepare request headers before canonicalization.

use http::header::{AUTHORIZATION, CONTENT_LENGTH, HOST};
use http::uri::{Authority, Scheme};
use http::HeaderValue;
use log::debug;
use reqseal_core::time::{format_iso8601, DateTime};
use reqseal_core::{Result, SigningRequest};

use crate::constants::{
    X_AMZ_CONTENT_SHA_256, X_AMZ_DATE, X_AMZ_DECODED_CONTENT_LENGTH, X_AMZ_SECURITY_TOKEN,
};

/// Insert the headers every signed request carries.
///
/// Artifacts of a previous signing are removed first, so a signed request
/// can be signed again:
///
/// - `authorization` and `x-amz-content-sha256` are dropped.
/// - `x-amz-decoded-content-length` is moved back into `content-length`.
///
/// Then `host` is inserted if absent, `x-amz-date` is set to `now` and
/// `x-amz-security-token` is set if a session token is given.
///
/// Returns `now` so every later step signs the same instant.
pub fn prepare_headers(
    req: &mut SigningRequest,
    now: DateTime,
    session_token: Option<&str>,
) -> Result<DateTime> {
    req.headers.remove(AUTHORIZATION);
    req.headers.remove(X_AMZ_CONTENT_SHA_256);
    if let Some(decoded) = req.headers.remove(X_AMZ_DECODED_CONTENT_LENGTH) {
        debug!("restore content-length from x-amz-decoded-content-length");
        req.headers.insert(CONTENT_LENGTH, decoded);
    }

    if !req.headers.contains_key(HOST) {
        let host = host_header_value(&req.scheme, &req.authority);
        req.headers.insert(HOST, HeaderValue::from_str(&host)?);
    }

    req.headers.insert(X_AMZ_DATE, HeaderValue::try_from(format_iso8601(now))?);

    if let Some(token) = session_token {
        let mut value = HeaderValue::from_str(token)?;
        // Set token value sensitive to avoid leaking.
        value.set_sensitive(true);
        req.headers.insert(X_AMZ_SECURITY_TOKEN, value);
    }

    Ok(now)
}

/// Host with `:port` appended only if the port is not the scheme default.
pub fn host_header_value(scheme: &Scheme, authority: &Authority) -> String {
    let default_port = if *scheme == Scheme::HTTPS {
        Some(443)
    } else if *scheme == Scheme::HTTP {
        Some(80)
    } else {
        None
    };

    match authority.port_u16() {
        Some(port) if Some(port) != default_port => format!("{}:{port}", authority.host()),
        _ => authority.host().to_string(),
    }
}
