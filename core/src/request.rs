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

use std::fmt::Debug;
use std::fmt::Formatter;
use std::io::Read;
use std::io::Seek;
use std::mem;
use std::str::FromStr;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::HeaderMap;
use http::HeaderValue;
use http::Method;
use http::Uri;
use log::warn;
use percent_encoding::percent_decode_str;

use crate::utils::percent_encode_strict;
use crate::utils::sort_ordinal;
use crate::Error;
use crate::Result;

/// Query parameters as `(name, value)`, a `None` value is a bare `name`.
pub type Params = Vec<(String, Option<String>)>;

/// A readable and rewindable body source.
///
/// Signers consume the stream to hash it and seek back to where it started,
/// so the same stream can be sent afterwards.
pub trait BodyStream: Read + Seek + Send {}

impl<T: Read + Seek + Send> BodyStream for T {}

/// Body of the request to sign.
#[derive(Default)]
pub enum Body {
    /// No payload.
    #[default]
    Empty,
    /// Payload fully held in memory.
    Bytes(Bytes),
    /// Payload read from a stream.
    Stream(Box<dyn BodyStream>),
}

impl Body {
    /// Build a stream body.
    pub fn stream(s: impl BodyStream + 'static) -> Self {
        Body::Stream(Box::new(s))
    }
}

impl Debug for Body {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Empty => f.write_str("Empty"),
            Body::Bytes(bs) => write!(f, "Bytes({} bytes)", bs.len()),
            Body::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bs: Bytes) -> Self {
        Body::Bytes(bs)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bs: Vec<u8>) -> Self {
        Body::Bytes(bs.into())
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Bytes(s.into())
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::Bytes(Bytes::from_static(s.as_bytes()))
    }
}

/// The request description handed to a signer.
///
/// A signer borrows it exclusively for one call and mutates `headers` in
/// place. Signing the same instance from two threads at once is not
/// supported; callers own that guarantee.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method, used as is.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, may be percent encoded.
    pub path: String,
    /// Decoded query parameters.
    pub query: Params,
    /// Raw query string which will be parsed and merged after `query`.
    pub query_string: Option<String>,
    /// Sub resources, always signed as query parameters.
    pub sub_resources: Params,
    /// HTTP headers, names are case-insensitive.
    pub headers: HeaderMap,
    /// Request payload.
    pub body: Body,
    /// Send `query` in the url. When false, `query` is sent as a form
    /// encoded body instead.
    pub use_query_string: bool,
    /// Body hash computed by the caller.
    pub content_sha256: Option<String>,
    /// Send the body with chunked signature framing.
    pub chunked: bool,
}

impl SigningRequest {
    /// Create a request to sign for given method and absolute uri.
    pub fn new(method: Method, uri: Uri) -> Result<Self> {
        Self::from_uri(method, uri, HeaderMap::new(), Body::Empty)
    }

    /// Build a signing request from http::request::Parts.
    ///
    /// `parts` is left untouched until [`SigningRequest::apply`].
    pub fn build(parts: &mut http::request::Parts, body: Body) -> Result<Self> {
        Self::from_uri(
            parts.method.clone(),
            parts.uri.clone(),
            parts.headers.clone(),
            body,
        )
    }

    fn from_uri(method: Method, uri: Uri, headers: HeaderMap, body: Body) -> Result<Self> {
        let uri = uri.into_parts();
        let paq = uri.path_and_query.unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method,
            scheme: uri.scheme.unwrap_or(Scheme::HTTP),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            query: paq.query().map(parse_query).transpose()?.unwrap_or_default(),
            query_string: None,
            sub_resources: Vec::new(),
            headers,
            body,
            use_query_string: true,
            content_sha256: None,
            chunked: false,
        })
    }

    /// Apply the signing request back to http::request::Parts.
    ///
    /// Returns the body so a stream that was hashed can still be sent. Query
    /// parameters sent as form body are returned as that body.
    pub fn apply(mut self, parts: &mut http::request::Parts) -> Result<Body> {
        self.apply_parts(parts)?;
        Ok(self.body)
    }

    /// Write method, uri and headers into `parts`.
    ///
    /// `parts` and `self.body` are only changed once nothing can fail.
    pub(crate) fn apply_parts(&mut self, parts: &mut http::request::Parts) -> Result<()> {
        let params = self.query_params()?;
        let form = self.form_body()?;

        let uri = {
            let mut uri_parts = parts.uri.clone().into_parts();
            uri_parts.scheme = Some(self.scheme.clone());
            uri_parts.authority = Some(self.authority.clone());
            uri_parts.path_and_query = {
                let mut s = self.path.clone();
                if s.is_empty() {
                    s.push('/');
                }

                for (i, (k, v)) in params.iter().enumerate() {
                    s.push(if i == 0 { '?' } else { '&' });
                    s.push_str(&percent_encode_strict(k));
                    if let Some(v) = v {
                        s.push('=');
                        s.push_str(&percent_encode_strict(v));
                    }
                }

                Some(PathAndQuery::from_str(&s)?)
            };
            Uri::from_parts(uri_parts)?
        };

        if let Some(form) = form {
            self.headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/x-www-form-urlencoded"));
            self.body = Body::Bytes(form.into());
        }

        parts.method = self.method.clone();
        parts.headers = mem::take(&mut self.headers);
        parts.uri = uri;
        Ok(())
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a raw query string like `a=b&c;d=e`.
    pub fn with_query_string(mut self, query: impl Into<String>) -> Self {
        self.query_string = Some(query.into());
        self
    }

    /// Push a sub resource.
    pub fn with_sub_resource(mut self, key: impl Into<String>, value: Option<String>) -> Self {
        self.sub_resources.push((key.into(), value));
        self
    }

    /// Send query parameters in url (`true`) or as form body (`false`).
    pub fn with_use_query_string(mut self, v: bool) -> Self {
        self.use_query_string = v;
        self
    }

    /// Set a body hash computed by the caller.
    pub fn with_content_sha256(mut self, hash: impl Into<String>) -> Self {
        self.content_sha256 = Some(hash.into());
        self
    }

    /// Enable chunked signature framing.
    pub fn with_chunked(mut self, v: bool) -> Self {
        self.chunked = v;
        self
    }

    /// Parameters sent in the url: sub resources, plus query parameters if
    /// [`SigningRequest::use_query_string`] is set.
    ///
    /// Sorted by name, a later duplicate replaces an earlier one.
    pub fn query_params(&self) -> Result<Params> {
        let mut params = self.sub_resources.clone();
        if self.use_query_string {
            params.extend(self.all_query()?);
        }

        Ok(merge_params(params))
    }

    /// Parameters sent as a form encoded body, empty if
    /// [`SigningRequest::use_query_string`] is set.
    pub fn body_params(&self) -> Result<Params> {
        if self.use_query_string {
            return Ok(Vec::new());
        }

        Ok(merge_params(self.all_query()?))
    }

    /// The form encoded body sent when query parameters are not in the url,
    /// or `None` if the request carries its own body.
    ///
    /// Pairs are sorted by name and form encoded as `k=v`, a param without
    /// value as `k=`.
    pub fn form_body(&self) -> Result<Option<String>> {
        if !matches!(self.body, Body::Empty) {
            return Ok(None);
        }

        let params = self.body_params()?;
        if params.is_empty() {
            return Ok(None);
        }

        let mut form = form_urlencoded::Serializer::new(String::new());
        for (k, v) in &params {
            form.append_pair(k, v.as_deref().unwrap_or_default());
        }
        Ok(Some(form.finish()))
    }

    fn all_query(&self) -> Result<Params> {
        let mut params = self.query.clone();
        if let Some(raw) = &self.query_string {
            params.extend(parse_query(raw)?);
        }
        Ok(params)
    }
}

/// Sort params by name and keep the last value for repeated names.
fn merge_params(mut params: Params) -> Params {
    sort_ordinal(&mut params);

    let mut merged: Params = Vec::with_capacity(params.len());
    for (k, v) in params {
        match merged.last_mut() {
            Some((last, value)) if *last == k => {
                warn!("query parameter {k} is repeated, the last value is used");
                *value = v;
            }
            _ => merged.push((k, v)),
        }
    }
    merged
}

/// Parse a raw query string into decoded pairs.
///
/// - A leading `?` is ignored.
/// - Pairs are split on `&` or `;`, unless the delimiter is directly followed
///   by a space, in which case it belongs to the value.
/// - `name` without `=` has no value.
///
/// An empty pair (leading, doubled or trailing delimiter) or a pair without
/// name is rejected.
pub fn parse_query(raw: &str) -> Result<Params> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let bs = raw.as_bytes();
    let mut params = Vec::new();
    let mut start = 0;
    for (idx, b) in bs.iter().enumerate() {
        if (*b == b'&' || *b == b';') && bs.get(idx + 1) != Some(&b' ') {
            params.push(parse_query_pair(&raw[start..idx])?);
            start = idx + 1;
        }
    }
    params.push(parse_query_pair(&raw[start..])?);

    Ok(params)
}

fn parse_query_pair(pair: &str) -> Result<(String, Option<String>)> {
    if pair.is_empty() {
        return Err(Error::format_invalid(
            "query string contains a dangling delimiter",
        ));
    }

    let (k, v) = match pair.split_once('=') {
        Some((k, v)) => (k, Some(v)),
        None => (pair, None),
    };
    if k.is_empty() {
        return Err(Error::format_invalid(format!(
            "query parameter without name: {pair}"
        )));
    }

    let k = percent_decode_str(k).decode_utf8()?.into_owned();
    let v = match v {
        Some(v) => Some(percent_decode_str(v).decode_utf8()?.into_owned()),
        None => None,
    };
    Ok((k, v))
}
