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

use std::fmt::{Debug, Formatter};

use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::HeaderValue;
use log::debug;
use reqseal_core::hash::{hex_hmac_sha256, hex_sha256};
use reqseal_core::time::{format_date, format_iso8601, now, DateTime};
use reqseal_core::utils::Redact;
use reqseal_core::{Error, Result, SignRequest, SigningCredential, SigningRequest};
use zeroize::Zeroizing;

use crate::canonical::canonical_request;
use crate::constants::{AWS4_HMAC_SHA256, AWS4_REQUEST};
use crate::key::generate_signing_key;
use crate::payload::resolve_payload_hash;
use crate::prepare::prepare_headers;
use crate::{Config, Credential};

/// RequestSigner that implement AWS SigV4.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
///
/// A signer holds no mutable state and can be shared between threads. Each
/// call borrows its [`SigningRequest`] exclusively.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    service: String,
    region: String,
    config: Config,

    time: Option<DateTime>,
}

impl RequestSigner {
    /// Create a new signer for given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),
            config: Config::default(),

            time: None,
        }
    }

    /// Create a new signer for given service, region and options are taken
    /// from `config`.
    pub fn from_config(service: &str, config: &Config) -> Result<Self> {
        let Some(region) = config.region.as_deref().filter(|v| !v.is_empty()) else {
            return Err(Error::config_invalid("region is required for signing"));
        };
        if config.chunk_size == 0 {
            return Err(Error::config_invalid("chunk size must be greater than 0"));
        }

        Ok(Self::new(service, region).with_config(config.clone()))
    }

    /// Replace the signing options.
    ///
    /// The region of this signer is kept, `config.region` is ignored.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign the request and return the signing result.
    ///
    /// `req.headers` gets `host`, `x-amz-date`, `x-amz-content-sha256` and
    /// `x-amz-security-token` as needed, but no `authorization`: use
    /// [`SigningResult::authorization`] or sign through [`SignRequest`].
    ///
    /// On error the headers may already be partially updated.
    pub fn sign(&self, req: &mut SigningRequest, cred: &Credential) -> Result<SigningResult> {
        if !cred.is_valid() {
            return Err(Error::credential_invalid(
                "access key id and secret access key are required",
            ));
        }

        let now = prepare_headers(
            req,
            self.time.unwrap_or_else(now),
            cred.session_token.as_deref(),
        )?;
        let payload_hash = resolve_payload_hash(req, &self.config)?;

        let (creq, headers) = canonical_request(req, Some(&payload_hash))?;
        debug!("calculated canonical request: {creq}");

        // Scope: "20220313/<region>/<service>/aws4_request"
        let date = format_date(now);
        let scope = format!("{date}/{}/{}/{AWS4_REQUEST}", self.region, self.service);
        debug!("calculated scope: {scope}");

        let string_to_sign = string_to_sign(now, &scope, &hex_sha256(creq.as_bytes()));
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key =
            generate_signing_key(&cred.secret_access_key, &date, &self.region, &self.service);
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        Ok(SigningResult {
            access_key_id: cred.access_key_id.clone(),
            time: now,
            signed_headers: headers.names,
            scope,
            signing_key,
            signature,
        })
    }

    /// Sign an in memory [`http::Request`] and write `authorization` into it.
    ///
    /// The query of the uri is rewritten in canonical order.
    ///
    /// An `x-amz-content-sha256` header already on `req`, `UNSIGNED-PAYLOAD`
    /// included, is dropped and replaced by the hash of the body. Sign a
    /// [`SigningRequest`] with [`SigningRequest::with_content_sha256`] to use a
    /// precomputed hash, or set [`Config::unsigned_payload`].
    pub fn sign_http<B: AsRef<[u8]>>(
        &self,
        req: &mut http::Request<B>,
        cred: &Credential,
    ) -> Result<SigningResult> {
        let mut signing = SigningRequest::new(req.method().clone(), req.uri().clone())?
            .with_body(Bytes::copy_from_slice(req.body().as_ref()));
        signing.headers = req.headers().clone();

        let result = self.sign_request(&mut signing, cred)?;

        let (mut parts, ()) = http::Request::new(()).into_parts();
        signing.apply(&mut parts)?;
        *req.method_mut() = parts.method;
        *req.uri_mut() = parts.uri;
        *req.headers_mut() = parts.headers;

        Ok(result)
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;
    type Output = SigningResult;

    fn sign_request(
        &self,
        req: &mut SigningRequest,
        credential: &Self::Credential,
    ) -> Result<Self::Output> {
        let result = self.sign(req, credential)?;

        let mut authorization = HeaderValue::from_str(&result.authorization())?;
        authorization.set_sensitive(true);
        req.headers.insert(AUTHORIZATION, authorization);

        Ok(result)
    }
}

/// Build the string to sign:
///
/// ```text
/// AWS4-HMAC-SHA256
/// 20220313T072004Z
/// 20220313/<region>/<service>/aws4_request
/// <hashed_canonical_request>
/// ```
pub fn string_to_sign(time: DateTime, scope: &str, hashed_canonical_request: &str) -> String {
    format!(
        "{AWS4_HMAC_SHA256}\n{}\n{scope}\n{hashed_canonical_request}",
        format_iso8601(time)
    )
}

/// Everything a signing call produced.
///
/// Holds the derived signing key, so drop it as soon as the authorization
/// is written (or the last chunk is signed). The key is zeroed on drop.
#[derive(Clone)]
pub struct SigningResult {
    access_key_id: String,
    time: DateTime,
    signed_headers: Vec<String>,
    scope: String,
    signing_key: Zeroizing<Vec<u8>>,
    signature: String,
}

impl SigningResult {
    /// Access key id the request is signed with.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The signing instant, also sent as `x-amz-date`.
    pub fn time(&self) -> DateTime {
        self.time
    }

    /// Signed header names, lower case and sorted.
    pub fn signed_headers(&self) -> &[String] {
        &self.signed_headers
    }

    /// Credential scope: `date/region/service/aws4_request`.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The derived signing key.
    pub fn signing_key(&self) -> &[u8] {
        &self.signing_key
    }

    /// Hex encoded signature.
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Value of the `authorization` header.
    pub fn authorization(&self) -> String {
        format!(
            "{AWS4_HMAC_SHA256} Credential={}/{}, SignedHeaders={}, Signature={}",
            self.access_key_id,
            self.scope,
            self.signed_headers.join(";"),
            self.signature
        )
    }
}

impl Debug for SigningResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningResult")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("time", &self.time)
            .field("signed_headers", &self.signed_headers)
            .field("scope", &self.scope)
            .field("signing_key", &"***")
            .field("signature", &self.signature)
            .finish()
    }
}
