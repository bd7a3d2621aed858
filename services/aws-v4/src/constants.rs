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
use http::header::HeaderName;
use once_cell::sync::Lazy;
use std::collections::HashSet;

// Headers used in aws services.
pub const X_AMZ_CONTENT_SHA_256: &str = "x-amz-content-sha256";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
pub const X_AMZ_DECODED_CONTENT_LENGTH: &str = "x-amz-decoded-content-length";

// Env values used in aws services.
pub const AWS_REGION: &str = "AWS_REGION";
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";

/// Algorithm tag of the signature.
pub const AWS4_HMAC_SHA256: &str = "AWS4-HMAC-SHA256";
/// Algorithm tag of the string to sign for every chunk.
pub const AWS4_HMAC_SHA256_PAYLOAD: &str = "AWS4-HMAC-SHA256-PAYLOAD";
/// Prefix prepended to the secret before key derivation.
pub const AWS4_KEY_PREFIX: &str = "AWS4";
/// Last element of the scope and last step of key derivation.
pub const AWS4_REQUEST: &str = "aws4_request";

/// Hex encoded SHA256 of an empty payload.
pub const EMPTY_STRING_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
/// Payload hash of a body sent with chunked signature framing.
pub const STREAMING_AWS4_HMAC_SHA256_PAYLOAD: &str = "STREAMING-AWS4-HMAC-SHA256-PAYLOAD";
/// Payload hash of a body that is not signed.
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Content encoding token of chunked signature framing.
pub const AWS_CHUNKED: &str = "aws-chunked";
/// Separator between chunk size and chunk signature.
pub const CHUNK_SIGNATURE_HEADER: &str = ";chunk-signature=";
/// Length of a hex encoded chunk signature.
pub const CHUNK_SIGNATURE_LENGTH: usize = 64;
pub const CRLF: &str = "\r\n";
/// Default data size of every chunk but the last two.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Headers that are never part of the signature.
///
/// They are rewritten by proxies or sdks after the request has been signed.
pub static EXCLUDED_HEADERS: Lazy<HashSet<HeaderName>> = Lazy::new(|| {
    HashSet::from([
        HeaderName::from_static("x-amzn-trace-id"),
        http::header::TRANSFER_ENCODING,
        HeaderName::from_static("amz-sdk-invocation-id"),
        HeaderName::from_static("amz-sdk-request"),
    ])
});
