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

//! Derive the scoped signing key.

use reqseal_core::hash::hmac_sha256;
use zeroize::Zeroizing;

use crate::constants::{AWS4_KEY_PREFIX, AWS4_REQUEST};

/// Derive the signing key for `date/region/service/aws4_request`:
///
/// ```text
/// kDate    = HMAC("AWS4" + secret, date)
/// kRegion  = HMAC(kDate, region)
/// kService = HMAC(kRegion, service)
/// kSigning = HMAC(kService, "aws4_request")
/// ```
///
/// `date` must be formatted as `YYYYMMDD`. Every intermediate buffer,
/// including the prefixed secret, is zeroed when dropped.
pub fn generate_signing_key(
    secret: &str,
    date: &str,
    region: &str,
    service: &str,
) -> Zeroizing<Vec<u8>> {
    let mut prefixed = Zeroizing::new(Vec::with_capacity(AWS4_KEY_PREFIX.len() + secret.len()));
    prefixed.extend_from_slice(AWS4_KEY_PREFIX.as_bytes());
    prefixed.extend_from_slice(secret.as_bytes());

    let sign_date = Zeroizing::new(hmac_sha256(&prefixed, date.as_bytes()));
    let sign_region = Zeroizing::new(hmac_sha256(&sign_date, region.as_bytes()));
    let sign_service = Zeroizing::new(hmac_sha256(&sign_region, service.as_bytes()));

    Zeroizing::new(hmac_sha256(&sign_service, AWS4_REQUEST.as_bytes()))
}
