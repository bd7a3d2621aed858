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
use std::env;

use crate::constants::*;

/// Config for aws v4 signer.
#[derive(Clone, Debug)]
pub struct Config {
    /// `region` will be loaded from:
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AWS_REGION`]
    /// - env value: [`AWS_DEFAULT_REGION`]
    pub region: Option<String>,
    /// Data size of every full chunk when a request is sent with chunked
    /// signature framing.
    ///
    /// - default to 64 KiB
    pub chunk_size: usize,
    /// Sign requests with `UNSIGNED-PAYLOAD` instead of hashing their body.
    ///
    /// A body hash set on the request, or chunked framing, still takes
    /// precedence.
    pub unsigned_payload: bool,
    /// Write the body hash into the `x-amz-content-sha256` header.
    ///
    /// The hash is part of the signature either way; disable this only for
    /// services that reject the header.
    ///
    /// - default to `true`
    pub content_sha256_header: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            region: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            unsigned_payload: false,
            content_sha256_header: true,
        }
    }
}

impl Config {
    /// Load config from env.
    pub fn from_env(mut self) -> Self {
        if self.region.is_none() {
            self.region = env::var(AWS_REGION)
                .or_else(|_| env::var(AWS_DEFAULT_REGION))
                .ok()
                .filter(|v| !v.is_empty());
        }

        self
    }
}
