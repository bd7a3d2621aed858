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

//! Sign the chunks of a `STREAMING-AWS4-HMAC-SHA256-PAYLOAD` body.

use std::fmt::{Debug, Formatter};

use bytes::{BufMut, Bytes, BytesMut};
use reqseal_core::hash::{hex_hmac_sha256, hex_sha256};
use reqseal_core::time::{format_iso8601, DateTime};
use reqseal_core::{Error, Result};
use zeroize::Zeroizing;

use crate::constants::{
    AWS4_HMAC_SHA256_PAYLOAD, CHUNK_SIGNATURE_HEADER, CRLF, EMPTY_STRING_SHA256,
};
use crate::payload::chunk_frame_length;
use crate::SigningResult;

/// ChunkSigner signs the chunks of a body one after another.
///
/// Every chunk signature chains on the previous one, starting from the
/// signature of the request itself. The body must end with an empty chunk.
#[derive(Clone)]
pub struct ChunkSigner {
    time: DateTime,
    scope: String,
    signing_key: Zeroizing<Vec<u8>>,
    previous_signature: String,
}

impl ChunkSigner {
    /// Create a chunk signer seeded by the signing result of the request.
    pub fn new(seed: &SigningResult) -> Self {
        Self {
            time: seed.time(),
            scope: seed.scope().to_string(),
            signing_key: Zeroizing::new(seed.signing_key().to_vec()),
            previous_signature: seed.signature().to_string(),
        }
    }

    /// Signature of the last signed chunk, or of the request if no chunk
    /// is signed yet.
    pub fn previous_signature(&self) -> &str {
        &self.previous_signature
    }

    /// Sign the next chunk and return its hex encoded signature.
    ///
    /// ```text
    /// AWS4-HMAC-SHA256-PAYLOAD
    /// <timestamp>
    /// <scope>
    /// <previous_signature>
    /// <hash("")>
    /// <hash(chunk)>
    /// ```
    pub fn sign_chunk(&mut self, chunk: &[u8]) -> String {
        let string_to_sign = format!(
            "{AWS4_HMAC_SHA256_PAYLOAD}\n{}\n{}\n{}\n{EMPTY_STRING_SHA256}\n{}",
            format_iso8601(self.time),
            self.scope,
            self.previous_signature,
            hex_sha256(chunk)
        );

        let signature = hex_hmac_sha256(&self.signing_key, string_to_sign.as_bytes());
        self.previous_signature.clone_from(&signature);
        signature
    }

    /// Sign the next chunk and frame it:
    /// `hex(len);chunk-signature=<signature>\r\n<chunk>\r\n`.
    pub fn frame(&mut self, chunk: &[u8]) -> Bytes {
        let signature = self.sign_chunk(chunk);

        let mut bs = BytesMut::with_capacity(chunk_frame_length(chunk.len() as u64) as usize);
        bs.put_slice(format!("{:x}", chunk.len()).as_bytes());
        bs.put_slice(CHUNK_SIGNATURE_HEADER.as_bytes());
        bs.put_slice(signature.as_bytes());
        bs.put_slice(CRLF.as_bytes());
        bs.put_slice(chunk);
        bs.put_slice(CRLF.as_bytes());
        bs.freeze()
    }

    /// Split `body` into chunks of `chunk_size` and frame them all, the
    /// final empty chunk included.
    pub fn frame_body(&mut self, body: &[u8], chunk_size: usize) -> Result<Bytes> {
        if chunk_size == 0 {
            return Err(Error::config_invalid("chunk size must be greater than 0"));
        }

        let mut bs = BytesMut::new();
        for chunk in body.chunks(chunk_size) {
            bs.put(self.frame(chunk));
        }
        bs.put(self.frame(&[]));
        Ok(bs.freeze())
    }
}

impl Debug for ChunkSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkSigner")
            .field("time", &self.time)
            .field("scope", &self.scope)
            .field("signing_key", &"***")
            .field("previous_signature", &self.previous_signature)
            .finish()
    }
}
