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
use std::mem;
use std::sync::Arc;

use crate::Body;
use crate::Error;
use crate::Result;
use crate::SignRequest;
use crate::SigningCredential;
use crate::SigningRequest;

/// Signer is the main struct used to sign the request.
#[derive(Debug)]
pub struct Signer<S: SignRequest> {
    builder: Arc<S>,
    credential: S::Credential,
}

impl<S: SignRequest> Clone for Signer<S> {
    fn clone(&self) -> Self {
        Self {
            builder: self.builder.clone(),
            credential: self.credential.clone(),
        }
    }
}

impl<S: SignRequest> Signer<S> {
    /// Create a new signer.
    pub fn new(builder: S, credential: S::Credential) -> Self {
        Self {
            builder: Arc::new(builder),
            credential,
        }
    }

    /// Sign a signing request in place.
    pub fn sign(&self, req: &mut SigningRequest) -> Result<S::Output> {
        if !self.credential.is_valid() {
            return Err(Error::credential_invalid(
                "credential is empty or incomplete",
            ));
        }

        self.builder.sign_request(req, &self.credential)
    }

    /// Sign http request parts together with their body.
    ///
    /// `body` is handed back through the same reference after signing, a
    /// stream body is rewound to where it started.
    pub fn sign_parts(
        &self,
        parts: &mut http::request::Parts,
        body: &mut Body,
    ) -> Result<S::Output> {
        let mut req = SigningRequest::build(parts, Body::Empty)?;
        req.body = mem::take(body);

        let result = self.sign(&mut req).and_then(|output| {
            req.apply_parts(parts)?;
            Ok(output)
        });
        *body = mem::take(&mut req.body);
        result
    }
}
