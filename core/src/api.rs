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

use crate::Result;
use crate::SigningRequest;

/// SigningCredential is the trait used by signer as the signing credential.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    fn is_valid(&self) -> bool;
}

/// SignRequest is the trait used by signer to sign the request.
///
/// Implementations mutate `req.headers` in place and leave the rest of the
/// request untouched.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: SigningCredential;

    /// Result handed back to the caller after a successful signing.
    type Output;

    /// Sign the request.
    ///
    /// The signature must be applied to `req` before returning, so the request
    /// can be sent as is.
    fn sign_request(
        &self,
        req: &mut SigningRequest,
        credential: &Self::Credential,
    ) -> Result<Self::Output>;
}
