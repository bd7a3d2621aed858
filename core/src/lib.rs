//! Core components for signing API requests.
//!
//! This crate provides the service agnostic building blocks of the reqseal
//! signers: the request description handed to a signer, hashing and
//! canonical text helpers, time formatting and the error type.
//!
//! ## Overview
//!
//! - **SigningRequest**: the request to sign, owned by the caller and borrowed
//!   exclusively by a signer for one call.
//! - **Traits**: [`SignRequest`] for service signers and
//!   [`SigningCredential`] for credential validation.
//! - **Signer**: pairs a [`SignRequest`] with a credential and signs
//!   `http::request::Parts`.
//!
//! ## Example
//!
//! ```
//! use reqseal_core::{Result, SignRequest, Signer, SigningCredential, SigningRequest};
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     token: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.token.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!     type Output = ();
//!
//!     fn sign_request(&self, req: &mut SigningRequest, cred: &MyCredential) -> Result<()> {
//!         req.headers.insert("x-token", cred.token.parse()?);
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let signer = Signer::new(MySigner, MyCredential { token: "t".to_string() });
//!
//! let (mut parts, mut body) = http::Request::get("https://example.com")
//!     .body(reqseal_core::Body::Empty)?
//!     .into_parts();
//! signer.sign_parts(&mut parts, &mut body)?;
//! assert_eq!(parts.headers["x-token"], "t");
//! # Ok(())
//! # }
//! ```
//!
//! ## Utilities
//!
//! - [`hash`]: Cryptographic hashing utilities
//! - [`time`]: Time manipulation utilities
//! - [`utils`]: Canonical text helpers and data redaction

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{SignRequest, SigningCredential};
mod request;
pub use request::{parse_query, Body, BodyStream, Params, SigningRequest};
mod signer;
pub use signer::Signer;
