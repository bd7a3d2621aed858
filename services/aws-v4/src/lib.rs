//! AWS SigV4 (`AWS4-HMAC-SHA256`) request signer.
//!
//! ## Example
//!
//! ```
//! use reqseal_aws_v4::{Credential, RequestSigner};
//!
//! # fn main() -> reqseal_core::Result<()> {
//! let signer = RequestSigner::new("s3", "us-east-1");
//! let cred = Credential::new("access_key_id", "secret_access_key");
//!
//! let mut req = http::Request::get("https://bucket.s3.amazonaws.com/object")
//!     .body(Vec::new())?;
//! let result = signer.sign_http(&mut req, &cred)?;
//!
//! assert_eq!(req.headers()["authorization"], result.authorization().as_str());
//! # Ok(())
//! # }
//! ```
//!
//! Bodies sent with chunked signature framing are signed with
//! [`SigningRequest::with_chunked`](reqseal_core::SigningRequest::with_chunked)
//! and framed by a [`ChunkSigner`].

mod config;
pub use config::Config;

mod credential;
pub use credential::Credential;

mod sign_request;
pub use sign_request::string_to_sign;
pub use sign_request::RequestSigner;
pub use sign_request::SigningResult;

mod chunk;
pub use chunk::ChunkSigner;

mod canonical;
pub use canonical::canonical_headers;
pub use canonical::canonical_path;
pub use canonical::canonical_query_string;
pub use canonical::canonical_request;
pub use canonical::canonical_request_string;
pub use canonical::CanonicalHeaders;

mod key;
pub use key::generate_signing_key;

mod payload;
pub use payload::chunk_frame_length;
pub use payload::chunked_content_length;
pub use payload::framing_overhead;
pub use payload::resolve_payload_hash;

mod prepare;
pub use prepare::host_header_value;
pub use prepare::prepare_headers;

mod constants;
pub use constants::*;
