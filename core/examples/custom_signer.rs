use std::env;

use reqseal_core::hash::hex_hmac_sha256;
use reqseal_core::time::{format_iso8601, now};
use reqseal_core::utils::percent_encode_strict;
use reqseal_core::{Body, Result, SignRequest, Signer, SigningCredential, SigningRequest};

// Define a custom credential type
#[derive(Clone, Debug)]
struct MyCredential {
    api_key: String,
    api_secret: String,
}

impl SigningCredential for MyCredential {
    fn is_valid(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

// Sign `METHOD\nPATH\nQUERY\nDATE` with the api secret.
#[derive(Debug)]
struct MySigner;

impl SignRequest for MySigner {
    type Credential = MyCredential;
    type Output = String;

    fn sign_request(&self, req: &mut SigningRequest, cred: &MyCredential) -> Result<String> {
        let date = format_iso8601(now());

        let query = req
            .query_params()?
            .into_iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    percent_encode_strict(&k),
                    percent_encode_strict(v.as_deref().unwrap_or_default())
                )
            })
            .collect::<Vec<_>>()
            .join("&");
        let string_to_sign = format!("{}\n{}\n{query}\n{date}", req.method, req.path);
        let signature = hex_hmac_sha256(cred.api_secret.as_bytes(), string_to_sign.as_bytes());

        req.headers.insert("x-my-date", date.parse()?);
        req.headers.insert("x-my-key", cred.api_key.parse()?);
        let mut value: http::HeaderValue = signature.parse()?;
        value.set_sensitive(true);
        req.headers.insert("x-my-signature", value);

        Ok(signature)
    }
}

fn main() -> Result<()> {
    // For demo purposes, use dummy credentials if none are provided
    let cred = MyCredential {
        api_key: env::var("MY_API_KEY").unwrap_or_else(|_| "demo-api-key".to_string()),
        api_secret: env::var("MY_API_SECRET").unwrap_or_else(|_| "demo-api-secret".to_string()),
    };
    let signer = Signer::new(MySigner, cred);

    let (mut parts, _) = http::Request::get("https://api.example.com/v1/users?b=2&a=1")
        .body(())?
        .into_parts();
    let mut body = Body::Empty;
    let signature = signer.sign_parts(&mut parts, &mut body)?;

    println!("signed {} with {signature}", parts.uri);
    for (name, value) in &parts.headers {
        println!("{name}: {value:?}");
    }
    Ok(())
}
