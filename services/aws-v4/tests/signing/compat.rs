//! Compare with the signatures of the official `aws-sigv4` crate.

use std::time::SystemTime;

use super::*;
use anyhow::Result;
use aws_credential_types::Credentials;
use aws_sigv4::http_request::PayloadChecksumKind;
use aws_sigv4::http_request::PercentEncodingMode;
use aws_sigv4::http_request::SignableBody;
use aws_sigv4::http_request::SignableRequest;
use aws_sigv4::http_request::SigningSettings;
use aws_sigv4::sign::v4;
use http::header;
use http::HeaderValue;
use http::Request;
use pretty_assertions::assert_eq;
use reqseal_aws_v4::X_AMZ_CONTENT_SHA_256;
use reqseal_core::hash::hex_sha256;

/// (name, request_builder)
type TestCase = (&'static str, fn() -> Request<&'static str>);

fn test_cases() -> Vec<TestCase> {
    vec![
        ("get_request", test_get_request),
        ("get_request_with_sse", test_get_request_with_sse),
        ("get_request_with_query", test_get_request_with_query),
        ("get_request_virtual_host", test_get_request_virtual_host),
        ("put_request", test_put_request),
        (
            "put_request_with_body_digest",
            test_put_request_with_body_digest,
        ),
        ("put_request_virtual_host", test_put_request_virtual_host),
    ]
}

fn test_get_request() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = http::Method::GET;
    *req.uri_mut() = "http://127.0.0.1:9000/hello"
        .parse()
        .expect("url must be valid");

    req
}

fn test_get_request_with_sse() -> Request<&'static str> {
    let mut req = test_get_request();
    for (k, v) in [
        ("x-amz-server-side-encryption", "a"),
        ("x-amz-server-side-encryption-customer-algorithm", "b"),
        ("x-amz-server-side-encryption-customer-key", "c"),
        ("x-amz-server-side-encryption-customer-key-md5", "d"),
        ("x-amz-server-side-encryption-aws-kms-key-id", "e"),
    ] {
        req.headers_mut()
            .insert(k, HeaderValue::from_static(v));
    }

    req
}

fn test_get_request_with_query() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = http::Method::GET;
    *req.uri_mut() =
        "http://127.0.0.1:9000/hello?list-type=2&max-keys=3&prefix=CI/&start-after=ExampleGuide.pdf"
            .parse()
            .expect("url must be valid");

    req
}

fn test_get_request_virtual_host() -> Request<&'static str> {
    let mut req = Request::new("");
    *req.method_mut() = http::Method::GET;
    *req.uri_mut() = "http://hello.s3.test.example.com/"
        .parse()
        .expect("url must be valid");

    req
}

fn test_put_request() -> Request<&'static str> {
    let content = "Hello,World!";
    let mut req = Request::new(content);
    *req.method_mut() = http::Method::PUT;
    *req.uri_mut() = "http://127.0.0.1:9000/hello"
        .parse()
        .expect("url must be valid");

    req.headers_mut().insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&content.len().to_string()).expect("must be valid"),
    );

    req
}

fn test_put_request_with_body_digest() -> Request<&'static str> {
    let mut req = test_put_request();

    let body = hex_sha256(req.body().as_bytes());
    req.headers_mut().insert(
        X_AMZ_CONTENT_SHA_256,
        HeaderValue::from_str(&body).expect("must be valid"),
    );

    req
}

fn test_put_request_virtual_host() -> Request<&'static str> {
    let mut req = test_put_request();
    *req.uri_mut() = "http://hello.s3.test.example.com/"
        .parse()
        .expect("url must be valid");

    req
}

#[track_caller]
fn compare_request(name: &str, l: &Request<&str>, r: &Request<&str>) {
    fn format_headers(req: &Request<&str>) -> Vec<String> {
        let mut hs = req
            .headers()
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v.to_str().expect("must be valid")))
            .collect::<Vec<_>>();

        // Insert host if original request doesn't have it.
        let authority = req.uri().authority().expect("authority must exist");
        if !hs.contains(&format!("host:{authority}")) {
            hs.push(format!("host:{authority}"))
        }

        hs.sort();
        hs
    }

    assert_eq!(
        format_headers(l),
        format_headers(r),
        "{name} header mismatch"
    );

    fn format_query(req: &Request<&str>) -> Vec<String> {
        let query = req.uri().query().unwrap_or_default();
        let mut query = form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| format!("{}={}", &k, &v))
            .collect::<Vec<_>>();
        query.sort();
        query
    }

    assert_eq!(format_query(l), format_query(r), "{name} query mismatch");
}

#[test]
fn test_compare_with_aws_sigv4() {
    for (name, req) in test_cases() {
        calculate(req, None)
            .unwrap_or_else(|err| panic!("calculate {name} should pass: {err:?}"));
        calculate(req, Some("security_token")).unwrap_or_else(|err| {
            panic!("calculate {name} with token should pass: {err:?}")
        });
    }
}

fn calculate(req_fn: fn() -> Request<&'static str>, token: Option<&str>) -> Result<()> {
    init();

    let mut req = req_fn();
    let name = format!(
        "{} {} {:?} {:?}",
        req.method(),
        req.uri().path(),
        req.uri().query(),
        token,
    );
    let now = time("20220313T072004Z");

    let mut ss = SigningSettings::default();
    ss.percent_encoding_mode = PercentEncodingMode::Double;
    ss.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
    let id = Credentials::new(
        "access_key_id",
        "secret_access_key",
        token.map(|v| v.to_string()),
        None,
        "hardcoded-credentials",
    )
    .into();
    let sp = v4::SigningParams::builder()
        .identity(&id)
        .region("test")
        .name("s3")
        .time(SystemTime::from(now))
        .settings(ss)
        .build()
        .expect("signing params must be valid");

    let signed_body = req.headers().get(X_AMZ_CONTENT_SHA_256).is_some();
    let body = if signed_body {
        SignableBody::Bytes(req.body().as_bytes())
    } else {
        SignableBody::UnsignedPayload
    };

    let output = aws_sigv4::http_request::sign(
        SignableRequest::new(
            req.method().as_str(),
            req.uri().to_string(),
            req.headers()
                .iter()
                .map(|(k, v)| (k.as_str(), v.to_str().expect("must be valid"))),
            body,
        )?,
        &sp.into(),
    )?;
    let (aws_sig, _) = output.into_parts();
    aws_sig.apply_to_request_http1x(&mut req);
    let expected_req = req;

    let mut cred = Credential::new("access_key_id", "secret_access_key");
    if let Some(token) = token {
        cred = cred.with_session_token(token);
    }
    let signer = RequestSigner::new("s3", "test")
        .with_config(Config {
            unsigned_payload: !signed_body,
            ..Default::default()
        })
        .with_time(now);

    let mut actual_req = req_fn();
    signer.sign_http(&mut actual_req, &cred)?;

    compare_request(&name, &expected_req, &actual_req);

    Ok(())
}
