//! AWS Signature Version 4 for S3 requests.
//!
//! Only what the S3 client sends is covered: a fixed header set
//! (`host`, `x-amz-content-sha256`, `x-amz-date`, optionally
//! `x-amz-security-token`) and a pre-hashed payload.

use super::credentials::Credentials;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";

/// The parts of a request that go into its signature.
pub struct RequestParts<'a> {
    pub method: &'a str,
    /// Already URI-encoded absolute path.
    pub path: &'a str,
    /// Already canonical (sorted, encoded) query string.
    pub query: &'a str,
    pub host: &'a str,
    pub payload_hash: &'a str,
}

/// Header values to attach to the signed request.
#[derive(Debug)]
pub struct Signed {
    pub amz_date: String,
    pub authorization: String,
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        unreachable!("HMAC accepts keys of any length");
    };
    mac.update(message);
    mac.finalize().into_bytes().to_vec()
}

/// Derive the per-day signing key.
pub fn signing_key(secret: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Encode a key path, keeping `/` separators.
pub fn canonical_path(key: &str) -> String {
    let encoded: Vec<_> = key.split('/').map(|segment| urlencoding::encode(segment)).collect();
    format!("/{}", encoded.join("/"))
}

/// Sort and encode query parameters.
pub fn canonical_query(params: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (urlencoding::encode(k).into_owned(), urlencoding::encode(v).into_owned()))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

fn canonical_headers(parts: &RequestParts<'_>, amz_date: &str, token: Option<&str>) -> (String, String) {
    let mut headers = format!(
        "host:{}\nx-amz-content-sha256:{}\nx-amz-date:{amz_date}\n",
        parts.host, parts.payload_hash
    );
    let mut signed = String::from("host;x-amz-content-sha256;x-amz-date");
    if let Some(token) = token {
        headers.push_str(&format!("x-amz-security-token:{token}\n"));
        signed.push_str(";x-amz-security-token");
    }
    (headers, signed)
}

/// Sign a request at `now`.
pub fn sign(
    parts: &RequestParts<'_>,
    credentials: &Credentials,
    region: &str,
    now: DateTime<Utc>,
) -> Signed {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date_stamp = now.format("%Y%m%d").to_string();
    let scope = format!("{date_stamp}/{region}/{SERVICE}/aws4_request");

    let (headers, signed_headers) =
        canonical_headers(parts, &amz_date, credentials.session_token.as_deref());
    let canonical_request = format!(
        "{}\n{}\n{}\n{headers}\n{signed_headers}\n{}",
        parts.method, parts.path, parts.query, parts.payload_hash
    );

    let string_to_sign = format!(
        "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );
    let key = signing_key(&credentials.secret_key, &date_stamp, region, SERVICE);
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()));

    Signed {
        authorization: format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            credentials.access_key
        ),
        amz_date,
    }
}
