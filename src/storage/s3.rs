//! S3 bucket client over the REST API.
//!
//! Requests go to the virtual-hosted endpoint
//! `https://{bucket}.s3.{region}.amazonaws.com/{key}` and are signed with
//! SigV4. Listing uses ListObjectsV2 and follows continuation tokens.

use super::credentials::Credentials;
use super::sigv4::{self, RequestParts, canonical_path, canonical_query, sha256_hex};
use super::{BlobStore, StorageError, folder_key, hosted_prefix, normalize_key};
use crate::config::StorageConfig;
use crate::log;
use chrono::Utc;
use quick_xml::{Reader, events::Event};
use reqwest::blocking::{Client, Response};
use reqwest::{Method, header};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub struct S3Store {
    client: Client,
    bucket: String,
    region: String,
    credentials: Credentials,
}

impl S3Store {
    pub fn new(
        bucket: &str,
        region: &str,
        credentials: Credentials,
        timeout: Duration,
    ) -> Result<Self, StorageError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            bucket: bucket.to_owned(),
            region: region.to_owned(),
            credentials,
        })
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        let credentials = Credentials::resolve(&config.credentials, &config.profile)?;
        Self::new(
            &config.bucket,
            &config.region,
            credentials,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn host(&self) -> String {
        format!("{}.s3.{}.amazonaws.com", self.bucket, self.region)
    }

    /// Sign and send a request, failing on non-2xx responses.
    fn send(
        &self,
        method: Method,
        key: &str,
        query: &[(&str, &str)],
        body: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<Response, StorageError> {
        let host = self.host();
        let path = canonical_path(&normalize_key(key));
        let query = canonical_query(query);
        let payload_hash = sha256_hex(&body);

        let parts = RequestParts {
            method: method.as_str(),
            path: &path,
            query: &query,
            host: &host,
            payload_hash: &payload_hash,
        };
        let signed = sigv4::sign(&parts, &self.credentials, &self.region, Utc::now());

        let url = if query.is_empty() {
            format!("https://{host}{path}")
        } else {
            format!("https://{host}{path}?{query}")
        };

        let mut request = self
            .client
            .request(method.clone(), url)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &payload_hash)
            .header(header::AUTHORIZATION, &signed.authorization)
            .body(body);
        if let Some(token) = &self.credentials.session_token {
            request = request.header("x-amz-security-token", token);
        }
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Status {
                method: method.to_string(),
                key: key.to_owned(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl BlobStore for S3Store {
    fn public_url_prefix(&self) -> String {
        hosted_prefix(&self.bucket, &self.region)
    }

    fn upload_file(
        &self,
        local: &Path,
        key: &str,
        content_type: Option<&str>,
    ) -> Result<String, StorageError> {
        let key = normalize_key(key);
        let body = fs::read(local).map_err(|err| StorageError::Io(local.to_path_buf(), err))?;
        self.send(Method::PUT, &key, &[], body, content_type)?;
        log!("storage"; "uploaded {} to {key}", local.display());
        Ok(self.object_url(&key))
    }

    fn download_file(&self, key: &str, local: &Path) -> Result<(), StorageError> {
        let key = normalize_key(key);
        if let Some(parent) = local.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| StorageError::Io(parent.to_path_buf(), err))?;
        }
        let bytes = self.send(Method::GET, &key, &[], Vec::new(), None)?.bytes()?;
        fs::write(local, &bytes).map_err(|err| StorageError::Io(local.to_path_buf(), err))?;
        log!("storage"; "downloaded {key} to {}", local.display());
        Ok(())
    }

    fn list_directory(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = normalize_key(prefix);
        let mut keys = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let mut params = vec![("list-type", "2"), ("prefix", prefix.as_str())];
            if let Some(token) = &token {
                params.push(("continuation-token", token.as_str()));
            }
            let body = self.send(Method::GET, "", &params, Vec::new(), None)?.text()?;
            let page = Listing::parse(&body)?;
            keys.extend(page.keys);

            match page.next_token {
                Some(next) if page.truncated => token = Some(next),
                _ => break,
            }
        }
        Ok(keys)
    }

    fn create_folder(&self, name: &str) -> Result<(), StorageError> {
        let folder = folder_key(name);
        self.send(Method::PUT, &folder, &[], Vec::new(), None)?;
        log!("storage"; "folder {folder} created");
        Ok(())
    }

    fn delete_file(&self, key: &str) -> Result<(), StorageError> {
        let key = normalize_key(key);
        self.send(Method::DELETE, &key, &[], Vec::new(), None)?;
        log!("storage"; "deleted {key}");
        Ok(())
    }

    fn delete_folder(&self, prefix: &str) -> Result<(), StorageError> {
        let folder = folder_key(prefix);
        let keys = self.list_directory(&folder)?;
        if keys.is_empty() {
            log!("storage"; "folder {folder} is empty or does not exist");
            return Ok(());
        }
        for key in &keys {
            self.send(Method::DELETE, key, &[], Vec::new(), None)?;
        }
        log!("storage"; "folder {folder} and its {} objects deleted", keys.len());
        Ok(())
    }
}

// ============================================================================
// ListObjectsV2 Response
// ============================================================================

/// One page of a ListObjectsV2 response.
#[derive(Debug, Default, PartialEq)]
struct Listing {
    keys: Vec<String>,
    truncated: bool,
    next_token: Option<String>,
}

#[derive(Clone, Copy)]
enum Field {
    Key,
    IsTruncated,
    NextContinuationToken,
}

impl Listing {
    fn parse(xml: &str) -> Result<Self, StorageError> {
        let mut reader = Reader::from_str(xml);
        let mut listing = Listing::default();
        let mut field = None;
        let mut text = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    field = match e.local_name().as_ref() {
                        b"Key" => Some(Field::Key),
                        b"IsTruncated" => Some(Field::IsTruncated),
                        b"NextContinuationToken" => Some(Field::NextContinuationToken),
                        _ => None,
                    };
                    text.clear();
                }
                Event::Text(e) if field.is_some() => text.push_str(&String::from_utf8_lossy(&e)),
                Event::GeneralRef(e) if field.is_some() => {
                    text.push_str(resolve_entity(&String::from_utf8_lossy(&e)));
                }
                Event::End(_) => match field.take() {
                    Some(Field::Key) => listing.keys.push(std::mem::take(&mut text)),
                    Some(Field::IsTruncated) => listing.truncated = text.trim() == "true",
                    Some(Field::NextContinuationToken) => {
                        listing.next_token = Some(std::mem::take(&mut text));
                    }
                    None => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(listing)
    }
}

/// Predefined XML entities; S3 only escapes these in keys.
fn resolve_entity(name: &str) -> &'static str {
    match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        _ => "",
    }
}
