//! S3-compatible `ObjectStoreClient`.
//!
//! Grounded on `enterprise::cloud::storage::S3Storage`: a config-driven
//! client issuing real HTTP calls through `reqwest`, with a simplified
//! request signature in place of full AWS SigV4 — a production
//! deployment would swap this for the `aws-sdk-s3` crate rather than
//! hand-roll signing, the same caveat the teacher's own
//! `calculate_signature` leaves as a comment.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::{Client, StatusCode};

use crate::config::ObjectStoreConfig;

use super::{ObjectStoreClient, ObjectStoreError, Result};

/// S3 (or S3-compatible) connection configuration, resolved from
/// `ObjectStoreConfig` plus a region.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket name.
    pub bucket: String,
    /// AWS region, or the equivalent for an S3-compatible service.
    pub region: String,
    /// Access key.
    pub access_key: String,
    /// Secret key.
    pub secret_key: String,
    /// Custom endpoint, for S3-compatible services (e.g. MinIO).
    pub endpoint: Option<String>,
}

impl S3Config {
    /// Build an `S3Config` from the crate's generic object-store config
    /// plus a region.
    pub fn from_object_store_config(config: &ObjectStoreConfig, region: &str) -> Self {
        Self {
            bucket: config.bucket.clone(),
            region: region.to_string(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            endpoint: config.endpoint.clone(),
        }
    }

    fn base_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}", endpoint.trim_end_matches('/'), self.bucket),
            None => format!(
                "https://{}.s3.{}.amazonaws.com",
                self.bucket, self.region
            ),
        }
    }
}

/// S3-compatible object store client.
pub struct S3ObjectStore {
    config: S3Config,
    http: Client,
}

impl S3ObjectStore {
    /// Create a new client from config.
    pub fn new(config: S3Config) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.config.base_url(), key)
    }

    /// Simplified request signature (not AWS SigV4). In production this
    /// would be replaced by the `aws-sdk-s3` crate's request signer.
    fn signature(&self, key: &str, bytes: &[u8]) -> String {
        let mut hasher = DefaultHasher::new();
        self.config.access_key.hash(&mut hasher);
        self.config.secret_key.hash(&mut hasher);
        key.hash(&mut hasher);
        bytes.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}

#[async_trait]
impl ObjectStoreClient for S3ObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        let signature = self.signature(key, &bytes);
        let response = self
            .http
            .put(self.object_url(key))
            .header("x-amz-content-signature", signature)
            .body(bytes)
            .send()
            .await
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ObjectStoreError::Io(format!(
                "PUT {} failed: {}",
                key,
                response.status()
            )));
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(self.object_url(key))
            .send()
            .await
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ObjectStoreError::NotFound(key.to_string())),
            status if status.is_success() => response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .map_err(|e| ObjectStoreError::Io(e.to_string())),
            status => Err(ObjectStoreError::Io(format!(
                "GET {} failed: {}",
                key, status
            ))),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let response = self
            .http
            .delete(self.object_url(key))
            .send()
            .await
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;

        // Deleting a missing key is success per spec; S3 itself returns
        // 204 regardless of prior existence.
        if response.status().is_success() || response.status() == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            Err(ObjectStoreError::Io(format!(
                "DELETE {} failed: {}",
                key,
                response.status()
            )))
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let response = self
            .http
            .get(format!("{}?prefix={}", self.config.base_url(), prefix))
            .send()
            .await
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ObjectStoreError::Io(format!(
                "LIST {} failed: {}",
                prefix,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ObjectStoreError::Io(e.to_string()))?;
        parse_list_objects_v2(&body)
    }
}

/// Extract `<Key>` entries from a ListObjectsV2 response body.
///
/// Reads only the `Key` and `IsTruncated` elements — enough for this
/// crate's prefix-delete use (`ListStore::delete_name`) — rather than the
/// full response schema. A truncated listing (more than one page of
/// results) is logged rather than silently dropped; paginating on
/// `NextContinuationToken` is left for a follow-up (see open question #2
/// in DESIGN.md).
fn parse_list_objects_v2(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut keys = Vec::new();
    let mut truncated = false;
    let mut in_key = false;
    let mut in_truncated = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(tag)) => match tag.name().as_ref() {
                b"Key" => in_key = true,
                b"IsTruncated" => in_truncated = true,
                _ => {}
            },
            Ok(Event::End(tag)) => match tag.name().as_ref() {
                b"Key" => in_key = false,
                b"IsTruncated" => in_truncated = false,
                _ => {}
            },
            Ok(Event::Text(text)) => {
                let decoded = text
                    .unescape()
                    .map_err(|e| ObjectStoreError::Io(format!("malformed ListObjectsV2 body: {e}")))?;
                if in_key {
                    keys.push(decoded.into_owned());
                } else if in_truncated {
                    truncated = decoded.as_ref() == "true";
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ObjectStoreError::Io(format!(
                    "malformed ListObjectsV2 body: {e}"
                )))
            }
        }
        buf.clear();
    }

    if truncated {
        log::warn!("ListObjectsV2 response was truncated; pagination is not implemented");
    }
    Ok(keys)
}
