//! Remote resource clients.
//!
//! This module provides the [`ResourceClient`] trait the reconciler talks
//! to, the HTTP implementation in [`http::HttpClient`], and [`MockClient`]
//! for testing without network access.
//!
//! # Testing
//!
//! ```
//! use reconcile::client::{MockClient, ResourceClient};
//! use reconcile::RemoteRequest;
//!
//! let mock = MockClient::new();
//! let request = RemoteRequest {
//!     value: Some("prod".to_string()),
//!     ..RemoteRequest::default()
//! };
//! let created = mock.create_or_update("env", &request).unwrap();
//! assert_eq!(created.name.as_deref(), Some("env"));
//! assert_eq!(mock.calls().create_or_update, 1);
//! ```

pub mod http;

use crate::error::{RemoteError, RemoteResult};
use crate::types::{RemoteRequest, RemoteResource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Remote capability the reconciler writes and reads through.
///
/// Implementations own transport, authentication, retries and timeouts.
/// `create_or_update` must have upsert semantics: repeating it with the same
/// name and request converges on one remote resource.
pub trait ResourceClient: Send + Sync {
    /// Create the resource under `name`, or update it if it exists.
    fn create_or_update(&self, name: &str, request: &RemoteRequest) -> RemoteResult<RemoteResource>;

    /// Fetch the resource identified by `name` and `id`.
    fn get_by_name_and_id(&self, name: &str, id: &str) -> RemoteResult<RemoteResource>;

    /// Delete the resource identified by `name` and `id`.
    fn delete_by_name_and_id(&self, name: &str, id: &str) -> RemoteResult<()>;
}

/// Number of calls a [`MockClient`] has served, per operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub create_or_update: usize,
    pub get: usize,
    pub delete: usize,
}

impl CallCounts {
    pub fn total(&self) -> usize {
        self.create_or_update + self.get + self.delete
    }
}

#[derive(Debug, Default)]
struct MockInner {
    resources: HashMap<String, RemoteResource>,
    calls: CallCounts,
    fail_next: Option<RemoteError>,
    fail_next_get: Option<RemoteError>,
    default_api_version: Option<String>,
}

/// In-memory client for testing without network access.
///
/// Clones share the same store, so a test can hand one clone to a
/// [`Reconciler`](crate::Reconciler) and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    inner: Arc<Mutex<MockInner>>,
}

impl MockClient {
    /// Create a new empty mock client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fills in `api_version` when a write omits it.
    #[must_use]
    pub fn with_default_api_version(api_version: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().default_api_version = Some(api_version.into());
        mock
    }

    /// Seed a server-side record, bypassing call counting.
    pub fn insert(&self, resource: RemoteResource) {
        let name = resource.name.clone().unwrap_or_default();
        self.inner.lock().unwrap().resources.insert(name, resource);
    }

    /// Make the next call fail with `error`.
    pub fn fail_next(&self, error: RemoteError) {
        self.inner.lock().unwrap().fail_next = Some(error);
    }

    /// Make the next read fail with `error`, leaving writes untouched.
    pub fn fail_next_get(&self, error: RemoteError) {
        self.inner.lock().unwrap().fail_next_get = Some(error);
    }

    /// Snapshot of the call counters.
    pub fn calls(&self) -> CallCounts {
        self.inner.lock().unwrap().calls
    }

    /// Current server-side record for `name`.
    pub fn get(&self, name: &str) -> Option<RemoteResource> {
        self.inner.lock().unwrap().resources.get(name).cloned()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MockInner {
    fn take_failure(&mut self) -> RemoteResult<()> {
        match self.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn lookup(&self, name: &str, id: &str) -> RemoteResult<&RemoteResource> {
        self.resources
            .get(name)
            .filter(|r| r.name.as_deref() == Some(id))
            .ok_or_else(|| RemoteError::not_found(name, id))
    }
}

impl ResourceClient for MockClient {
    fn create_or_update(&self, name: &str, request: &RemoteRequest) -> RemoteResult<RemoteResource> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.create_or_update += 1;
        inner.take_failure()?;

        let default_api_version = inner.default_api_version.clone();
        let resource = inner
            .resources
            .entry(name.to_string())
            .or_insert_with(|| RemoteResource {
                name: Some(name.to_string()),
                system_defined: Some(false),
                ..RemoteResource::default()
            });

        if request.value.is_some() {
            resource.value.clone_from(&request.value);
        }
        if request.description.is_some() {
            resource.description.clone_from(&request.description);
        }
        if request.api_version.is_some() {
            resource.api_version.clone_from(&request.api_version);
        } else if resource.api_version.is_none() {
            resource.api_version = default_api_version;
        }

        Ok(resource.clone())
    }

    fn get_by_name_and_id(&self, name: &str, id: &str) -> RemoteResult<RemoteResource> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.get += 1;
        inner.take_failure()?;
        if let Some(err) = inner.fail_next_get.take() {
            return Err(err);
        }
        inner.lookup(name, id).cloned()
    }

    fn delete_by_name_and_id(&self, name: &str, id: &str) -> RemoteResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.delete += 1;
        inner.take_failure()?;
        inner.lookup(name, id)?;
        inner.resources.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: &str) -> RemoteRequest {
        RemoteRequest {
            value: Some(value.to_string()),
            ..RemoteRequest::default()
        }
    }

    #[test]
    fn test_mock_client_new() {
        let mock = MockClient::new();
        assert!(mock.is_empty());
        assert_eq!(mock.calls().total(), 0);
    }

    #[test]
    fn test_mock_client_upsert_does_not_duplicate() {
        let mock = MockClient::new();
        mock.create_or_update("env", &request("prod")).unwrap();
        mock.create_or_update("env", &request("prod")).unwrap();
        mock.create_or_update("env", &request("staging")).unwrap();

        assert_eq!(mock.len(), 1);
        assert_eq!(mock.get("env").unwrap().value.as_deref(), Some("staging"));
        assert_eq!(mock.calls().create_or_update, 3);
    }

    #[test]
    fn test_mock_client_keeps_fields_omitted_from_update() {
        let mock = MockClient::new();
        let mut first = request("prod");
        first.description = Some("production".to_string());
        mock.create_or_update("env", &first).unwrap();

        let updated = mock.create_or_update("env", &request("prod")).unwrap();
        assert_eq!(updated.description.as_deref(), Some("production"));
    }

    #[test]
    fn test_mock_client_default_api_version() {
        let mock = MockClient::with_default_api_version("3.1");
        let created = mock.create_or_update("env", &request("prod")).unwrap();
        assert_eq!(created.api_version.as_deref(), Some("3.1"));
    }

    #[test]
    fn test_mock_client_get_requires_matching_id() {
        let mock = MockClient::new();
        mock.create_or_update("env", &request("prod")).unwrap();

        assert!(mock.get_by_name_and_id("env", "env").is_ok());
        let err = mock.get_by_name_and_id("env", "").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(mock.calls().get, 2);
    }

    #[test]
    fn test_mock_client_delete() {
        let mock = MockClient::new();
        mock.create_or_update("env", &request("prod")).unwrap();

        mock.delete_by_name_and_id("env", "env").unwrap();
        assert!(mock.is_empty());

        let err = mock.delete_by_name_and_id("env", "env").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_mock_client_fail_next_is_one_shot() {
        let mock = MockClient::new();
        mock.fail_next(RemoteError::Transport("connection reset".to_string()));

        let err = mock.create_or_update("env", &request("prod")).unwrap_err();
        assert_eq!(err, RemoteError::Transport("connection reset".to_string()));
        assert!(mock.is_empty());

        assert!(mock.create_or_update("env", &request("prod")).is_ok());
    }

    #[test]
    fn test_mock_client_fail_next_get_spares_writes() {
        let mock = MockClient::new();
        mock.fail_next_get(RemoteError::Transport("timed out".to_string()));

        assert!(mock.create_or_update("env", &request("prod")).is_ok());
        assert!(mock.get_by_name_and_id("env", "env").is_err());
        assert!(mock.get_by_name_and_id("env", "env").is_ok());
    }

    #[test]
    fn test_mock_client_clones_share_store() {
        let mock = MockClient::new();
        let other = mock.clone();
        other.create_or_update("env", &request("prod")).unwrap();

        assert_eq!(mock.len(), 1);
        assert_eq!(mock.calls().create_or_update, 1);
    }

    #[test]
    fn test_mock_client_insert_seeds_record() {
        let mock = MockClient::new();
        mock.insert(RemoteResource {
            name: Some("os".to_string()),
            value: Some("linux".to_string()),
            system_defined: Some(true),
            ..RemoteResource::default()
        });

        let found = mock.get_by_name_and_id("os", "os").unwrap();
        assert_eq!(found.system_defined, Some(true));
        assert_eq!(mock.calls().create_or_update, 0);
    }
}
