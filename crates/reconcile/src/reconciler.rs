//! Create-or-update, read and delete against a remote resource client
//!
//! Every operation validates its input before touching the remote, makes at
//! most one write and one read, and never retries. Remote failures come back
//! unchanged inside [`Error::Remote`].

use crate::client::ResourceClient;
use crate::error::{Error, MISSING_NAME, MISSING_NAME_AND_VALUE, Result};
use crate::projector;
use crate::types::{DesiredConfig, Identifier, LocalState};

/// Reconciles declared category values with the remote system.
///
/// Holds nothing but the injected client, so concurrent use for different
/// resources is independent.
///
/// # Example
///
/// ```
/// use reconcile::{DesiredConfig, MockClient, Reconciler};
///
/// let reconciler = Reconciler::new(Box::new(MockClient::new()));
/// let state = reconciler.upsert(&DesiredConfig::new("env", "prod")).unwrap();
/// assert_eq!(state.id.as_str(), "env");
/// assert_eq!(state.value, "prod");
/// ```
pub struct Reconciler {
    client: Box<dyn ResourceClient>,
}

impl Reconciler {
    /// Create a reconciler that talks through `client`.
    #[must_use]
    pub fn new(client: Box<dyn ResourceClient>) -> Self {
        Self { client }
    }

    /// Create or update the declared resource and return its state as read
    /// back from the server.
    ///
    /// If the write succeeds but the read fails, the read's error is
    /// returned even though the remote resource now exists. Calling again
    /// converges because the write is an upsert.
    pub fn upsert(&self, desired: &DesiredConfig) -> Result<LocalState> {
        let (name, id) = self.write(desired)?;
        self.read(Some(&name), &id)
    }

    /// Write phase of [`upsert`](Self::upsert).
    ///
    /// Returns the declared name and the identifier assigned by the server.
    pub fn write(&self, desired: &DesiredConfig) -> Result<(String, Identifier)> {
        let (Some(name), Some(_)) = (desired.name(), desired.value()) else {
            return Err(Error::Validation(MISSING_NAME_AND_VALUE));
        };

        let request = projector::to_remote_request(desired);
        log::debug!("Writing category value {name}: {request:?}");

        let resource = self.client.create_or_update(name, &request)?;
        let id = Identifier::new(resource.name.unwrap_or_default());
        log::info!("Wrote category value {name} (id {id:?})");

        Ok((name.to_string(), id))
    }

    /// Read the resource identified by `name` and `id`.
    ///
    /// A not-found answer is not treated specially; it is returned like any
    /// other remote failure.
    pub fn read(&self, name: Option<&str>, id: &Identifier) -> Result<LocalState> {
        let name = require_name(name)?;
        log::debug!("Reading category value {name} (id {id:?})");

        let resource = self.client.get_by_name_and_id(name, id.as_str())?;
        Ok(projector::from_remote_response(resource, id.clone()))
    }

    /// Delete the resource identified by `name` and `id`.
    ///
    /// On success `id` is cleared. On failure it is left as is so a retry
    /// targets the same resource.
    pub fn delete(&self, name: Option<&str>, id: &mut Identifier) -> Result<()> {
        let name = require_name(name)?;
        log::debug!("Deleting category value {name} (id {id:?})");

        self.client.delete_by_name_and_id(name, id.as_str())?;
        log::info!("Deleted category value {name} (id {id:?})");

        id.clear();
        Ok(())
    }
}

fn require_name(name: Option<&str>) -> Result<&str> {
    name.filter(|n| !n.is_empty())
        .ok_or(Error::Validation(MISSING_NAME))
}
