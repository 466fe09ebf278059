//! Translation between declared configuration and the remote wire shape
//!
//! Both directions are pure. Required-field policy lives in the
//! [`Reconciler`](crate::Reconciler), not here.

use crate::types::{DesiredConfig, Identifier, LocalState, RemoteRequest, RemoteResource};

/// Build a create-or-update body from a declaration.
///
/// Fields absent from `desired` are omitted so the server applies its own
/// defaults. Presence, not emptiness, decides inclusion.
pub fn to_remote_request(desired: &DesiredConfig) -> RemoteRequest {
    RemoteRequest {
        value: desired.value.clone(),
        description: desired.description.clone(),
        api_version: desired.api_version.clone(),
    }
}

/// Project a server record into local state.
///
/// Never fails: absent optional fields become `""` or `false`.
pub fn from_remote_response(resource: RemoteResource, id: Identifier) -> LocalState {
    LocalState {
        id,
        name: resource.name.unwrap_or_default(),
        value: resource.value.unwrap_or_default(),
        description: resource.description.unwrap_or_default(),
        api_version: resource.api_version.unwrap_or_default(),
        system_defined: resource.system_defined.unwrap_or_default(),
    }
}
