//! Request-scoped context threaded through every service call.
//!
//! The identity layer authenticates the transport request and builds a
//! [`RequestContext`] carrying the acting user. Services never read ambient
//! or thread-local state; everything they need to attribute log lines and
//! authorize the call travels in this value.

use crate::identity::domain::UserId;
use std::fmt;
use uuid::Uuid;

/// Identifier correlating all log output of a single inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new random request identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a request identifier from an existing UUID, typically one
    /// forwarded by an upstream proxy.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Authenticated caller and tracking identifier for one unit of work.
///
/// # Example
///
/// ```
/// use helpdesk::context::{RequestContext, RequestId};
/// use helpdesk::identity::domain::UserId;
/// use uuid::Uuid;
///
/// let user = UserId::new();
/// let ctx = RequestContext::new(user).with_request_id(RequestId::from_uuid(Uuid::nil()));
///
/// assert_eq!(ctx.user_id(), user);
/// assert_eq!(ctx.request_id().into_inner(), Uuid::nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    request_id: RequestId,
    user_id: UserId,
}

impl RequestContext {
    /// Creates a context for the given acting user with a fresh request id.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            request_id: RequestId::new(),
            user_id,
        }
    }

    /// Replaces the request identifier.
    #[must_use]
    pub const fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}
