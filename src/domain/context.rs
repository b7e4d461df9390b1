//! Request Context
//!
//! Identity and tracing metadata of the current request.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TenantId;

/// Context for a request, built by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Subscription resolved from the bearer token
    pub tenant_id: TenantId,

    /// Correlation ID for request tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

impl RequestContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            correlation_id: None,
        }
    }

    /// Create context with correlation ID
    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = Some(correlation_id);
        self
    }
}
