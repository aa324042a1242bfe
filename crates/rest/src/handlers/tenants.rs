//! Tenant management handlers.
//!
//! These routes sit on the tenant-resolution skip list; they act on the
//! catalog and run the lifecycle workflows directly.
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | POST | `/tenants` | 201 tenant summary |
//! | GET | `/tenants/{id}` | 200 tenant summary |
//! | DELETE | `/tenants/{id}` | 204 |

use atrium_persistence::core::{Backend, TenantCatalog};
use atrium_persistence::tenant::{Tenant, TenantStatus};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::extractors::{JsonBody, RecordId};
use crate::state::AppState;

/// Body of `POST /tenants`.
#[derive(Debug, Deserialize)]
pub struct CreateTenantBody {
    /// The tenant's domain URL; its subdomain becomes the schema name.
    #[serde(rename = "domainURL")]
    pub domain_url: String,
}

/// A tenant as returned by the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSummary {
    /// Catalog id.
    pub id: i64,
    /// Domain URL as supplied at provisioning.
    #[serde(rename = "domainURL")]
    pub domain_url: String,
    /// Derived schema name.
    pub schema_name: String,
    /// Lifecycle status.
    pub status: TenantStatus,
    /// When the tenant was registered.
    pub created_at: DateTime<Utc>,
    /// When the tenant record last changed.
    pub updated_at: DateTime<Utc>,
}

impl From<Tenant> for TenantSummary {
    fn from(tenant: Tenant) -> Self {
        Self {
            id: tenant.id,
            domain_url: tenant.domain_url,
            schema_name: tenant.schema_name.to_string(),
            status: tenant.status,
            created_at: tenant.created_at,
            updated_at: tenant.updated_at,
        }
    }
}

/// Provisions a tenant.
///
/// # Response
///
/// - `201 Created` - Tenant registered and its schema migrated
/// - `400 Bad Request` - Malformed body or no usable subdomain
/// - `409 Conflict` - Domain URL or schema name already registered
/// - `500 Internal Server Error` - Migration or storage failure
pub async fn create_tenant_handler<B: Backend>(
    State(state): State<AppState<B>>,
    JsonBody(body): JsonBody<CreateTenantBody>,
) -> RestResult<Response> {
    debug!(domain_url = %body.domain_url, "Processing tenant create request");

    let tenant = state.lifecycle().provision(&body.domain_url).await?;
    info!(id = tenant.id, schema = %tenant.schema_name, "Tenant created");

    Ok((StatusCode::CREATED, Json(TenantSummary::from(tenant))).into_response())
}

/// Reads a tenant by id.
pub async fn get_tenant_handler<B: Backend>(
    State(state): State<AppState<B>>,
    RecordId(id): RecordId,
) -> RestResult<Json<TenantSummary>> {
    debug!(id, "Processing tenant read request");

    let tenant = state
        .backend()
        .get_tenant(id)
        .await?
        .ok_or_else(|| RestError::not_found("tenant", id))?;

    Ok(Json(tenant.into()))
}

/// Decommissions a tenant: drops its schema, then its catalog record.
///
/// # Response
///
/// - `204 No Content` - Tenant removed
/// - `404 Not Found` - No such tenant; nothing changed
/// - `500 Internal Server Error` - Teardown failed; the tenant keeps its previous status
pub async fn delete_tenant_handler<B: Backend>(
    State(state): State<AppState<B>>,
    RecordId(id): RecordId,
) -> RestResult<StatusCode> {
    debug!(id, "Processing tenant delete request");

    state.lifecycle().decommission(id).await?;
    info!(id, "Tenant deleted");

    Ok(StatusCode::NO_CONTENT)
}
