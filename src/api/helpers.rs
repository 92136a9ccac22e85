use poem::Request;
use poem_openapi::auth::{Bearer, BearerAuthorization};
use poem_openapi::error::{ParseParamError, ParseRequestPayloadError};
use serde_json::{Map, Value};

use crate::coordinators::{require_role, AuthCoordinator};
use crate::errors::ApiError;
use crate::types::internal::auth::Role;
use crate::types::internal::context::{ClientInfo, RequestContext};
use crate::types::list_query::ListQuery;

/// Context for routes that need no token
pub fn anonymous_context(req: &Request) -> RequestContext {
    RequestContext::anonymous(ClientInfo::from_request(req))
}

/// Resolve the bearer token into an authenticated request context
///
/// A header that is absent or not of the `Bearer` scheme counts as not logged in.
pub async fn authenticate(auth: &AuthCoordinator, req: &Request) -> Result<RequestContext, ApiError> {
    let bearer = Bearer::from_request(req).ok().map(|b| b.token);
    auth.authenticate(ClientInfo::from_request(req), bearer.as_deref())
        .await
        .map_err(ApiError::from_internal_error)
}

/// Authenticate, then require one of `allowed` as the caller's live role
pub async fn authorize(
    auth: &AuthCoordinator,
    req: &Request,
    allowed: &[Role],
) -> Result<RequestContext, ApiError> {
    let ctx = authenticate(auth, req).await?;
    require_role(&ctx, allowed).map_err(ApiError::from_internal_error)?;
    Ok(ctx)
}

/// Request bodies for case-filing writes must be JSON objects
pub fn into_object(body: Value) -> Result<Map<String, Value>, ApiError> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::validation("Request body must be a JSON object.")),
    }
}

/// Validate the shared list parameters
pub fn list_query(
    start_date: Option<&str>,
    end_date: Option<&str>,
    search: Option<&str>,
    page: Option<i64>,
    limit: Option<i64>,
    default_limit: usize,
) -> Result<ListQuery, ApiError> {
    ListQuery::from_params(start_date, end_date, search, page, limit, default_limit)
        .map_err(|e| ApiError::from_internal_error(e.into()))
}

/// Query or path parameter that could not be parsed into its declared type
pub async fn param_error(err: ParseParamError) -> ApiError {
    tracing::debug!("Rejected parameter: {}", err);
    ApiError::validation(err.to_string())
}

/// Request body that is not valid JSON for the endpoint
pub async fn payload_error(err: ParseRequestPayloadError) -> ApiError {
    tracing::debug!("Rejected request body: {}", err);
    ApiError::validation(err.to_string())
}
