//! # Identity Middleware
//!
//! Builds the requesting [`Principal`] from headers injected by the
//! platform's authenticating gateway and attaches it to the request.
//! Identity issuance itself is out of scope here; requests without the
//! trusted headers proceed as anonymous and the service denies them.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::authz::{Principal, Role};
use crate::web::state::AppState;

/// Attach the authenticated principal to the request extensions.
pub async fn attach_principal(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();
    let name = headers
        .get(&state.config.principal_header)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let role_claim = headers
        .get(&state.config.role_header)
        .and_then(|v| v.to_str().ok());

    let principal = match name {
        Some(name) => Principal::new(name, Role::from_claim(role_claim)),
        None => Principal::anonymous(),
    };

    debug!(
        principal = %principal.name,
        role = ?principal.role,
        "resolved request principal"
    );
    request.extensions_mut().insert(principal);

    next.run(request).await
}
