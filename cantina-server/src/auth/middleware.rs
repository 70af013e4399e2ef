//! Route guards

use axum::body::Body;
use axum::middleware::Next;
use axum::response::IntoResponse;
use shared::AppError;

use super::CurrentUser;

/// Reject callers without the operator role
///
/// Applied at router level on menu composition, day operations, kitchen and
/// invoice routes.
pub async fn require_operator(
    request: http::Request<Body>,
    next: Next,
) -> http::Response<Body> {
    let user = match CurrentUser::from_headers(request.headers()) {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    if !user.is_operator() {
        tracing::warn!(
            employee = %user.employee_id,
            uri = %request.uri(),
            "Operator route denied"
        );
        return AppError::permission_denied("Operator role required").into_response();
    }

    let mut request = request;
    request.extensions_mut().insert(user);
    next.run(request).await
}
