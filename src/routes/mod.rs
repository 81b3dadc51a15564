/// Router Module Index
///
/// Routes are split by access level. Both routers use the same resource
/// paths (`GET /blogs` is public, `POST /blogs` is admin-only); axum merges
/// them per method, and the admin guard is applied as a `route_layer` so it
/// only wraps the admin methods.

/// Read-only content, the public submission forms and `/admin/login`.
pub mod public;

/// Everything that needs a valid admin session.
pub mod admin;

/// Largest accepted multipart body (poster and image uploads).
pub const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;
