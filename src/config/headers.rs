//! HTTP header name constants.
//!
//! Headers sent on every platform request. Names are lowercase so they can be
//! passed to `HeaderName::from_static`.

/// App id header expected by the private web API
pub const HEADER_IG_APP_ID: &str = "x-ig-app-id";
/// Requested-with header sent by the web client
pub const HEADER_REQUESTED_WITH: &str = "x-requested-with";
/// Value of `x-requested-with`
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";
/// Form content type used by the GraphQL POST
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
/// Accept value for JSON endpoints
pub const ACCEPT_JSON: &str = "*/*";
/// Accept-Language value
pub const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";
