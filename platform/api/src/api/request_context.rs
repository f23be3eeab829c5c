/// Per-request data filled in by the request context middleware.
#[derive(Debug, Default, Clone)]
pub struct RequestContext {
	/// Caller identity taken from the `X-User-Id` header. The header is set by
	/// the authenticating gateway in front of this service.
	pub user_id: Option<String>,
}
