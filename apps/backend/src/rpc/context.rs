/// Per-call context handed to every procedure handler.
///
/// The actor identity is threaded explicitly through every call instead of
/// being read from ambient state, which keeps authorization scoping auditable
/// signature by signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ctx {
    /// Database id of the acting user.
    pub user_id: i64,
}

impl Ctx {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }
}
