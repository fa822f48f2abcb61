use serde::{Deserialize, Serialize};

/// The authenticated user a report is generated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
}

/// What the session guard learned about the caller. Handlers pass these
/// values down explicitly; nothing below the HTTP layer reads request state.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub identity: Option<Identity>,
    pub address: String,
}
