//! Label keys and values

/// Label key: database operation
pub const OPERATION: &str = "operation";
/// Label key: error category
pub const CATEGORY: &str = "category";
/// Label key: whether TLS is required
pub const TLS: &str = "tls";
/// Label key: registration outcome
pub const OUTCOME: &str = "outcome";

/// Operation: connect and ping
pub const OP_OPEN: &str = "open";
/// Operation: list users
pub const OP_LIST: &str = "list";
/// Operation: insert user
pub const OP_ADD: &str = "add";
/// Operation: rename user
pub const OP_RENAME: &str = "rename";
/// Operation: delete user
pub const OP_DELETE: &str = "delete";
/// Operation: apply schema
pub const OP_INIT_SCHEMA: &str = "init_schema";

/// Outcome: key was new
pub const OUTCOME_INSERTED: &str = "inserted";
/// Outcome: key replaced an earlier profile
pub const OUTCOME_REPLACED: &str = "replaced";

/// Render a bool label value
pub fn bool_value(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
