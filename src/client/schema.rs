//! `user` table DDL
//!
//! The server owns identity and timestamps: a trigger fills `id` with `uuid()` on
//! insert, `cat` defaults to the insert time and `uat` follows every update.

/// Table definition
pub const CREATE_USER_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS `user` (
    id char(128),
    cat timestamp DEFAULT CURRENT_TIMESTAMP,
    uat timestamp DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
    name text
)
"#;

/// Trigger assigning a UUID to every inserted row (MySQL 8.0.29+ for `IF NOT EXISTS`)
pub const CREATE_UUID_TRIGGER: &str = r#"
CREATE TRIGGER IF NOT EXISTS init_uuid BEFORE INSERT ON `user`
    FOR EACH ROW SET NEW.id = uuid()
"#;

/// Statements applied by [`Database::init_schema`](crate::Database::init_schema), in order
pub const MYSQL_INIT: [&str; 2] = [CREATE_USER_TABLE, CREATE_UUID_TRIGGER];
