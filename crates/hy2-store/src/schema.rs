//! Schema bootstrap statements.
//!
//! Executed one statement at a time; every statement is idempotent so the
//! bootstrap can run on every startup.

pub(crate) const INIT_STATEMENTS: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS account (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    username        TEXT    NOT NULL UNIQUE DEFAULT '',
    pass            TEXT    NOT NULL        DEFAULT '',
    con_pass        TEXT    NOT NULL        DEFAULT '',
    quota           INTEGER NOT NULL        DEFAULT 0,
    download        INTEGER NOT NULL        DEFAULT 0,
    upload          INTEGER NOT NULL        DEFAULT 0,
    expire_time     INTEGER NOT NULL        DEFAULT 0,
    kick_until_time INTEGER NOT NULL        DEFAULT 0,
    device_no       INTEGER NOT NULL        DEFAULT 3,
    role            TEXT    NOT NULL        DEFAULT 'user',
    deleted         INTEGER NOT NULL        DEFAULT 0,
    login_at        INTEGER NOT NULL        DEFAULT 0,
    con_at          INTEGER NOT NULL        DEFAULT 0,
    create_time     INTEGER NOT NULL        DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000),
    update_time     INTEGER NOT NULL        DEFAULT (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
)
"#,
    "CREATE INDEX IF NOT EXISTS account_deleted_index ON account (deleted)",
    "CREATE INDEX IF NOT EXISTS account_username_index ON account (username)",
    "CREATE INDEX IF NOT EXISTS account_con_pass_index ON account (con_pass)",
    // Bootstrap administrator; expires at the year 9999.
    r#"
INSERT INTO account (id, username, pass, con_pass, quota, expire_time, device_no, role)
SELECT 1, 'sysadmin', 'sysadmin', 'sysadmin.sysadmin', -1, 253370736000000, 6, 'admin'
WHERE NOT EXISTS (SELECT 1 FROM account WHERE id = 1)
"#,
    r#"
CREATE TABLE IF NOT EXISTS config (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    key         TEXT NOT NULL UNIQUE DEFAULT '',
    value       TEXT NOT NULL        DEFAULT '',
    remark      TEXT NOT NULL        DEFAULT ''
)
"#,
    "CREATE INDEX IF NOT EXISTS config_key_index ON config (key)",
    r#"
INSERT INTO config (key, value, remark)
SELECT 'JWT_SECRET', hex(randomblob(10)), 'Shared secret for the engine management API'
WHERE NOT EXISTS (SELECT 1 FROM config WHERE key = 'JWT_SECRET')
"#,
    r#"
INSERT INTO config (key, value, remark)
SELECT 'HYSTERIA2_CONFIG', '', 'Engine config document'
WHERE NOT EXISTS (SELECT 1 FROM config WHERE key = 'HYSTERIA2_CONFIG')
"#,
    r#"
INSERT INTO config (key, value, remark)
SELECT 'HYSTERIA2_CONFIG_PORT_HOPPING', '', 'Port hopping range'
WHERE NOT EXISTS (SELECT 1 FROM config WHERE key = 'HYSTERIA2_CONFIG_PORT_HOPPING')
"#,
    r#"
INSERT INTO config (key, value, remark)
SELECT 'HYSTERIA2_CONFIG_REMARK', '', 'Display remark for rendered URLs'
WHERE NOT EXISTS (SELECT 1 FROM config WHERE key = 'HYSTERIA2_CONFIG_REMARK')
"#,
];
