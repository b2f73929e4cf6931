/// DDL applied by `PgStore::migrate`, in dependency order.
/// Child rows carry no ON DELETE CASCADE: the store deletes them explicitly
/// inside the parent's delete transaction.
pub const STATEMENTS: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL DEFAULT '',
        password TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS folders (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL DEFAULT '',
        user_id TEXT NOT NULL REFERENCES users (id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS requests (
        id BIGSERIAL PRIMARY KEY,
        folder_id BIGINT NOT NULL REFERENCES folders (id),
        user_id TEXT NOT NULL REFERENCES users (id),
        name TEXT NOT NULL DEFAULT '',
        url TEXT NOT NULL DEFAULT '',
        result TEXT NOT NULL DEFAULT '',
        method TEXT NOT NULL,
        protocol_header TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS parameters (
        id BIGSERIAL PRIMARY KEY,
        kind SMALLINT NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL DEFAULT '',
        request_id BIGINT NOT NULL REFERENCES requests (id)
    )"#,
    "CREATE INDEX IF NOT EXISTS folders_user_id_idx ON folders (user_id)",
    "CREATE INDEX IF NOT EXISTS requests_folder_id_idx ON requests (folder_id)",
    "CREATE INDEX IF NOT EXISTS parameters_request_id_idx ON parameters (request_id)",
];
