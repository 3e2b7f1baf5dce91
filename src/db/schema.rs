//! Database schema and migrations.
//!
//! Migrations are applied in order; `schema_version` records which ones ran.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: members and refresh tokens
    r#"
CREATE TABLE members (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    email       TEXT NOT NULL UNIQUE COLLATE NOCASE,
    password    TEXT NOT NULL,
    name        TEXT NOT NULL,
    phone       TEXT,
    address     TEXT,
    join_date   TEXT NOT NULL DEFAULT (date('now')),
    member_type TEXT NOT NULL DEFAULT 'REGULAR',
    status      TEXT NOT NULL DEFAULT 'ACTIVE',
    role        TEXT NOT NULL DEFAULT 'USER',
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_members_status ON members(status);

CREATE TABLE refresh_tokens (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    member_id   INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
    token       TEXT NOT NULL UNIQUE,
    expires_at  TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    revoked_at  TEXT
);

CREATE INDEX idx_refresh_tokens_member ON refresh_tokens(member_id);
"#,
    // v2: boards and attachments
    r#"
CREATE TABLE boards (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    category    TEXT NOT NULL DEFAULT 'FREE',
    status      TEXT NOT NULL DEFAULT 'ACTIVE',
    view_count  INTEGER NOT NULL DEFAULT 0 CHECK (view_count >= 0),
    like_count  INTEGER NOT NULL DEFAULT 0 CHECK (like_count >= 0),
    author_id   INTEGER NOT NULL REFERENCES members(id),
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_boards_status_created ON boards(status, created_at DESC);
CREATE INDEX idx_boards_author ON boards(author_id);

CREATE TABLE board_files (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id          INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    original_filename TEXT NOT NULL,
    stored_filename   TEXT NOT NULL UNIQUE,
    file_path         TEXT NOT NULL,
    file_size         INTEGER NOT NULL CHECK (file_size >= 0),
    file_extension    TEXT NOT NULL,
    mime_type         TEXT NOT NULL,
    download_count    INTEGER NOT NULL DEFAULT 0 CHECK (download_count >= 0),
    created_at        TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_board_files_board ON board_files(board_id);
"#,
    // v3: comments
    r#"
CREATE TABLE comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id    INTEGER NOT NULL REFERENCES boards(id),
    author_id   INTEGER NOT NULL REFERENCES members(id),
    content     TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'ACTIVE',
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_comments_board_status ON comments(board_id, status);
"#,
];
