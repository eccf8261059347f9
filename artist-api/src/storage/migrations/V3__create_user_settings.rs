/// Per-(user, project, plugin) setting values; at most one row per key
pub fn migration() -> String {
    r#"
CREATE TABLE user_settings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL,
    project_id INTEGER NOT NULL,
    category TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT,
    description TEXT,
    created_at INTEGER NOT NULL,
    updated_at INTEGER,
    UNIQUE (user_id, project_id, category, key),
    FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE,
    FOREIGN KEY (project_id) REFERENCES projects (id) ON DELETE CASCADE
);

CREATE INDEX idx_user_settings_scope
    ON user_settings(user_id, project_id, category);
"#
    .to_string()
}
