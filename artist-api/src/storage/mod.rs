pub mod migrations;
mod settings;

pub use settings::SqliteSettingsStore;

use crate::error::{AppError, AppResult};
use crate::DbConnection;
use rusqlite::{params, Connection, OptionalExtension, Row};
use shared_types::{Project, ProjectRole, User};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// A user row including the password hash, never sent over the wire
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: Option<&'a str>,
    pub section: Option<&'a str>,
    pub unit: Option<&'a str>,
}

pub struct Database {
    connection: DbConnection,
}

impl Database {
    pub fn new(db_path: &Path) -> AppResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        Self::from_connection(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> AppResult<Self> {
        // SQLite ships with foreign keys disabled
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations::run_migrations(&mut conn)?;

        Ok(Database {
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn connection(&self) -> DbConnection {
        Arc::clone(&self.connection)
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|e| AppError::Internal(format!("Failed to acquire database lock: {e}")))
    }

    // Users

    /// Insert a user. A username or email already taken, including by a
    /// concurrent registration, is an `InvalidRequest`.
    pub fn create_user(&self, new_user: &NewUser<'_>) -> AppResult<User> {
        let id = {
            let conn = self.lock()?;
            let inserted = conn.execute(
                "INSERT INTO users (username, email, password_hash, full_name, section, unit, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    new_user.username,
                    new_user.email,
                    new_user.password_hash,
                    new_user.full_name,
                    new_user.section,
                    new_user.unit,
                    chrono::Utc::now().timestamp(),
                ],
            );

            match inserted {
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    return Err(AppError::InvalidRequest(
                        "Username or email already registered".to_string(),
                    ));
                }
                other => other?,
            };
            conn.last_insert_rowid()
        };

        tracing::info!(user_id = id, username = %new_user.username, "Created user");
        self.get_user_by_id(id)
    }

    pub fn username_or_email_taken(&self, username: &str, email: &str) -> AppResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE username = ?1 OR email = ?2",
            params![username, email],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn get_user_by_id(&self, id: i64) -> AppResult<User> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("User {id}")))
    }

    pub fn get_account_by_username(&self, username: &str) -> AppResult<Option<UserAccount>> {
        let conn = self.lock()?;
        let account = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE username = ?1"),
                params![username],
                |row| {
                    Ok(UserAccount {
                        user: user_from_row(row)?,
                        password_hash: row.get(9)?,
                    })
                },
            )
            .optional()?;
        Ok(account)
    }

    pub fn set_user_active(&self, id: i64, is_active: bool) -> AppResult<()> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE users SET is_active = ?1, updated_at = ?2 WHERE id = ?3",
            params![is_active, chrono::Utc::now().timestamp(), id],
        )?;
        if changed == 0 {
            return Err(AppError::NotFound(format!("User {id}")));
        }
        Ok(())
    }

    // Projects

    /// Create a project with its creator as owner
    pub fn create_project(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: i64,
    ) -> AppResult<Project> {
        let id = {
            let mut conn = self.lock()?;
            let tx = conn.transaction()?;
            let now = chrono::Utc::now().timestamp();

            tx.execute(
                "INSERT INTO projects (name, description, created_by, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, description, created_by, now],
            )?;
            let id = tx.last_insert_rowid();

            tx.execute(
                "INSERT INTO project_members (user_id, project_id, role, joined_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![created_by, id, ProjectRole::Owner.as_str(), now],
            )?;
            tx.commit()?;
            id
        };

        tracing::info!(project_id = id, created_by, "Created project");
        self.get_project_by_id(id)
    }

    pub fn get_project_by_id(&self, id: i64) -> AppResult<Project> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects p WHERE p.id = ?1"),
            params![id],
            project_from_row,
        )
        .optional()?
        .ok_or(AppError::ProjectNotFound(id))
    }

    /// Active projects the user is a member of
    pub fn list_projects_for_user(&self, user_id: i64) -> AppResult<Vec<Project>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p
             JOIN project_members m ON m.project_id = p.id
             WHERE m.user_id = ?1 AND p.is_active = 1
             ORDER BY p.id"
        ))?;
        let projects = stmt
            .query_map(params![user_id], project_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    pub fn update_project(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
        is_active: Option<bool>,
    ) -> AppResult<Project> {
        {
            let conn = self.lock()?;
            conn.execute(
                "UPDATE projects SET
                    name = COALESCE(?1, name),
                    description = COALESCE(?2, description),
                    is_active = COALESCE(?3, is_active),
                    updated_at = ?4
                 WHERE id = ?5",
                params![name, description, is_active, chrono::Utc::now().timestamp(), id],
            )?;
        }
        self.get_project_by_id(id)
    }

    pub fn deactivate_project(&self, id: i64) -> AppResult<()> {
        self.update_project(id, None, None, Some(false))?;
        tracing::info!(project_id = id, "Deactivated project");
        Ok(())
    }

    pub fn add_project_member(
        &self,
        project_id: i64,
        user_id: i64,
        role: ProjectRole,
    ) -> AppResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO project_members (user_id, project_id, role, joined_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, project_id) DO UPDATE SET role = excluded.role",
            params![user_id, project_id, role.as_str(), chrono::Utc::now().timestamp()],
        )?;
        Ok(())
    }

    /// Role of the user in the project, if they are a member
    pub fn get_member_role(
        &self,
        project_id: i64,
        user_id: i64,
    ) -> AppResult<Option<ProjectRole>> {
        let conn = self.lock()?;
        let role: Option<String> = conn
            .query_row(
                "SELECT role FROM project_members WHERE project_id = ?1 AND user_id = ?2",
                params![project_id, user_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(role.as_deref().and_then(ProjectRole::parse))
    }
}

const USER_COLUMNS: &str =
    "id, username, email, full_name, section, unit, is_active, created_at, updated_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        full_name: row.get(3)?,
        section: row.get(4)?,
        unit: row.get(5)?,
        is_active: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

const PROJECT_COLUMNS: &str =
    "p.id, p.name, p.description, p.created_by, p.is_active, p.created_at, p.updated_at";

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        created_by: row.get(3)?,
        is_active: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}
