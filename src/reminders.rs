//! Case reminders: a deadline the user wants to be reminded of, stored in
//! SQLite for a later delivery job to pick up.

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{self, DatabaseError};

pub const STATUS_SCHEDULED: &str = "Scheduled";

/// Reminder as submitted by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCaseReminder {
    #[serde(default)]
    pub case_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub sender_email: String,
}

/// Stored reminder row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReminder {
    pub id: String,
    pub title: String,
    pub description: String,
    pub internal_due_date: String,
    pub user_email: String,
    pub sender_email: String,
    pub created_at: String,
    pub status: String,
    pub reminder_sent: bool,
}

// ═══════════════════════════════════════════
// Repository functions
// ═══════════════════════════════════════════

/// Inserts a reminder with status `Scheduled`, not yet sent.
pub fn save_case_reminder(
    conn: &Connection,
    reminder: &NewCaseReminder,
) -> Result<Uuid, DatabaseError> {
    for (field, value) in [
        ("case_title", &reminder.case_title),
        ("due_date", &reminder.due_date),
        ("user_email", &reminder.user_email),
    ] {
        if value.trim().is_empty() {
            return Err(DatabaseError::ConstraintViolation(format!(
                "{field} is required"
            )));
        }
    }

    let id = Uuid::new_v4();
    let created_at = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO case_reminders (id, title, description, internal_due_date,
         user_email, sender_email, created_at, status, reminder_sent)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0)",
        params![
            id.to_string(),
            reminder.case_title.trim(),
            reminder.description,
            reminder.due_date.trim(),
            reminder.user_email.trim(),
            reminder.sender_email.trim(),
            created_at,
            STATUS_SCHEDULED,
        ],
    )?;

    Ok(id)
}

/// All reminders ordered by due date, earliest first.
pub fn fetch_case_reminders(conn: &Connection) -> Result<Vec<CaseReminder>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, internal_due_date, user_email, sender_email,
                created_at, status, reminder_sent
         FROM case_reminders
         ORDER BY internal_due_date ASC, created_at ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(CaseReminder {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            internal_due_date: row.get(3)?,
            user_email: row.get(4)?,
            sender_email: row.get(5)?,
            created_at: row.get(6)?,
            status: row.get(7)?,
            reminder_sent: row.get::<_, i64>(8)? != 0,
        })
    })?;

    let mut reminders = Vec::new();
    for row in rows {
        reminders.push(row?);
    }
    Ok(reminders)
}

/// Handle to the reminder database. Each call opens its own connection,
/// so the handle is freely shared between request threads.
#[derive(Debug, Clone)]
pub struct ReminderStore {
    db_path: PathBuf,
}

impl ReminderStore {
    /// Opens the database once to create the schema.
    pub fn open(db_path: &Path) -> Result<Self, DatabaseError> {
        db::open_database(db_path)?;
        tracing::info!(path = %db_path.display(), "Reminder store ready");
        Ok(Self {
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn save(&self, reminder: &NewCaseReminder) -> Result<Uuid, DatabaseError> {
        let conn = db::open_database(&self.db_path)?;
        let id = save_case_reminder(&conn, reminder)?;
        tracing::info!(reminder_id = %id, due = %reminder.due_date, "Case reminder saved");
        Ok(id)
    }

    pub fn list(&self) -> Result<Vec<CaseReminder>, DatabaseError> {
        let conn = db::open_database(&self.db_path)?;
        fetch_case_reminders(&conn)
    }
}
