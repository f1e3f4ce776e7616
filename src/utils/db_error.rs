//! Helpers for classifying PostgreSQL errors returned through `sqlx`.

/// Unique constraint on `links.short_code`.
pub const LINKS_SHORT_CODE_KEY: &str = "links_short_code_key";

/// Unique constraint on `lead_captures (link_id, email)`.
pub const LEAD_CAPTURES_LINK_EMAIL_KEY: &str = "lead_captures_link_email_key";

/// Returns true if `e` is a unique violation on the named constraint.
pub fn is_unique_violation_on(e: &sqlx::Error, constraint: &str) -> bool {
    let Some(db_err) = e.as_database_error() else {
        return false;
    };

    if !db_err.is_unique_violation() {
        return false;
    }

    db_err.constraint() == Some(constraint)
}
