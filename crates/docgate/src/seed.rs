//! Default data created on first start

use anyhow::{Context, Result};
use docgate_db::{Database, NewRecord, NewUser, UserRole};
use tracing::info;

/// Users created when the credential store is empty
const DEFAULT_USERS: &[(&str, &str, UserRole)] = &[
    ("admin_miya", "321", UserRole::Admin),
    ("user_layla", "123", UserRole::User),
];

/// Records created when the data store is empty
const DEFAULT_RECORDS: &[(&str, &str, &str)] = &[
    (
        "Q1 Financial Report",
        "Highly sensitive financial data.",
        "admin_miya",
    ),
    (
        "New Training Plan",
        "Team training schedule and materials.",
        "user_layla",
    ),
];

/// Seed default users and records into empty tables
pub async fn seed_defaults(db: &Database) -> Result<()> {
    if db.count_users().await? == 0 {
        for (username, password, role) in DEFAULT_USERS {
            let password_hash = docgate_auth::hash_password(password)
                .with_context(|| format!("Failed to hash password for {}", username))?;
            db.insert_user(NewUser {
                username: username.to_string(),
                password_hash,
                role: *role,
            })
            .await?;
        }
        info!("Default users created (admin_miya, user_layla)");
    }

    if db.count_records().await? == 0 {
        for (title, content, owner) in DEFAULT_RECORDS {
            db.insert_record(NewRecord {
                title: title.to_string(),
                content: content.to_string(),
                owner: owner.to_string(),
            })
            .await?;
        }
        info!("Default records created");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_creates_defaults_once() {
        let db = Database::in_memory().await.unwrap();

        seed_defaults(&db).await.unwrap();
        seed_defaults(&db).await.unwrap();

        assert_eq!(db.count_users().await.unwrap(), 2);
        assert_eq!(db.count_records().await.unwrap(), 2);

        let admin = db.get_user_by_username("admin_miya").await.unwrap().unwrap();
        assert_eq!(admin.role, UserRole::Admin);
        assert_ne!(admin.password_hash, "321");
        assert!(docgate_auth::verify_password("321", &admin.password_hash).unwrap());
    }

    #[tokio::test]
    async fn test_seed_skips_populated_tables() {
        let db = Database::in_memory().await.unwrap();
        db.insert_record(NewRecord {
            title: "existing".to_string(),
            content: "kept".to_string(),
            owner: "someone".to_string(),
        })
        .await
        .unwrap();

        seed_defaults(&db).await.unwrap();

        let records = db.list_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "existing");
        assert_eq!(db.count_users().await.unwrap(), 2);
    }
}
