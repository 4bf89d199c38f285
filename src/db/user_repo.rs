use anyhow::{Context, Result};
use chrono::Utc;
use uuid::Uuid;

use super::models::{Role, User};
use super::Datastore;

pub async fn by_id(db: &Datastore, id: Uuid) -> Result<Option<User>> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_as::<_, User>("SELECT * FROM scouts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .context("fetching user by id"),
        Datastore::Memory(mem) => Ok(mem.users.get(&id).map(|u| u.value().clone())),
    }
}

/// Login lookup; emails compare case-insensitively.
pub async fn by_email(db: &Datastore, email: &str) -> Result<Option<User>> {
    match db {
        Datastore::Postgres(pool) => {
            sqlx::query_as::<_, User>("SELECT * FROM scouts WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(pool)
                .await
                .context("fetching user by email")
        }
        Datastore::Memory(mem) => Ok(mem
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .map(|u| u.value().clone())),
    }
}

pub async fn insert(db: &Datastore, user: &User) -> Result<()> {
    match db {
        Datastore::Postgres(pool) => {
            sqlx::query(
                "INSERT INTO scouts
                     (id, email, password_hash, name, role, club_id,
                      organization, department, is_active, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            )
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.role)
            .bind(user.club_id)
            .bind(&user.organization)
            .bind(&user.department)
            .bind(user.is_active)
            .bind(user.created_at)
            .execute(pool)
            .await
            .context("inserting user")?;
        }
        Datastore::Memory(mem) => {
            if mem.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
                anyhow::bail!("email {} already registered", user.email);
            }
            mem.users.insert(user.id, user.clone());
        }
    }
    Ok(())
}

/// Create an active, club-less admin unless the email is already registered.
/// Returns whether an account was created.
pub async fn seed_admin(db: &Datastore, email: &str, password: &str) -> Result<bool> {
    let email = email.trim().to_lowercase();
    if by_email(db, &email).await?.is_some() {
        return Ok(false);
    }
    let user = User {
        id: Uuid::new_v4(),
        name: email.split('@').next().unwrap_or("admin").to_string(),
        email,
        password_hash: bcrypt::hash(password, bcrypt::DEFAULT_COST).context("hashing password")?,
        role: Role::Admin.as_str().to_string(),
        club_id: None,
        organization: None,
        department: None,
        is_active: true,
        created_at: Utc::now(),
    };
    insert(db, &user).await?;
    Ok(true)
}
