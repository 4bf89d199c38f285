//! Provision a scout account.
//!
//! Usage: `create_user <email> <password> <name> <role> [club_id]`
//!
//! Inserts into Postgres when `DATABASE_URL` is set, otherwise prints the
//! INSERT statement to run by hand.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use scouting_server::config::Settings;
use scouting_server::db::models::{Role, User};
use scouting_server::db::{user_repo, Datastore};
use std::env;
use uuid::Uuid;

fn sql_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [email, password, name, role, rest @ ..] = args.as_slice() else {
        bail!("usage: create_user <email> <password> <name> <role> [club_id]");
    };
    if Role::parse(role).as_str() != role {
        bail!("unknown role {role:?} (admin, head_scout, scout, viewer)");
    }
    let club_id = rest
        .first()
        .map(|c| Uuid::parse_str(c).context("club_id must be a UUID"))
        .transpose()?;

    let user = User {
        id: Uuid::new_v4(),
        email: email.trim().to_lowercase(),
        password_hash: bcrypt::hash(password, bcrypt::DEFAULT_COST).context("hashing password")?,
        name: name.clone(),
        role: role.clone(),
        club_id,
        organization: None,
        department: None,
        is_active: true,
        created_at: Utc::now(),
    };

    let Ok(database_url) = env::var("DATABASE_URL") else {
        println!(
            "INSERT INTO scouts (id, email, password_hash, name, role, club_id, is_active, created_at)\n\
             VALUES ('{}', {}, {}, {}, {}, {}, TRUE, now());",
            user.id,
            sql_quote(&user.email),
            sql_quote(&user.password_hash),
            sql_quote(&user.name),
            sql_quote(&user.role),
            club_id.map_or_else(|| "NULL".to_string(), |c| format!("'{c}'")),
        );
        return Ok(());
    };

    let settings = Settings {
        database_url: Some(database_url),
        ..Settings::default()
    };
    let db = Datastore::connect(&settings).await?;
    user_repo::insert(&db, &user).await?;
    log::info!("created {} ({}) as {}", user.email, user.id, user.role);
    println!("{}", user.id);
    Ok(())
}
