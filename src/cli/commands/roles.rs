//! Role management command handlers
//!
//! These talk to the store directly: the operator running the binary is
//! trusted, so there is no actor to check.

use anyhow::Context;

use crate::config::Config;
use crate::db::Store;
use crate::domain::Role;
use crate::models::GrantOutcome;

pub async fn cmd_grant_role(config: &Config, email: &str, role: &str) -> anyhow::Result<()> {
    let role: Role = role.parse()?;
    let store = Store::new(&config.general.database_path).await?;

    let user = store
        .get_user_by_email(&email.trim().to_lowercase())
        .await?
        .with_context(|| format!("No user registered with email {email}"))?;

    match store.role_repo().grant(&user.id, role).await? {
        GrantOutcome::Granted(assignment) => {
            println!("✓ Granted {} to {} ({})", role, user.email, assignment.id);
        }
        GrantOutcome::AlreadyGranted => {
            println!("{} already has the {} role", user.email, role);
        }
    }

    Ok(())
}

pub async fn cmd_roles(config: &Config, email: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let user = store
        .get_user_by_email(&email.trim().to_lowercase())
        .await?
        .with_context(|| format!("No user registered with email {email}"))?;

    let roles = store.role_repo().list_roles(&user.id).await?;
    if roles.is_empty() {
        println!("{} holds no roles.", user.email);
        return Ok(());
    }

    println!("Roles for {}:", user.display_name());
    for role in roles.iter() {
        println!("  • {role}");
    }

    Ok(())
}
