//! List users command handler

use crate::config::Config;
use crate::db::Store;
use crate::domain::RoleSet;

pub async fn cmd_users(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let users = store.user_repo().list_all().await?;

    if users.is_empty() {
        println!("No users registered.");
        return Ok(());
    }

    let assignments = store.role_repo().list_all().await?;

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let roles: RoleSet = assignments
            .iter()
            .filter(|a| a.user_id == user.id)
            .map(|a| a.role)
            .collect();
        let roles = if roles.is_empty() {
            "-".to_string()
        } else {
            roles.iter().map(|r| r.as_str()).collect::<Vec<_>>().join(", ")
        };

        println!("{:<40} {}", user.email, roles);
        println!("  ID: {} | Joined: {}", user.id, user.created_at);
    }

    Ok(())
}
