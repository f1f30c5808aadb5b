use super::{prompts, render, App};
use crate::output::Output;
use crate::AdminCommands;
use catalog_models::UserPatch;
use color_eyre::eyre::Context;
use color_eyre::Result;
use serde_json::json;

pub async fn run_admin(app: &App, cmd: AdminCommands, output: &Output) -> Result<()> {
    match cmd {
        AdminCommands::Users => {
            let users = app.session.list_users().await.wrap_err("Failed to load users")?;
            if !output.is_human() {
                output.json(&json!({ "type": "users", "users": users }));
                return Ok(());
            }
            output.table(&render::users_table(&users));
            Ok(())
        }
        AdminCommands::Update { user_id, admin, active } => {
            let patch = UserPatch {
                is_admin: admin,
                is_active: active,
            };
            let updated = app
                .session
                .update_user(user_id, &patch)
                .await
                .wrap_err_with(|| format!("Failed to update user {}", user_id))?;
            output.success(format!(
                "Updated {}: admin={}, active={}",
                updated.username, updated.is_admin, updated.is_active
            ));
            output.json(&json!({ "type": "user", "user": updated }));
            Ok(())
        }
        AdminCommands::Delete { user_id, yes } => {
            if !yes && !prompts::prompt_yes_no(&format!("Delete user {}? This cannot be undone.", user_id), false)? {
                output.info("Nothing deleted.");
                return Ok(());
            }
            app.session
                .delete_user(user_id)
                .await
                .wrap_err_with(|| format!("Failed to delete user {}", user_id))?;
            output.success(format!("Deleted user {}", user_id));
            output.json(&json!({ "type": "user", "deleted": user_id }));
            Ok(())
        }
    }
}
