use super::{prompts, App};
use crate::output::Output;
use catalog_models::{ProfileUpdate, Registration, DEMO_USER_ID};
use color_eyre::eyre::Context;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

pub async fn run_login(app: &App, identifier: Option<String>, output: &Output) -> Result<()> {
    let identifier = match identifier {
        Some(identifier) => identifier,
        None => prompts::prompt_string("Username or email", None)?,
    };
    let password = prompts::prompt_password("Password")?;

    let user = app
        .session
        .login(&identifier, &password)
        .await
        .wrap_err("Login failed")?;

    output.success(format!("Welcome back, {}!", user.label()));
    output.json(&json!({ "type": "session", "user": user }));
    Ok(())
}

pub async fn run_register(
    app: &App,
    username: Option<String>,
    email: Option<String>,
    display_name: Option<String>,
    output: &Output,
) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => prompts::prompt_string("Username", None)?,
    };
    let email = match email {
        Some(email) => email,
        None => prompts::prompt_string("Email", None)?,
    };
    let password = prompts::prompt_new_password("Password")?;

    let user = app
        .session
        .register(Registration {
            username,
            email,
            password,
            display_name,
        })
        .await
        .wrap_err("Registration failed")?;

    output.success(format!("Account created. Logged in as {}.", user.username));
    output.json(&json!({ "type": "session", "user": user }));
    Ok(())
}

pub fn run_logout(app: &App, output: &Output) -> Result<()> {
    if !app.session.is_logged_in() {
        output.info("You are not logged in.");
        return Ok(());
    }
    app.session.logout()?;
    output.success("Logged out.");
    Ok(())
}

pub fn run_whoami(app: &App, output: &Output) -> Result<()> {
    let user = app.session.current_user();

    if !output.is_human() {
        output.json(&json!({ "type": "session", "user": user, "userId": app.session.user_id() }));
        return Ok(());
    }

    match user {
        Some(user) => {
            let role = if user.is_admin { " (admin)" } else { "" };
            output.println(format!("{}{}", user.label().bright_cyan().bold(), role));
            output.println(format!("id {} · {} · {}", user.user_id, user.username, user.email));
            if let Some(bio) = user.bio.as_deref().filter(|b| !b.is_empty()) {
                output.println(bio);
            }
        }
        None => output.info(format!(
            "Not logged in. Reviews and searches are recorded as demo user {}.",
            DEMO_USER_ID
        )),
    }
    Ok(())
}

pub async fn run_profile(
    app: &App,
    display_name: Option<String>,
    bio: Option<String>,
    change_password: bool,
    output: &Output,
) -> Result<()> {
    let password = if change_password {
        Some(prompts::prompt_new_password("New password")?)
    } else {
        None
    };

    let user = app
        .session
        .update_profile(ProfileUpdate {
            display_name,
            bio,
            password,
        })
        .await
        .wrap_err("Profile update failed")?;

    output.success("Profile updated.");
    output.json(&json!({ "type": "session", "user": user }));
    Ok(())
}
