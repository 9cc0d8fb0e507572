use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::Args;
use client::{App, LoginOutcome, routes::Route};
use rpassword::prompt_password;

use super::{SESSION_EXPIRED, enter};

/// Environment variable consulted before prompting for a password.
pub const PASSWORD_VAR: &str = "DASHBOARD_PASSWORD";

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account name; prompted for when omitted
    #[arg(long, short)]
    pub username: Option<String>,

    /// Password; read from DASHBOARD_PASSWORD or prompted for when omitted
    #[arg(long, short, env = PASSWORD_VAR, hide_env_values = true)]
    pub password: Option<String>,
}

pub async fn login(app: &App, args: LoginArgs) -> Result<()> {
    if let Some(user) = app.session().current_user() {
        println!("Already signed in as {}.", user.username);
        return Ok(());
    }
    if app.session().is_authenticated() {
        println!("Already signed in. Run `dashboard logout` to switch accounts.");
        return Ok(());
    }

    let username = match args.username {
        Some(username) => username,
        None => prompt("Username: ")?,
    };
    let password = match args.password {
        Some(password) => password,
        None => prompt_password("Password: ").context("failed to read password")?,
    };

    match app.login(&username, &password).await {
        LoginOutcome::Authenticated(user) => {
            println!("Signed in as {}.", user.username);
            println!(
                "Session token stored at {}",
                app.config().resolved_token_path().display()
            );
            Ok(())
        }
        LoginOutcome::InvalidCredentials | LoginOutcome::ProfileUnavailable => {
            let message = app
                .session()
                .last_error()
                .unwrap_or_else(|| "Sign-in failed.".to_string());
            bail!(message)
        }
        LoginOutcome::Interrupted => bail!("Sign-in was interrupted; please try again."),
        LoginOutcome::AlreadyAuthenticated => {
            println!("Already signed in.");
            Ok(())
        }
        LoginOutcome::InProgress => bail!("Another sign-in is already in progress."),
    }
}

pub fn logout(app: &App) {
    let was_signed_in = app.session().is_authenticated();
    app.logout();
    if was_signed_in {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
}

pub async fn whoami(app: &App) -> Result<()> {
    enter(app, Route::Dashboard)?;
    let Some(user) = app.start().await else {
        bail!(SESSION_EXPIRED);
    };

    println!("Username:  {}", user.username);
    println!("Email:     {}", user.email_or_dash());
    println!(
        "Full name: {}",
        user.full_name().unwrap_or_else(|| "-".to_string())
    );
    let views: Vec<_> = Route::menu().map(Route::title).collect();
    println!("Views:     {}", views.join(", "));
    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

/// Reads a yes/no answer; anything but `y`/`yes` is a no.
pub fn confirm(message: &str) -> Result<bool> {
    print!("{message} [y/N] ");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
