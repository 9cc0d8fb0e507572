//! Subcommand implementations. Each authenticated command opens its route
//! through the guard first, exactly as the views would.

pub mod completion;
pub mod config;
pub mod logging;
pub mod render;
pub mod reports;
pub mod session;
pub mod stats;
pub mod users;

use anyhow::{Result, anyhow, bail};
use client::{
    App, ApiError,
    routes::{Navigation, Route},
};

use crate::Commands;

/// Printed whenever the guard sends a command to the login page.
pub const NOT_SIGNED_IN: &str = "Not signed in. Run `dashboard login` first.";

/// Printed when the API rejected the stored token mid-command.
pub const SESSION_EXPIRED: &str = "Session expired. Run `dashboard login` to sign in again.";

/// Dispatches a command that talks to the API.
pub async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Login(args) => session::login(app, args).await,
        Commands::Logout => {
            session::logout(app);
            Ok(())
        }
        Commands::Whoami => session::whoami(app).await,
        Commands::Stats => stats::show(app).await,
        Commands::Users(args) => users::list(app, &args).await,
        Commands::Reports(args) => reports::list(app, &args).await,
        Commands::Send(args) => reports::send(app, &args).await,
        Commands::Delete(args) => reports::delete(app, &args).await,
        Commands::Completion { .. } | Commands::Config { .. } => {
            bail!("command does not use the API")
        }
    }
}

/// Fails unless the guard renders `route` for the current session.
pub fn enter(app: &App, route: Route) -> Result<()> {
    match app.navigate(route.path()) {
        Navigation::Render(_) => Ok(()),
        Navigation::Redirect(Route::Login) => bail!(NOT_SIGNED_IN),
        Navigation::Redirect(other) => bail!("{} is not available; try {}", route.path(), other.path()),
    }
}

/// Turns an API failure into a user-facing error.
pub fn explain(err: ApiError, action: &str) -> anyhow::Error {
    if err.is_unauthorized() {
        anyhow!(SESSION_EXPIRED)
    } else {
        anyhow::Error::new(err).context(format!("failed to {action}"))
    }
}
