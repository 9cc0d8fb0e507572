use anyhow::{Result, bail};
use client::{App, routes::Route};

use super::{SESSION_EXPIRED, enter};

/// Renders the dashboard overview.
pub async fn show(app: &App) -> Result<()> {
    enter(app, Route::Dashboard)?;
    if app.start().await.is_none() {
        bail!(SESSION_EXPIRED);
    }

    let page = app.dashboard();
    page.load().await;

    println!("{} Overview", Route::Dashboard.title());
    println!("{}", page.greeting());
    println!();
    for (label, value) in page.cards() {
        println!("{label:<16}{value}");
    }
    Ok(())
}
