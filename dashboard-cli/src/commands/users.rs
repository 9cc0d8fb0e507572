use anyhow::Result;
use clap::Args;
use client::{App, routes::Route};

use super::{enter, explain, render};

#[derive(Args, Debug)]
pub struct UsersArgs {
    /// Page to show, starting at 1
    #[arg(long, short, default_value_t = 1)]
    pub page: u32,
}

/// Renders one page of the user directory.
pub async fn list(app: &App, args: &UsersArgs) -> Result<()> {
    enter(app, Route::Users)?;
    let page = app.users();
    page.list()
        .fetch_page(args.page)
        .await
        .map_err(|err| explain(err, "fetch users"))?;

    let list = page.list();
    let rows: Vec<Vec<String>> = list
        .items()
        .into_iter()
        .map(|user| {
            let email = user.email_or_dash().to_string();
            let full_name = user.full_name().unwrap_or_else(|| "-".to_string());
            vec![user.username, email, full_name]
        })
        .collect();

    println!("{}", Route::Users.title());
    print!("{}", render::table(&["Username", "Email", "Full Name"], &rows));
    println!(
        "{}",
        render::footer(&list.summary(), list.can_previous(), list.can_next())
    );
    Ok(())
}
