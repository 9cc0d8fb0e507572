use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::Args;
use client::{App, pages::ComposeError, routes::Route};
use shared::models::{FILTER_DATE_FORMAT, MessageFilters};

use super::{enter, explain, render, session::confirm};

#[derive(Args, Debug)]
pub struct ReportsArgs {
    /// Page to show, starting at 1
    #[arg(long, short, default_value_t = 1)]
    pub page: u32,

    /// Only messages on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Only messages on or before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Message text
    pub message: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Identifier of the message to delete
    pub id: i64,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, FILTER_DATE_FORMAT)
        .map_err(|err| format!("expected YYYY-MM-DD: {err}"))
}

fn bound(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format(FILTER_DATE_FORMAT).to_string())
}

/// Renders one page of a date-filtered search.
pub async fn list(app: &App, args: &ReportsArgs) -> Result<()> {
    enter(app, Route::Reports)?;
    let reports = app.reports();
    let filters = MessageFilters::between(args.from, args.to);
    let filtered = !filters.is_empty();
    reports
        .search_page(filters, args.page)
        .await
        .map_err(|err| explain(err, "fetch reports"))?;

    let list = reports.list();
    let rows: Vec<Vec<String>> = list
        .items()
        .into_iter()
        .map(|message| {
            vec![
                format!("#{}", message.id),
                message.timestamp,
                message.text,
                message.author,
            ]
        })
        .collect();

    println!("{}", Route::Reports.title());
    if filtered {
        println!("From {} to {}", bound(args.from), bound(args.to));
    }
    if rows.is_empty() {
        println!("No results found.");
    } else {
        print!("{}", render::table(&["ID", "Date", "Message", "User"], &rows));
    }
    println!(
        "{}",
        render::footer(&list.summary(), list.can_previous(), list.can_next())
    );
    Ok(())
}

/// Posts a new message.
pub async fn send(app: &App, args: &SendArgs) -> Result<()> {
    enter(app, Route::Reports)?;
    match app.reports().send_message(&args.message).await {
        Ok(confirmation) => {
            println!("{confirmation}");
            Ok(())
        }
        Err(ComposeError::Rejected(err)) if err.is_unauthorized() => {
            Err(explain(err, "send message"))
        }
        Err(err) => Err(anyhow!(err.to_string())),
    }
}

/// Deletes one message after confirmation.
pub async fn delete(app: &App, args: &DeleteArgs) -> Result<()> {
    enter(app, Route::Reports)?;
    if !args.yes && !confirm("Are you sure you want to delete this message?")? {
        println!("Cancelled.");
        return Ok(());
    }

    match app.reports().delete(args.id).await {
        Ok(()) => {
            println!("Deleted message #{}.", args.id);
            Ok(())
        }
        Err(err) if err.source.is_unauthorized() => Err(explain(err.source, "delete message")),
        Err(err) => Err(anyhow!(err.to_string())),
    }
}
