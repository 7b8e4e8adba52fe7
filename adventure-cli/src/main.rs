mod api;
mod cli;
mod config;
mod render;
mod session_store;
mod sheet;

use adventure_core::{CellKey, GridMonth};
use anyhow::{Context, Result};
use clap::Parser;
use time::{macros::format_description, Date};

use crate::{
    api::ApiClient,
    cli::{Cli, Commands},
    config::AdventureConfig,
    sheet::{EditOutcome, GridSheet},
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = AdventureConfig::load()?;

    match cli.command {
        Commands::Signup { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            let confirm = rpassword::prompt_password("Repeat password: ")?;
            if password != confirm {
                anyhow::bail!("Passwords do not match.");
            }
            let client = ApiClient::new(&config.api_url, None)?;
            let me = client.signup(&email, &password).await?;
            store_session(&client)?;
            println!("Signed up as {} (user {}).", me.email, me.id);
        }
        Commands::Login { email } => {
            let password = rpassword::prompt_password("Password: ")?;
            let client = ApiClient::new(&config.api_url, None)?;
            let me = client.login(&email, &password).await?;
            store_session(&client)?;
            println!("Logged in as {} (user {}).", me.email, me.id);
        }
        Commands::Logout => {
            if let Some(session) = session_store::load_session()? {
                let client = ApiClient::new(&config.api_url, Some(&session))?;
                if let Err(e) = client.logout().await {
                    tracing::warn!("server logout failed: {e:#}");
                }
            }
            session_store::clear_session()?;
            println!("Logged out.");
        }
        Commands::Show { month } => {
            let client = authed_client(&config)?;
            let month = month.as_deref().map(str::parse::<GridMonth>).transpose()?;
            let grid = client.grid(month).await?;

            let mut sheet = GridSheet::new();
            sheet.load(grid.cell_values());
            print!("{}", render::month_table(grid.month, &grid.categories, &sheet));
        }
        Commands::Set {
            day,
            category,
            value,
            month,
        } => {
            let client = authed_client(&config)?;
            let month = month.as_deref().map(str::parse::<GridMonth>).transpose()?;
            set_cell(&client, &day, &category, &value, month).await?;
        }
        Commands::Categories => {
            let client = authed_client(&config)?;
            let categories = client.categories().await?;
            print!("{}", render::category_list(&categories));
        }
        Commands::AddCategory { name } => {
            let client = authed_client(&config)?;
            let category = client.add_category(&name).await?;
            println!("Added category {} ({}).", category.name, category.id);
        }
        Commands::ConfigPath => {
            let path = AdventureConfig::ensure_exists()?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn authed_client(config: &AdventureConfig) -> Result<ApiClient> {
    let session = session_store::load_session()?
        .context("Not logged in. Run `adventure-cli login <email>` first.")?;
    ApiClient::new(&config.api_url, Some(&session))
}

fn store_session(client: &ApiClient) -> Result<()> {
    let session = client
        .session_id()
        .context("Server did not return a session cookie")?;
    session_store::save_session(&session)
}

async fn set_cell(
    client: &ApiClient,
    day: &str,
    category: &str,
    value: &str,
    month: Option<GridMonth>,
) -> Result<()> {
    let day = DayArg::parse(day)?;
    let month = match day {
        DayArg::Date(date) => Some(GridMonth::containing(date)),
        DayArg::OfMonth(_) => month,
    };

    let grid = client.grid(month).await?;
    let date = day.resolve(grid.month)?;
    let category = grid
        .find_category(category)
        .with_context(|| format!("No category named {:?}", category))?;
    let key = CellKey::new(date, category.id);

    let mut sheet = GridSheet::new();
    sheet.load(grid.cell_values());

    match sheet.edit_and_reload(client, grid.month, key, value).await {
        EditOutcome::Saved => {
            let shown = match sheet.display(&key) {
                "" => "(empty)",
                text => text,
            };
            println!("{} on {}: {}", category.name, date, shown);
            Ok(())
        }
        EditOutcome::RolledBack { restored, error } => {
            let restored = if restored.is_empty() {
                "(empty)".to_string()
            } else {
                restored
            };
            Err(error.context(format!(
                "Could not save {} on {}; cell is back to {}",
                category.name, date, restored
            )))
        }
        EditOutcome::Rejected(e) => Err(e.into()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayArg {
    OfMonth(u8),
    Date(Date),
}

impl DayArg {
    fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Ok(day) = raw.parse::<u8>() {
            return Ok(Self::OfMonth(day));
        }
        let date = Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .with_context(|| format!("Invalid day {:?}, use 15 or 2026-01-15", raw))?;
        Ok(Self::Date(date))
    }

    fn resolve(self, month: GridMonth) -> Result<Date> {
        match self {
            Self::Date(date) => Ok(date),
            Self::OfMonth(day) => Date::from_calendar_date(month.year(), month.month(), day)
                .with_context(|| format!("{} has no day {}", month, day)),
        }
    }
}
