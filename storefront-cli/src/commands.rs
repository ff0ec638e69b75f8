//! Subcommands and their execution

use clap::Subcommand;
use serde::Serialize;
use storefront_client::{Credentials, Envelope, ListQuery, Sort, StorefrontClient};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and keep the access token in the session file
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and forget the access token
    Logout,

    /// Show the signed-in account
    Account,

    /// Search the phone catalog
    Phones {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        page_size: u32,
        /// Sort key, `-field` for descending (e.g. `-sold`)
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<Sort>,
        /// Case-insensitive name match
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        /// Brand filter, repeatable
        #[arg(long)]
        brand: Vec<String>,
    },

    /// Order history of the signed-in user
    OrdersHistory {
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        page_size: u32,
    },

    /// Admin dashboard counters
    Dashboard,
}

/// Rendered result of one command
pub struct Output {
    pub json: String,
    pub success: bool,
}

impl Output {
    fn from_envelope<T: Serialize>(envelope: &Envelope<T>) -> anyhow::Result<Self> {
        Ok(Self {
            json: serde_json::to_string_pretty(envelope)?,
            success: envelope.is_success(),
        })
    }
}

pub async fn execute(client: &StorefrontClient, command: Commands) -> anyhow::Result<Output> {
    match command {
        Commands::Login { email, password } => {
            let envelope = client
                .auth()
                .login(&Credentials::new(email, password))
                .await?;
            // Token already stored; keep it off stdout
            Output::from_envelope(&envelope.map(|login| login.user))
        }
        Commands::Logout => Output::from_envelope(&client.auth().logout().await),
        Commands::Account => Output::from_envelope(&client.auth().account().await),
        Commands::Phones {
            page,
            page_size,
            sort,
            name,
            min_price,
            max_price,
            brand,
        } => {
            let query = phone_query(page, page_size, sort, name, min_price, max_price, brand);
            Output::from_envelope(&client.phones().list(&query).await)
        }
        Commands::OrdersHistory { page, page_size } => {
            let query = ListQuery::page(page, page_size);
            Output::from_envelope(&client.orders().history(&query).await)
        }
        Commands::Dashboard => Output::from_envelope(&client.dashboard().summary().await),
    }
}

fn phone_query(
    page: u32,
    page_size: u32,
    sort: Option<Sort>,
    name: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    brands: Vec<String>,
) -> ListQuery {
    let mut query = ListQuery::page(page, page_size)
        .range("price", min_price, max_price)
        .equals("brand", brands);
    if let Some(sort) = sort {
        query = query.sort(sort);
    }
    if let Some(name) = name {
        query = query.matching("name", name);
    }
    query
}
