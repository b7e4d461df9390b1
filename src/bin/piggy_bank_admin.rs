//! piggy_bank admin CLI
//!
//! Provisions subscriptions and issues their bearer tokens.

use clap::{Parser, Subcommand};
use piggy_bank::{db, tenant, Store};

#[derive(Parser)]
#[command(name = "piggy_bank_admin")]
#[command(about = "Manage piggy_bank subscriptions", long_about = None)]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:piggy_bank.db")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a subscription and print its token
    Create {
        /// Display name of the subscription
        name: String,
    },

    /// List all subscriptions
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "piggy_bank=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = Store::connect(&cli.database_url, 1).await?;
    db::init_schema(store.pool()).await?;

    match cli.command {
        Commands::Create { name } => {
            let provisioned = tenant::create_tenant(&store, &name).await?;
            println!("Subscription created");
            println!("  id:    {}", provisioned.tenant.id);
            println!("  name:  {}", provisioned.tenant.name);
            println!("  token: {}", provisioned.token);
            println!();
            println!("Store the token now; it cannot be shown again.");
        }
        Commands::List => {
            let tenants = tenant::list_tenants(&store).await?;
            if tenants.is_empty() {
                println!("No subscriptions");
            }
            for t in tenants {
                println!(
                    "{:>5}  {:<30}  {}",
                    t.id.get(),
                    t.name,
                    t.created_at.format("%Y-%m-%d %H:%M:%S")
                );
            }
        }
    }

    store.close().await;
    Ok(())
}
