use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brokerage::domain::{DomainError, PropertyFilter};
use brokerage::infrastructure::AppState;
use brokerage::services::assignment;
use brokerage::{config, db, seed};

/// Brokerage administration
#[derive(Parser, Debug)]
#[command(name = "brokerage", version, about)]
struct Cli {
    /// Profile name, selects the default database file
    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create missing tables and indexes
    Migrate,
    /// Insert the demo district, listing, agent, customer and lead
    Seed,
    /// Print property listings
    Listings {
        /// Include listings that are unapproved, inactive or sold
        #[arg(long)]
        all: bool,
    },
    /// Show which agent a lead from LOCATION would go to
    Assign {
        #[arg(long)]
        location: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), DomainError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brokerage=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = config::Config::from_env();
    if let Some(profile) = cli.profile {
        if std::env::var("DATABASE_URL").is_err() {
            config.database_url = format!("sqlite://brokerage_{}.db?mode=rwc", profile);
        }
        config.profile = profile;
    }
    tracing::debug!(
        "Using profile '{}', media under {}",
        config.profile,
        config.media_root.display()
    );

    // Initialize database
    let db = db::init_db(&config.database_url).await?;

    if config.seed_demo && !matches!(cli.command, Command::Seed) {
        tracing::info!("Seeding demo data...");
        seed::seed_demo_data(&db).await?;
    }

    let state = AppState::new(db);

    match cli.command {
        Command::Migrate => {
            tracing::info!("Database ready at {}", config.database_url);
        }
        Command::Seed => {
            seed::seed_demo_data(state.db()).await?;
        }
        Command::Listings { all } => {
            let filter = if all {
                PropertyFilter::default()
            } else {
                PropertyFilter::approved()
            };
            let listings = state.property_repo.find_all(filter).await?;
            if listings.is_empty() {
                println!("No listings");
            }
            for p in listings {
                println!(
                    "#{} {} - {} ({} sqft, {} BHK){}",
                    p.id,
                    p,
                    p.price,
                    p.sqft,
                    p.bhk,
                    if p.admin_approval { "" } else { " [awaiting approval]" }
                );
            }
        }
        Command::Assign { location } => {
            match assignment::assign_lead_based_on_location(state.db(), &location).await? {
                Some(agent) => println!("{} (agent #{})", agent, agent.id),
                None => println!("No agent covers '{}'", location.trim()),
            }
        }
    }

    Ok(())
}
