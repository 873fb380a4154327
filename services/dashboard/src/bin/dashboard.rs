//! services/dashboard/src/bin/dashboard.rs

use admin_dashboard_core::domain::{ProductCategory, ProductDraft, Role, UserStatus};
use admin_dashboard_core::pagination::paginate;
use clap::{Args, Parser, Subcommand};
use dashboard_lib::{
    config::Config,
    dashboard::Dashboard,
    error::DashboardError,
    notify::{Notification, Severity},
};
use tokio::sync::broadcast;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "Manage the store catalogue and user accounts from the command line")]
struct Cli {
    /// Bearer token from an earlier login
    #[arg(long, global = true, env = "ADMIN_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and print the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an operator account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Product catalogue
    #[command(subcommand)]
    Products(ProductsCommand),
    /// Managed user accounts
    #[command(subcommand)]
    Users(UsersCommand),
    /// Load products and users together and print a summary
    Overview,
}

#[derive(Subcommand)]
enum ProductsCommand {
    List(PageArgs),
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 0)]
        stock: u32,
        #[arg(long)]
        category: ProductCategory,
        #[arg(long, default_value = "")]
        image_url: String,
    },
    /// Change the given fields of an existing product
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        stock: Option<u32>,
        #[arg(long)]
        category: Option<ProductCategory>,
        #[arg(long)]
        image_url: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum UsersCommand {
    List(PageArgs),
    SetStatus {
        id: String,
        status: UserStatus,
    },
    SetRole {
        id: String,
        role: Role,
    },
    /// Flip a user between active and inactive
    Toggle {
        id: String,
    },
}

#[derive(Args)]
struct PageArgs {
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: usize,
    #[arg(long, default_value_t = 10)]
    page_size: usize,
}

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if cli.token.is_some() {
        config.token = cli.token.clone();
    }
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded.");

    // --- 2. Build the Stores ---
    let dashboard = Dashboard::connect(&config)?;
    let notifications = dashboard.notifier.subscribe();

    // --- 3. Run the Command ---
    let result = run(&dashboard, cli.command).await;
    print_notifications(notifications);
    result
}

async fn run(dashboard: &Dashboard, command: Command) -> Result<(), DashboardError> {
    match command {
        Command::Login { email, password } => {
            let session = dashboard.auth.login(&email, &password).await?;
            println!("Signed in as {} <{}>", session.user.name, session.user.email);
            println!("export ADMIN_TOKEN={}", session.token);
        }
        Command::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            dashboard
                .auth
                .register(&name, &email, &password, &confirm_password)
                .await?;
        }
        Command::Products(command) => {
            dashboard.guard("/products")?;
            run_products(dashboard, command).await?;
        }
        Command::Users(command) => {
            dashboard.guard("/users")?;
            run_users(dashboard, command).await?;
        }
        Command::Overview => {
            dashboard.guard("/dashboard")?;
            let (products, users) =
                futures::try_join!(dashboard.products.fetch_all(), dashboard.users.fetch_all())?;
            let out_of_stock = products.iter().filter(|p| p.stock == 0).count();
            let active = users.iter().filter(|u| u.status == UserStatus::Active).count();
            println!("Products: {} ({} out of stock)", products.len(), out_of_stock);
            println!("Users:    {} ({} active)", users.len(), active);
        }
    }
    Ok(())
}

async fn run_products(dashboard: &Dashboard, command: ProductsCommand) -> Result<(), DashboardError> {
    let store = &dashboard.products;
    match command {
        ProductsCommand::List(args) => {
            let products = store.fetch_all().await?;
            let page = paginate(&products, args.page, args.page_size);
            for p in page.items {
                println!(
                    "{:<24} {:<32} {:>10.2} {:>6} {}",
                    p.id, p.name, p.price, p.stock, p.category
                );
            }
            println!(
                "page {} of {} ({} products)",
                page.page + 1,
                page.total_pages.max(1),
                page.total
            );
        }
        ProductsCommand::Create {
            name,
            description,
            price,
            stock,
            category,
            image_url,
        } => {
            let draft = ProductDraft {
                name,
                description,
                price,
                stock,
                category,
                image_url,
            };
            let product = store.create(&draft).await?;
            println!("Created product {}", product.id);
        }
        ProductsCommand::Update {
            id,
            name,
            description,
            price,
            stock,
            category,
            image_url,
        } => {
            store.fetch_all().await?;
            let current = store.select(&id).ok_or_else(|| {
                DashboardError::Internal(format!("Product {} was not found", id))
            })?;
            let mut draft = ProductDraft::from(&current);
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(description) = description {
                draft.description = description;
            }
            if let Some(price) = price {
                draft.price = price;
            }
            if let Some(stock) = stock {
                draft.stock = stock;
            }
            if let Some(category) = category {
                draft.category = category;
            }
            if let Some(image_url) = image_url {
                draft.image_url = image_url;
            }
            debug!(?draft, "Sending product update");
            let product = store.update(&id, &draft).await?;
            println!("Updated product {}", product.id);
        }
        ProductsCommand::Delete { id } => {
            store.delete(&id).await?;
            println!("Deleted product {}", id);
        }
    }
    Ok(())
}

async fn run_users(dashboard: &Dashboard, command: UsersCommand) -> Result<(), DashboardError> {
    let store = &dashboard.users;
    match command {
        UsersCommand::List(args) => {
            let users = store.fetch_all().await?;
            let page = paginate(&users, args.page, args.page_size);
            for u in page.items {
                println!(
                    "{:<24} {:<24} {:<32} {:<6} {}",
                    u.id, u.name, u.email, u.role, u.status
                );
            }
            println!(
                "page {} of {} ({} users)",
                page.page + 1,
                page.total_pages.max(1),
                page.total
            );
        }
        UsersCommand::SetStatus { id, status } => {
            let user = store.update_status(&id, status).await?;
            println!("{} is now {}", user.email, user.status);
        }
        UsersCommand::SetRole { id, role } => {
            let user = store.update_role(&id, role).await?;
            println!("{} is now {}", user.email, user.role);
        }
        UsersCommand::Toggle { id } => {
            store.fetch_all().await?;
            let user = store.toggle_status(&id).await?;
            println!("{} is now {}", user.email, user.status);
        }
    }
    Ok(())
}

// Drains whatever the stores published while the command ran.
fn print_notifications(mut rx: broadcast::Receiver<Notification>) {
    while let Ok(notification) = rx.try_recv() {
        let tag = match notification.severity {
            Severity::Success => "ok",
            Severity::Info => "info",
            Severity::Warning => "warn",
            Severity::Error => "error",
        };
        eprintln!("[{}] {}", tag, notification.message);
    }
}
