use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use rollbook_cli::seeder::{self, DemoConfig};
use rollbook_config::DatabaseConfig;
use rollbook_db::seed::{
    BOOTSTRAP_ADMIN_PASSWORD, BOOTSTRAP_ADMIN_USERNAME, BootstrapAdmin, create_bootstrap_admin,
    seed_defaults,
};
use rollbook_db::{PgPool, init_db_pool, run_migrations};

#[derive(Parser)]
#[command(name = "rollbook-cli")]
#[command(about = "Rollbook CLI - Administrative tools for Rollbook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations and create the built-in roles and permissions
    Bootstrap,
    /// Create the first administrator account
    CreateAdmin {
        /// Username (defaults to `admin`)
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Password (defaults to `admin123`)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// Prompt for the username and password
        #[arg(short = 'i', long)]
        interactive: bool,
    },
    /// Fill the database with fake teachers, courses, students and enrollments
    SeedDemo {
        #[arg(long, default_value = "10")]
        teachers: usize,

        #[arg(long, default_value = "20")]
        courses: usize,

        #[arg(short = 's', long, default_value = "200")]
        students: usize,

        /// Courses per student
        #[arg(long, default_value = "3")]
        enrollments: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rollbook_db=info,warn".into()),
        )
        .compact()
        .init();

    let cli = Cli::parse();

    let pool = init_db_pool(&DatabaseConfig::from_env()?)
        .await
        .context("failed to connect to database")?;

    match cli.command {
        Commands::Bootstrap => handle_bootstrap(&pool).await,
        Commands::CreateAdmin {
            username,
            password,
            interactive,
        } => handle_create_admin(&pool, username, password, interactive).await,
        Commands::SeedDemo {
            teachers,
            courses,
            students,
            enrollments,
        } => {
            let config = DemoConfig {
                teachers,
                courses,
                students,
                enrollments_per_student: enrollments,
            };
            seeder::seed_demo(&pool, config).await.map(|_| ())
        }
    }
}

async fn handle_bootstrap(pool: &PgPool) -> anyhow::Result<()> {
    run_migrations(pool).await?;
    let report = seed_defaults(pool).await?;

    println!("✅ Bootstrap complete");
    println!("   Roles created: {}", report.roles_created);
    println!("   Permissions created: {}", report.permissions_created);
    if !report.roles_granted.is_empty() {
        println!("   Default grants applied to: {}", report.roles_granted.join(", "));
    }
    Ok(())
}

async fn handle_create_admin(
    pool: &PgPool,
    username: Option<String>,
    password: Option<String>,
    interactive: bool,
) -> anyhow::Result<()> {
    let username = match username {
        Some(username) => username,
        None if interactive => Input::new()
            .with_prompt("Username")
            .default(BOOTSTRAP_ADMIN_USERNAME.to_string())
            .interact_text()?,
        None => BOOTSTRAP_ADMIN_USERNAME.to_string(),
    };

    let password = match password {
        Some(password) => password,
        None if interactive => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()?,
        None => BOOTSTRAP_ADMIN_PASSWORD.to_string(),
    };

    match create_bootstrap_admin(pool, &username, &password).await? {
        BootstrapAdmin::Created { user_id } => {
            println!("\n✅ Administrator created");
            println!("   Username: {}", username);
            println!("   ID: {}", user_id);
            if password == BOOTSTRAP_ADMIN_PASSWORD {
                println!("⚠️  Using the default password; change it after first login.");
            }
        }
        BootstrapAdmin::AlreadyExists => {
            println!("ℹ️  User '{}' already exists; nothing to do.", username);
        }
    }
    Ok(())
}
