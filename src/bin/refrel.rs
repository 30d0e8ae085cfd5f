use clap::{Parser, Subcommand};
use refrel_service::client::{
    reward_progress, ApiClient, ClientError, DirectoryStats, ListQuery, SessionStore, SortKey,
    DEFAULT_API_URL,
};
use refrel_service::models::User;

#[derive(Parser)]
#[command(name = "refrel", version, about = "Refrel terminal client: dashboard, leaderboard and user directory")]
struct Cli {
    /// Base URL of the directory service
    #[arg(long, env = "REFREL_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in by name and show the dashboard
    Signin {
        /// Full name used at signup
        name: String,
    },
    /// Create an account and show the dashboard
    Signup {
        name: String,
        email: String,
    },
    /// Sign in, add a donation and show the updated dashboard
    Donate {
        name: String,
        /// Amount to add (positive)
        amount: i64,
    },
    /// Top referrers
    Leaderboard {
        /// Case-insensitive filter on name, email or referral code
        #[arg(long, default_value = "")]
        search: String,
        /// newest, oldest, highest, lowest or name
        #[arg(long, default_value = "highest")]
        sort: SortKey,
    },
    /// Paginated user directory
    Users {
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 50)]
        limit: u64,
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "newest")]
        sort: SortKey,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match ApiClient::new(&cli.api_url) {
        Ok(api) => run(&api, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if e.is_retryable() {
            eprintln!("Could not reach {}. Check that the service is running and try again.", cli.api_url);
        }
        std::process::exit(1);
    }
}

async fn run(api: &ApiClient, command: Commands) -> Result<(), ClientError> {
    let mut sessions = SessionStore::new();

    match command {
        Commands::Signin { name } => {
            let session = sessions.sign_in(api, &name).await?;
            print_dashboard(session.user());
        }
        Commands::Signup { name, email } => {
            let session = sessions.sign_up(api, &name, &email).await?;
            println!("Account created successfully!\n");
            print_dashboard(session.user());
        }
        Commands::Donate { name, amount } => {
            sessions.sign_in(api, &name).await?;
            let session = sessions.donate(api, amount).await?;
            println!("Added ${} to {}\n", amount, session.user().referral_code);
            print_dashboard(session.user());
        }
        Commands::Leaderboard { search, sort } => {
            let users = api.leaderboard().await?;
            let view = ListQuery::new(search, sort).apply(&users);
            println!("🏆 Top Referrers");
            print_table(&view, true);
        }
        Commands::Users { page, limit, search, sort } => {
            let result = api.users(page, limit).await?;
            let stats = DirectoryStats::from_users(&result.users);
            let view = ListQuery::new(search, sort).apply(&result.users);

            println!(
                "Users: {}   Donations: ${}   Average: ${}   Top donor: {}",
                stats.total_users,
                stats.total_donations,
                stats.average_donations,
                stats.top_donor.as_ref().map_or("-", |u| u.name.as_str())
            );
            print_table(&view, false);
            let p = &result.pagination;
            println!(
                "\nPage {} of {} ({} users){}{}",
                p.current_page,
                p.total_pages,
                p.total_users,
                if p.has_prev { "  [prev]" } else { "" },
                if p.has_next { "  [next]" } else { "" },
            );
        }
    }

    sessions.logout();
    Ok(())
}

fn print_dashboard(user: &User) {
    println!("👤 {}", user.name);
    println!("💰 Total donations: ${}", user.total_donations);
    println!("🔗 Referral code:   {}", user.referral_code);
    println!("\n🏆 Rewards & Achievements");
    for (reward, unlocked) in reward_progress(user.total_donations) {
        let mark = if unlocked { "✓ UNLOCKED" } else { "" };
        println!("  {:<16} {:<18} {}", reward.title, reward.description, mark);
    }
}

fn print_table(users: &[User], ranked: bool) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    for (i, user) in users.iter().enumerate() {
        let joined = user
            .created_at
            .map(|at| at.format("%b %e, %Y").to_string())
            .unwrap_or_default();
        if ranked {
            println!(
                "{:>3}. {:<20} {:<20} ${:>8}",
                i + 1,
                user.name,
                user.referral_code,
                user.total_donations
            );
        } else {
            println!(
                "{:<20} {:<26} {:<20} ${:>8}  {}",
                user.name, user.email, user.referral_code, user.total_donations, joined
            );
        }
    }
}
