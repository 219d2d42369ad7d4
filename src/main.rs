use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info};

mod api;
mod config;
mod console;
mod error;
mod form;
mod logging;
mod messages;
mod models;
mod pages;
mod routes;
mod search;
mod session;
#[cfg(test)]
mod test_support;
mod ui;

use api::{HttpRegistry, RegistryApi};
use config::ConsoleConfig;
use console::{login_interactive, Console, Prompt, ShellExit};
use error::ConsoleError;
use pages::{DashboardPage, LoginPage, PublicPage};
use routes::{guard, GuardDecision, History, Route};
use session::{FileTokenStorage, MemoryTokenStorage, SessionStore, TokenStorage};
use ui::{render_detail, render_header, render_loading, render_table, Theme};

/// Terminal console for the scammer registry
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Registry server root (overrides REGISTRY_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory for the saved session (overrides STATE_PATH)
    #[arg(long, global = true)]
    state_path: Option<PathBuf>,

    /// Output style: plain or boxed (overrides CONSOLE_THEME)
    #[arg(long, global = true)]
    theme: Option<Theme>,

    /// Keep the session in memory only (dashboard without a saved login)
    #[arg(long, global = true)]
    no_persist: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the public registry
    List {
        /// Only records whose Discord ID or name contains this
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one public record by row number, id or Discord ID
    Show { id: String },
    /// Show the registry counters
    Stats,
    /// Log in as an administrator
    Login {
        #[arg(long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// End the saved session
    Logout,
    /// Create an administrator account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Show who is logged in
    Whoami,
    /// Open the interactive admin dashboard
    Dashboard,
    /// Add a record (prompts for the fields)
    Add,
    /// Edit a record (prompts for the fields)
    Edit { id: String },
    /// Delete a record
    Delete {
        id: String,
        /// Skip the confirmation question
        #[arg(long)]
        yes: bool,
    },
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    }
}

fn stdin_prompt() -> Prompt<BufReader<tokio::io::Stdin>> {
    Prompt::new(BufReader::new(tokio::io::stdin()))
}

async fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    stdin_prompt()
        .ask(&mut std::io::stdout(), "Password: ")
        .await?
        .ok_or_else(|| anyhow!("No password given"))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args = Args::parse();

    let log_buffer = logging::init(log_level(args.verbose));

    let mut config = ConsoleConfig::from_env()?;
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(path) = args.state_path {
        config.state_path = path;
    }
    if let Some(theme) = args.theme {
        config.theme = theme;
    }
    debug!("Using config {:?}", config);

    let registry = HttpRegistry::new(&config.api_url)
        .with_context(|| format!("Cannot use registry at {}", config.api_url))?;
    debug!("Registry API at {}", registry.base_url());
    let api: Arc<dyn RegistryApi> = Arc::new(registry);
    let theme = config.theme;
    let mut out = std::io::stdout();

    // Public views need no session
    match &args.command {
        Command::List { search } => {
            let mut page = PublicPage::new(api, config.list_limit);
            page.load().await?;
            if let Some(term) = search {
                page.search(term);
            }
            println!(
                "{}",
                render_header("Scammer Registry", "Known scammers on Discord", page.stats(), theme)
            );
            println!("{}", render_table(page.visible(), theme));
            return Ok(());
        }
        Command::Show { id } => {
            let mut page = PublicPage::new(api, config.list_limit);
            page.load().await?;
            let entry = page
                .find(id)
                .ok_or_else(|| ConsoleError::EntryNotFound { id: id.clone() })?;
            println!("{}", render_detail(entry, theme));
            return Ok(());
        }
        Command::Stats => {
            let stats = api.statistics().await?;
            println!(
                "{}",
                render_header("Scammer Registry", "Registry counters", Some(&stats), theme)
            );
            return Ok(());
        }
        _ => {}
    }

    let storage: Box<dyn TokenStorage> = if args.no_persist {
        Box::new(MemoryTokenStorage::new())
    } else {
        Box::new(FileTokenStorage::new(config.session_file()))
    };
    let session = Arc::new(SessionStore::new(api.clone(), storage));
    if session.is_loading() {
        eprintln!("{}", render_loading("Checking session"));
    }
    session.initialize().await;

    match args.command {
        Command::Login { username, password } => {
            let mut page = LoginPage::new(session.clone());
            if page.redirect_if_authenticated().is_some() {
                if let Some(user) = session.user() {
                    println!("Already logged in as {}.", user.username);
                }
                return Ok(());
            }
            let password = read_password(password).await?;
            match page.submit(&username, &password).await {
                Some((_, user)) => println!("{}", messages::welcome_message(&user)),
                None => bail!("{}", page.error().unwrap_or("Login failed")),
            }
        }
        Command::Logout => {
            session.logout();
            println!("Logged out.");
        }
        Command::Register { username, password } => {
            let password = read_password(password).await?;
            match session.register(&username, &password).await {
                session::AuthOutcome::Success(user) => {
                    println!("{}", messages::registered_message(&user))
                }
                session::AuthOutcome::Failure { message } => bail!("{}", message),
            }
        }
        Command::Whoami => {
            let Some(user) = session.user() else {
                bail!("Not logged in");
            };
            println!("{} ({:?}, id {})", user.username, user.role, user.id);
            if let Some(claims) = session.claims() {
                if let Some(expires) = claims.expires_at() {
                    let verb = if claims.is_expired_at(chrono::Utc::now()) {
                        "expired"
                    } else {
                        "expires"
                    };
                    println!("Session {} {}", verb, expires.format("%d.%m.%Y %H:%M UTC"));
                }
            }
        }
        Command::Dashboard => {
            let mut history = History::new(Route::AdminDashboard);
            let mut prompt = stdin_prompt();

            let decision = guard(history.current(), &session.state());
            history.apply(&decision);
            if history.current() == Route::AdminLogin {
                info!("No valid session, redirecting to {}", Route::AdminLogin);
                println!("Log in to open the dashboard.");
                let mut login = LoginPage::new(session.clone());
                if login_interactive(&mut prompt, &mut out, &mut login)
                    .await?
                    .is_none()
                {
                    bail!("Login failed");
                }
                history.push(Route::AdminDashboard);
            }
            debug!("Navigated to {} ({} history entries)", history.current(), history.len());

            let page = DashboardPage::new(api, session.clone(), config.list_limit);
            let mut console = Console::new(prompt, &mut out, page, theme).with_logs(log_buffer);
            match console.run().await? {
                ShellExit::Quit | ShellExit::LoggedOut => {}
                ShellExit::LoginRequired | ShellExit::Failed => {
                    bail!("Redirected to {}", Route::AdminLogin)
                }
            }
        }
        Command::Add => {
            run_admin_command(api, session, &config, "add", "", false).await?;
        }
        Command::Edit { id } => {
            run_admin_command(api, session, &config, "edit", &id, false).await?;
        }
        Command::Delete { id, yes } => {
            run_admin_command(api, session, &config, "delete", &id, yes).await?;
        }
        Command::List { .. } | Command::Show { .. } | Command::Stats => {}
    }

    Ok(())
}

/// One dashboard action outside the shell. Non-zero exit when the session
/// is missing or rejected, or when the action failed.
async fn run_admin_command(
    api: Arc<dyn RegistryApi>,
    session: Arc<SessionStore>,
    config: &ConsoleConfig,
    command: &str,
    arg: &str,
    assume_yes: bool,
) -> Result<()> {
    if let GuardDecision::Redirect { to, .. } = guard(Route::AdminDashboard, &session.state()) {
        bail!("{}\nRedirected to {}", messages::login_required_message(), to);
    }

    let page = DashboardPage::new(api, session, config.list_limit);
    let mut console = Console::new(stdin_prompt(), std::io::stdout(), page, config.theme);
    if assume_yes {
        console = console.assume_yes();
    }

    match console.run_command(command, arg).await? {
        ShellExit::Quit | ShellExit::LoggedOut => Ok(()),
        ShellExit::LoginRequired => bail!("Redirected to {}", Route::AdminLogin),
        ShellExit::Failed => bail!("{} failed", command),
    }
}
