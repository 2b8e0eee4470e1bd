//! eventdesk CLI: roster lookups and scripted workflow replays.

use clap::{Parser, Subcommand};
use eventdesk::config::Config;
use eventdesk::directory::UserDirectory;
use eventdesk::engine::Engine;
use eventdesk::script::{Script, ScriptRunner};
use eventdesk::telemetry::{TelemetryConfig, init_telemetry};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eventdesk", about = "Approval tracking for event planning")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the user roster
    Users,
    /// Check credentials and show the matching user
    Login { username: String, password: String },
    /// Replay a JSON workflow script against a fresh engine
    Replay {
        /// Path to the script
        script: PathBuf,
        /// Print this role's or member's dashboard afterwards
        #[arg(long)]
        dashboard: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let guard = init_telemetry(TelemetryConfig::from_config(&config))?;

    let result = match cli.command {
        Command::Users => cmd_users(&config),
        Command::Login { username, password } => cmd_login(&config, &username, &password),
        Command::Replay { script, dashboard } => cmd_replay(script, dashboard),
    };

    guard.force_flush();
    result
}

fn cmd_users(config: &Config) -> anyhow::Result<()> {
    let directory = UserDirectory::load(config.users_file.as_deref())?;
    println!("{:<4} {:<12} {:<5} NAME", "ID", "USERNAME", "ROLE");
    for user in directory.users() {
        println!(
            "{:<4} {:<12} {:<5} {}",
            user.id,
            user.username,
            user.role.code(),
            user.name
        );
    }
    Ok(())
}

fn cmd_login(config: &Config, username: &str, password: &str) -> anyhow::Result<()> {
    let directory = UserDirectory::load(config.users_file.as_deref())?;
    match directory.authenticate(username, password) {
        Some(user) => {
            println!("{}", serde_json::to_string_pretty(&user)?);
            Ok(())
        }
        None => anyhow::bail!("invalid username or password"),
    }
}

fn cmd_replay(path: PathBuf, dashboard: Option<String>) -> anyhow::Result<()> {
    let script = Script::load(&path)
        .map_err(|e| anyhow::anyhow!("cannot load script {}: {e}", path.display()))?;

    let mut engine = Engine::in_memory();
    let reports = ScriptRunner::new(&mut engine).run(script)?;
    for report in &reports {
        println!("{report}");
    }

    if let Some(identifier) = dashboard {
        let board = engine.dashboard(&identifier);
        println!();
        if board.is_empty() {
            println!("nothing awaiting action for {identifier}");
        } else {
            println!("{}", serde_json::to_string_pretty(&board)?);
        }
    }
    Ok(())
}
