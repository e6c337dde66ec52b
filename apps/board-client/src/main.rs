//! # Board CLI
//!
//! Terminal client for the Board API.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use board_client::api::DEFAULT_BASE_URL;
use board_client::dashboard::{self, DashboardState};
use board_client::render::{
    render_dashboard, render_notice, render_prompt, render_status, render_user,
};
use board_client::routes::{View, navigate};
use board_client::{ApiClient, FileTokenStore, Session};

#[derive(Parser)]
#[command(name = "board")]
#[command(about = "Terminal client for the Board API", long_about = None)]
struct Cli {
    #[arg(long, env = "BOARD_API_URL", default_value = DEFAULT_BASE_URL, help = "API base URL")]
    api_url: String,

    #[arg(long, env = "BOARD_TOKEN_FILE", help = "Where to keep the session token")]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Create an account and sign in")]
    Register {
        username: String,
        email: String,
        #[arg(env = "BOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Sign in")]
    Login {
        email: String,
        #[arg(env = "BOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Sign out and forget the saved token")]
    Logout,

    #[command(about = "Show the signed-in account")]
    Whoami,

    #[command(about = "Show stats, recent posts and users")]
    Dashboard,

    #[command(about = "Publish a post")]
    Post {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
    },

    #[command(about = "Check that the API is up and which version it runs")]
    Status,

    #[command(about = "Open a client route such as /dashboard")]
    Open {
        #[arg(default_value = "/")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = match cli.token_file {
        Some(path) => FileTokenStore::new(path),
        None => FileTokenStore::default_location()
            .context("no config directory found; pass --token-file")?,
    };
    let api = ApiClient::new(&cli.api_url)?;
    let mut session = Session::new(api, store);
    session.restore().await?;

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => {
            let user = session.register(&username, &email, &password).await?;
            println!("Welcome, {}!", user.username);
        }
        Commands::Login { email, password } => {
            let user = session.login(&email, &password).await?;
            println!("Welcome, {}!", user.username);
        }
        Commands::Logout => {
            session.logout()?;
            println!("Signed out.");
        }
        Commands::Whoami => match session.user() {
            Some(user) => println!("{}", render_user(user)),
            None if session.is_authenticated() => println!("Signed in (server unreachable)"),
            None => println!("Not signed in."),
        },
        Commands::Dashboard => show(&session, View::Dashboard).await,
        Commands::Post { title, content } => {
            if !session.is_authenticated() {
                println!("{}", render_prompt(View::Login));
                return Ok(());
            }
            let (notice, refreshed) =
                dashboard::submit_post(session.api(), &title, &content).await;
            println!("{}", render_notice(&notice));
            if let Some(state) = refreshed {
                println!("\n{}", render_dashboard(&state, session.user()));
            }
        }
        Commands::Status => {
            let api = session.api();
            let (health, version) = futures::join!(api.health(), api.version());
            println!("{}", render_status(&health, &version));
        }
        Commands::Open { path } => {
            let view = navigate(&path, session.is_authenticated());
            show(&session, view).await;
        }
    }

    Ok(())
}

async fn show(session: &Session<FileTokenStore>, requested: View) {
    let view = match requested {
        View::Dashboard if !session.is_authenticated() => View::Login,
        other => other,
    };

    match view {
        View::Dashboard => {
            println!(
                "{}",
                render_dashboard(&DashboardState::Loading, session.user())
            );
            let state = dashboard::load(session.api()).await;
            println!("{}", render_dashboard(&state, session.user()));
        }
        other => println!("{}", render_prompt(other)),
    }
}
