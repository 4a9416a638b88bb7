use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use url::Url;

use tenantdesk_auth::Claims;
use tenantdesk_client::{App, ClientConfig, FileStorage, GuardOutcome, MemoryNavigator};

/// Headless front end for the tenant administration API.
#[derive(Parser, Debug)]
#[command(name = "tenantdesk", version)]
struct Cli {
    /// Overrides TENANTDESK_API_URL.
    #[arg(long, global = true)]
    api_url: Option<Url>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange credentials for a session.
    Login {
        /// Leave empty to log in without a tenant.
        #[arg(long, default_value = "")]
        tenant_id: String,

        #[arg(long)]
        login_id: String,

        #[arg(long, env = "TENANTDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Show the logged-in user.
    Whoami,

    /// End the session.
    Logout,

    /// GET an API path and print the JSON response.
    Get { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tenantdesk_observability::init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    let storage = FileStorage::default_location()?;
    let app = App::new(config, Arc::new(storage), Arc::new(MemoryNavigator::new()))?;
    let state = app.auth.initialize();

    let result = run(&app, cli.command, &state).await;

    if let Some(message) = app.session.flash().take() {
        eprintln!("{message}");
    }
    result
}

async fn run(app: &App, command: Command, state: &tenantdesk_client::AuthState) -> anyhow::Result<()> {
    match command {
        Command::Login {
            tenant_id,
            login_id,
            password,
        } => {
            if let GuardOutcome::Redirect(_) = app.guard.guest(state) {
                let user = state.user.as_ref().map(|u| u.login_id.as_str()).unwrap_or_default();
                bail!("already logged in as {user}; log out first");
            }
            let claims = app
                .auth
                .login(&tenant_id, &login_id, &password)
                .await
                .context("login failed")?;
            println!("logged in as {} <{}>", claims.name, claims.email);
        }
        Command::Whoami => {
            require_session(app, state)?;
            if let Some(user) = &state.user {
                print_profile(user);
            }
        }
        Command::Logout => {
            app.auth.logout();
            println!("logged out");
        }
        Command::Get { path } => {
            require_session(app, state)?;
            let body: serde_json::Value = app
                .api
                .get_json(&path)
                .await
                .with_context(|| format!("GET {path} failed"))?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }
    Ok(())
}

fn require_session(app: &App, state: &tenantdesk_client::AuthState) -> anyhow::Result<()> {
    match app.guard.protect(state) {
        GuardOutcome::Render => Ok(()),
        GuardOutcome::Redirect(_) => bail!("not logged in; run `tenantdesk login` first"),
        GuardOutcome::Loading => bail!("session check did not complete"),
    }
}

fn print_profile(user: &Claims) {
    println!("{} <{}>", user.name, user.email);
    println!("login:   {}", user.login_id);
    if let Some(tenant) = &user.tenant_name {
        println!("tenant:  {tenant}");
    }
    if let Some(role) = &user.role_name {
        println!("role:    {role}");
    }
    if !user.privileges.is_empty() {
        let privileges: Vec<&str> = user.privileges.iter().map(|p| p.as_str()).collect();
        println!("access:  {}", privileges.join(", "));
    }
    if let Some(expires) = user.expires_at() {
        println!("expires: {}", expires.to_rfc3339());
    }
}
