
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use clinic_auth::api::{HttpAuthApi, RegisterRequest};
use clinic_auth::claims::decode_claims;
use clinic_auth::error::{AuthError, ConfigError, StorageError};
use clinic_auth::guard::GuardDecision;
use clinic_auth::http::AuthorizedHttp;
use clinic_auth::{AuthClient, ClientConfig, FileStore, RouteTable, TokenStore};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("token storage unavailable: {0}")]
    Storage(#[from] StorageError),
    #[error("{message} ({source})")]
    Auth { message: String, source: AuthError },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl From<AuthError> for CliError {
    fn from(source: AuthError) -> Self {
        Self::Auth { message: source.user_message(), source }
    }
}

#[derive(Parser, Debug)]
#[command(name = "clinic-auth", about = "Clinic session and route-authorization CLI")]
struct Cli {
    /// Overrides `CLINIC_API_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Overrides `CLINIC_STORAGE_PATH`.
    #[arg(long)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the bearer token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
        password: String,
        /// URL the guard originally redirected from.
        #[arg(long)]
        return_url: Option<String>,
    },
    /// Create an account.
    Register(RegisterArgs),
    /// Forget the stored token.
    Logout,
    /// Show the stored session.
    Whoami,
    /// Evaluate the route guard for a URL.
    Check { url: String },
    /// Authorized GET against an API path, printing the JSON body.
    Get { path: String },
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    nom: String,
    #[arg(long)]
    prenom: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "CLINIC_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long)]
    age: u32,
    #[arg(long)]
    telephone: String,
    #[arg(long)]
    adresse: String,
}

impl From<RegisterArgs> for RegisterRequest {
    fn from(args: RegisterArgs) -> Self {
        Self {
            nom: args.nom,
            prenom: args.prenom,
            email: args.email,
            mot_de_passe: args.password,
            age: args.age,
            telephone: args.telephone,
            adresse: args.adresse,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base) = cli.base_url.as_deref() {
        config = config.with_base_url(base)?;
    }
    if let Some(path) = cli.storage {
        config.storage_path = path;
    }

    let storage = Arc::new(FileStore::open(&config.storage_path)?);
    let tokens = TokenStore::new(storage);
    let api = Arc::new(HttpAuthApi::new(&config)?);
    let auth = AuthClient::new(api, tokens, Arc::new(RouteTable::clinic()));
    auth.expire_if_stale(now_unix());

    match cli.command {
        Command::Login { email, password, return_url } => {
            auth.login(&email, &password).await?;
            println!("{}", auth.post_login_route(return_url.as_deref()));
        }
        Command::Register(args) => {
            let route = auth.register(&args.into()).await?;
            println!("{route}");
        }
        Command::Logout => {
            auth.logout();
            println!("logged out");
        }
        Command::Whoami => print_json(&whoami(&auth))?,
        Command::Check { url } => {
            let decision = auth.guard().check_url(&url);
            print_json(&decision_json(&url, &decision))?;
        }
        Command::Get { path } => {
            let http = AuthorizedHttp::new(config, auth)?;
            let body = http.get_json(&path).await?;
            print_json(&body)?;
        }
    }
    Ok(())
}

fn whoami(auth: &AuthClient) -> Value {
    let Some(token) = auth.tokens().read() else {
        return json!({ "authenticated": false });
    };
    let claims = decode_claims(&token).ok();
    json!({
        "authenticated": true,
        "role": auth.current_role().map(|r| r.to_string()),
        "roles": auth.tokens().read_roles(),
        "subject": claims.as_ref().and_then(|c| c.subject.clone()),
        "subject_id": claims.as_ref().and_then(|c| c.subject_id),
        "expires_at": claims.as_ref().and_then(|c| c.expires_at),
        "landing": auth.landing_route(),
    })
}

fn decision_json(url: &str, decision: &GuardDecision) -> Value {
    let outcome = match decision {
        GuardDecision::Allow => "allow",
        GuardDecision::RedirectToLogin { .. } => "login",
        GuardDecision::RedirectToUnauthorized => "unauthorized",
    };
    json!({ "url": url, "decision": outcome, "redirect": decision.redirect_target() })
}

fn print_json(value: &Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
