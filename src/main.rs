use clap::Parser;
use partnerhub::db::Db;
use partnerhub::services::auth::AuthService;
use partnerhub::services::certificate::CertificateService;
use partnerhub::services::progress::ProgressService;
use partnerhub::storage::DiskStore;
use partnerhub::AppState;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Postgres connection string.
    #[clap(env)]
    database_url: String,

    /// The address to bind to.
    #[arg(short, long, env = "BIND_ADDRESS", default_value = "127.0.0.1:8080")]
    address: String,

    /// Directory that stores uploaded media, served under /media.
    #[arg(long, env, default_value = "data")]
    data_dir: String,

    /// Set the Secure attribute on session cookies. Enable behind TLS.
    #[arg(long, env, default_value_t = false)]
    secure_cookies: bool,

    /// Email for the bootstrap admin account.
    #[arg(long, env)]
    admin_email: Option<String>,

    /// Password for the bootstrap admin account.
    #[arg(long, env)]
    admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,tower_http=debug,partnerhub=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(&args.database_url).await?;

    if let (Some(email), Some(password)) = (&args.admin_email, &args.admin_password) {
        db.ensure_admin_user(email, password).await?;
    }

    let state = AppState {
        auth: AuthService::new(db.clone()),
        progress: ProgressService::new(db.clone(), CertificateService::new(db.clone())),
        storage: DiskStore::new(args.data_dir),
        secure_cookies: args.secure_cookies,
        db,
    };

    let router = partnerhub::router(state);

    let listener = tokio::net::TcpListener::bind(&args.address).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;

    Ok(())
}
