use clap::Parser;
use tracing_subscriber::EnvFilter;

use hedex_reports::credentials::{load_login_credentials, save_login_credentials};
use hedex_reports::types::{Credentials, FetchOptions, Report, ReportRequest};
use hedex_reports::{fetch_report, login};

#[derive(Parser)]
#[command(name = "hedex-reports")]
#[command(about = "Pull HEdex retention engagement reports from a Sakai server", long_about = None)]
struct Cli {
    /// Base URL of the Sakai server, e.g. http://sakai.example.edu:8880
    #[arg(long)]
    server_url: String,

    /// RequestingAgent identifier the API requires for attribution
    #[arg(long)]
    agent: String,

    /// Earliest date of interest, YYYY-MM-DD
    #[arg(long)]
    start_date: String,

    #[arg(long, requires = "password")]
    username: Option<String>,

    #[arg(long, requires = "username")]
    password: Option<String>,

    /// Named keychain profile to load credentials from
    #[arg(long, conflicts_with_all = ["username", "password"])]
    profile: Option<String>,

    /// Store --username/--password under this profile name and exit
    #[arg(long, requires = "username")]
    save_profile: Option<String>,

    /// Reports to pull; defaults to all known reports
    #[arg(long = "report", value_enum)]
    reports: Vec<Report>,

    /// Academic terms to filter by
    #[arg(long = "term")]
    terms: Vec<String>,

    /// Only return records changed since the last run
    #[arg(long)]
    send_changes_only: Option<bool>,

    /// Date of the previous pull, YYYY-MM-DD
    #[arg(long)]
    last_run_date: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout_seconds: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let credentials = match (&cli.username, &cli.password, &cli.profile) {
        (Some(username), Some(password), _) => Credentials {
            username: username.clone(),
            password: password.clone(),
        },
        (_, _, Some(profile)) => load_login_credentials(profile)?,
        _ => return Err("supply --username/--password or --profile".into()),
    };

    if let Some(ref profile) = cli.save_profile {
        save_login_credentials(profile, &credentials)?;
        println!("Saved login profile '{}'", profile);
        return Ok(());
    }

    let session_id = login(
        &cli.server_url,
        &credentials.username,
        &credentials.password,
        cli.timeout_seconds,
    )
    .await?;

    let reports = if cli.reports.is_empty() {
        Report::ALL.to_vec()
    } else {
        cli.reports.clone()
    };

    let options = FetchOptions {
        terms: cli.terms.clone(),
        send_changes_only: cli.send_changes_only,
        last_run_date: cli.last_run_date.clone(),
    };

    for report in reports {
        let request = ReportRequest {
            report,
            agent: cli.agent.clone(),
            start_date: cli.start_date.clone(),
            options: options.clone(),
        };

        println!("\nGetting {} ...", report.wire_name());
        let payload = fetch_report(&cli.server_url, &session_id, &request, cli.timeout_seconds).await?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }

    Ok(())
}
