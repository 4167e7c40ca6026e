use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "repo-stats-cli")]
#[command(about = "Query a running repo-stats-proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the service is up
    Health,
    /// List contributors of a repository
    Contributors {
        owner: String,
        repo: String,
        /// Fetch every page, anonymous contributors included
        #[arg(long)]
        all: bool,
        /// Page size for the single-page listing
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Profile statistics
    Stats {
        /// Look up another user (server must allow it)
        #[arg(long)]
        user: Option<String>,
        /// Only the contribution calendar
        #[arg(long)]
        calendar: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Health => client.get(format!("{base}/health")),
        Commands::Contributors {
            owner,
            repo,
            all,
            per_page,
        } => {
            let path = if all {
                "/api/github-contributors/all"
            } else {
                "/api/github-contributors"
            };
            let mut query = vec![("owner", owner), ("repo", repo)];
            if let Some(n) = per_page {
                query.push(("per_page", n.to_string()));
            }
            client.get(format!("{base}{path}")).query(&query)
        }
        Commands::Stats { user, calendar } => {
            let path = if calendar {
                "/api/github-calendar"
            } else {
                "/api/github-data"
            };
            let request = client.get(format!("{base}{path}"));
            match user {
                Some(user) => request.query(&[("user", user)]),
                None => request,
            }
        }
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
