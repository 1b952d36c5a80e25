use catgen::prelude::*;
use clap::{Parser, Subcommand};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "catgen")]
#[command(about = "Fetch random cat images from the command line", long_about = None)]
pub struct Cli {
    #[arg(long, env = "CAT_API_KEY", hide_env_values = true, global = true)]
    pub cat_api_key: Option<String>,

    #[arg(long, env = "CAT_API_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub cat_api_base_url: String,

    #[arg(long, env = "CAT_API_TIMEOUT_SECS", global = true)]
    pub upstream_timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch one random image and print its record as JSON.
    Generate {
        #[arg(short, long, help = "Title to use instead of a random one")]
        title: Option<String>,
    },
    /// Print the candidate titles.
    Titles,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { title } => {
            let mut api = CatApi::new(cli.cat_api_key).with_base_url(&cli.cat_api_base_url);
            if let Some(secs) = cli.upstream_timeout_secs {
                api = api.with_timeout(Duration::from_secs(secs))?;
            }
            let store = Store::new();

            let cmd = match title {
                Some(t) => GenerateCatImageCommand::new().with_title(&t),
                None => GenerateCatImageCommand::new(),
            };

            let image = cmd.execute(&api, &store).await?;

            println!("{}", serde_json::to_string_pretty(&image)?);
        }
        Commands::Titles => {
            for title in TITLES {
                println!("{title}");
            }
        }
    }

    Ok(())
}
