use anyhow::Result;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use tokio::io::AsyncBufReadExt;
use tracing::info;

use controller_core::{ControllerClient, WebSocketConnector};
use coordination::SessionOptions;
use shared::domain::{ClientIdentity, Role};

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long)]
    channel: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long, value_enum, default_value_t = RoleArg::Navigator)]
    role: RoleArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoleArg {
    Host,
    Navigator,
    Selector,
    Inspector,
}

impl From<RoleArg> for Role {
    fn from(value: RoleArg) -> Self {
        match value {
            RoleArg::Host => Role::Host,
            RoleArg::Navigator => Role::Navigator,
            RoleArg::Selector => Role::Selector,
            RoleArg::Inspector => Role::Inspector,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(v) = args.service_url {
        settings.service_url = v;
    }
    if let Some(v) = args.channel {
        settings.channel = v;
    }
    if let Some(v) = args.name {
        settings.display_name = v;
    }

    let identity = ClientIdentity::new(args.role.into(), settings.display_name.clone(), Utc::now());
    info!(client_id = ?identity.client_id, role = ?identity.role, "starting controller");

    let client = ControllerClient::new(identity, settings.tuning.clone());
    let mut events = client.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(?event, "engine event");
        }
    });

    client
        .connect(
            &WebSocketConnector,
            SessionOptions {
                service_url: settings.service_url.clone(),
                channel: settings.channel.clone(),
            },
        )
        .await?;
    info!(channel = %settings.channel, "announced on coordination channel");

    // Lines typed here run through the command parser; anything that is not
    // a recognized command becomes the literal search query.
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == "/quit" {
            break;
        }
        match client.submit_text(text).await {
            Some(command) => println!("command: {command:?}"),
            None => println!("searching for {text:?}"),
        }
    }

    Ok(())
}
