mod api;
mod chat;
mod common;
mod config;
mod error;
mod fare;
mod network;
mod routing;
mod storage;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use api::HttpTransport;
use chat::{ChatController, SessionStore};
use common::{ChatMessage, Coordinate, Identity, NotifierCommand, Role};
use config::AppConfig;
use error::{ClientError, Result};
use network::RealtimeNotifier;
use routing::RoutingClient;
use storage::IdentityStore;

#[derive(Parser)]
#[command(
    name = "trike-client",
    version,
    about = "Tricycle ride-hailing client core"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file for editing
    Init,
    /// Persist the signed-in identity used by the chat commands
    Login {
        user_id: String,
        #[arg(long, value_parser = parse_role)]
        role: Role,
    },
    /// Forget the signed-in identity
    Logout,
    /// Print the current session list once
    Sessions,
    /// Open a conversation with a counterpart
    Chat {
        counterpart_id: String,
        /// Ride correlation tag attached to outgoing messages
        #[arg(long)]
        booking: Option<i64>,
    },
    /// Distance and fare between two points given as lat,lng
    Route {
        #[arg(value_parser = parse_coordinate)]
        origin: Coordinate,
        #[arg(value_parser = parse_coordinate)]
        destination: Coordinate,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    // Khởi tạo Logger để debug
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);

    match cli.command {
        Command::Init => run_init(&cli.config, &app_config),
        Command::Login { user_id, role } => run_login(&app_config, user_id, role),
        Command::Logout => run_logout(&app_config),
        Command::Sessions => run_sessions(&app_config).await,
        Command::Chat {
            counterpart_id,
            booking,
        } => run_chat(&app_config, counterpart_id, booking).await,
        Command::Route {
            origin,
            destination,
        } => run_route(&app_config, origin, destination).await,
    }
}

fn open_identity_store(config: &AppConfig) -> Result<IdentityStore> {
    storage::ensure_data_dir(&config.db_path)?;
    Ok(IdentityStore::with_path(&config.db_path)?)
}

fn run_init(path: &str, config: &AppConfig) -> Result<()> {
    config::save_config(path, config)?;
    println!("Wrote config to {path}");
    Ok(())
}

fn run_login(config: &AppConfig, user_id: String, role: Role) -> Result<()> {
    let store = open_identity_store(config)?;
    let identity = Identity { user_id, role };
    store.save(&identity)?;
    println!("Signed in as {} ({})", identity.user_id, identity.role.as_str());
    Ok(())
}

fn run_logout(config: &AppConfig) -> Result<()> {
    let store = open_identity_store(config)?;
    store.clear()?;
    println!("Signed out");
    Ok(())
}

/// Load the cached identity, or tell the user how to get one.
fn require_identity(config: &AppConfig) -> Result<Option<Identity>> {
    let identity = open_identity_store(config)?.load()?;
    if identity.is_none() {
        println!("Not signed in. Run `trike-client login <user-id> --role <driver|passenger>` first.");
    }
    Ok(identity)
}

async fn run_sessions(config: &AppConfig) -> Result<()> {
    let Some(identity) = require_identity(config)? else {
        return Ok(());
    };

    let transport = HttpTransport::new(&config.api_base);
    let mut store = SessionStore::new(transport);
    store.refresh(&identity.user_id, identity.role).await;

    if store.sessions().is_empty() {
        println!("No conversations yet.");
        return Ok(());
    }
    for session in store.sessions() {
        let name = session.partner_name.as_deref().unwrap_or(&session.partner_id);
        println!(
            "[{}] {name}: {}",
            session.last_timestamp.format("%Y-%m-%d %H:%M"),
            session.last_message
        );
    }
    Ok(())
}

async fn run_chat(
    config: &AppConfig,
    counterpart_id: String,
    booking: Option<i64>,
) -> Result<()> {
    let Some(identity) = require_identity(config)? else {
        return Ok(());
    };

    let transport = HttpTransport::new(&config.api_base);
    let mut controller =
        ChatController::new(transport, identity.clone(), &counterpart_id, booking);

    // Kênh controller <-> realtime. The command sender stays alive for the
    // whole session; dropping it is what shuts the notifier down.
    let (command_tx, command_rx) = mpsc::channel(8);
    let (event_tx, mut event_rx) = mpsc::channel(32);
    let notifier = RealtimeNotifier::new(event_tx, command_rx, config.realtime_base());
    tokio::spawn(async move {
        if let Err(err) = notifier.run().await {
            log::warn!("Realtime notifier terminated: {err}");
        }
    });

    // Queued now, sent once the socket is up.
    let _ = command_tx
        .send(NotifierCommand::Subscribe {
            owner_id: identity.user_id.clone(),
            role: identity.role,
        })
        .await;

    let history = controller.start().await;
    println!(
        "Chatting with {}. Type a message and press enter, /quit to leave.",
        controller.counterpart_name()
    );
    for message in &history {
        print_message(&identity, message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut realtime_alive = true;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line == "/quit" {
                    break;
                }
                if line.is_empty() {
                    continue;
                }
                match controller.send(line).await {
                    Ok(history) => {
                        if let Some(last) = history.last() {
                            print_message(&identity, last);
                        }
                    }
                    Err(err) => eprintln!("Send failed: {err}"),
                }
            }
            event = event_rx.recv(), if realtime_alive => {
                match event {
                    Some(event) => {
                        controller.handle_event(event).await;
                        log::debug!("{} active sessions", controller.sessions().len());
                    }
                    None => {
                        realtime_alive = false;
                        log::warn!("Realtime channel gone; session list will no longer auto-refresh");
                    }
                }
            }
        }
    }
    Ok(())
}

async fn run_route(config: &AppConfig, origin: Coordinate, destination: Coordinate) -> Result<()> {
    let client = RoutingClient::new(&config.routing_base);
    match client.plan(origin, destination).await {
        Ok(plan) => {
            println!(
                "Distance: {:.2} km over {} points",
                plan.distance_meters / 1000.0,
                plan.geometry.len()
            );
            println!("Fare: {} pesos", plan.fare);
            Ok(())
        }
        // The one failure the user sees directly.
        Err(ClientError::NoRoute) => {
            println!("No route found between those points.");
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn print_message(identity: &Identity, message: &ChatMessage) {
    let who = if message.sender_id == identity.user_id {
        "You"
    } else {
        message.sender_role.fallback_label()
    };
    println!(
        "[{}] {who}: {}",
        message.created_at.format("%H:%M"),
        message.message
    );
}

fn parse_role(value: &str) -> std::result::Result<Role, String> {
    Role::parse(value).ok_or_else(|| format!("unknown role `{value}`, expected driver or passenger"))
}

fn parse_coordinate(value: &str) -> std::result::Result<Coordinate, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected lat,lng but got `{value}`"))?;
    let lat = lat.trim().parse::<f64>().map_err(|err| err.to_string())?;
    let lng = lng.trim().parse::<f64>().map_err(|err| err.to_string())?;
    Ok(Coordinate { lat, lng })
}
