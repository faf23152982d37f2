use std::sync::Arc;

use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use sinkdestroy::ui::{parse_target, render_own_board, render_target_board};
use sinkdestroy::{
    init_logging, random_fleet, validate_fleet, ClientConfig, Controller, GameApi, HttpClient,
    Notice, Phase, Placement, Session, DEFAULT_HOST, DEFAULT_PORT, NUM_SHIPS,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, global = true, default_value = DEFAULT_HOST)]
    host: String,
    #[arg(long, global = true, default_value_t = DEFAULT_PORT)]
    port: u16,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct FleetArgs {
    /// Ship as TYPE,X,Y,ORIENTATION, e.g. Carrier,0,0,horizontal. Repeat for each ship.
    #[arg(long = "ship")]
    ships: Vec<Placement>,
    /// Place the whole fleet at random instead.
    #[arg(long, conflicts_with = "ships")]
    random: bool,
    #[arg(long, help = "Fix RNG seed for reproducible placement (e.g., --seed 12345)")]
    seed: Option<u64>,
}

impl FleetArgs {
    fn fleet(&self) -> Vec<Placement> {
        if !self.random {
            return self.ships.clone();
        }
        let mut rng = match self.seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => {
                let mut seed_rng = rand::rng();
                SmallRng::from_rng(&mut seed_rng)
            }
        };
        random_fleet(&mut rng)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the game server is reachable and answering.
    Ping,
    /// Validate a fleet without contacting the server.
    Check {
        #[command(flatten)]
        fleet: FleetArgs,
    },
    /// Join a game and play it from the terminal.
    Play {
        #[arg(long)]
        player: String,
        #[arg(long)]
        game_key: String,
        #[command(flatten)]
        fleet: FleetArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = ClientConfig::new(cli.host, cli.port);

    match cli.command {
        Commands::Ping => {
            let client = HttpClient::new(&config)?;
            println!("{}", client.connection_details().await);
            match client.ping().await {
                Ok(true) => println!("Game server is responding"),
                Ok(false) => println!("Warning: Game server answered ping with false"),
                Err(e) => println!("Warning: Game server not responding: {}", e),
            }
        }
        Commands::Check { fleet } => {
            let fleet = fleet.fleet();
            validate_fleet(&fleet)?;
            for placement in &fleet {
                println!("{}", placement);
            }
            let preview = Session {
                fleet,
                ..Session::default()
            };
            print!("{}", render_own_board(&preview));
            println!("Fleet is valid");
        }
        Commands::Play {
            player,
            game_key,
            fleet,
        } => {
            let client = HttpClient::new(&config)?;
            if let Err(e) = client.probe().await {
                return Err(anyhow::anyhow!(
                    "Server connection failed ({}:{}): {}",
                    config.host,
                    config.port,
                    e
                ));
            }
            let controller = Controller::new(Arc::new(client), &config);
            controller.join_game(&player, &game_key, &fleet.fleet())?;
            let result = play(&controller).await;
            controller.shutdown();
            result?;
        }
    }
    Ok(())
}

async fn play(controller: &Controller) -> anyhow::Result<()> {
    let mut updates = controller.subscribe();
    let mut notices = controller.notices();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_status = String::new();

    loop {
        let snapshot = updates.borrow_and_update().clone();
        if snapshot.status != last_status {
            println!("{}", snapshot.status);
            last_status = snapshot.status.clone();
        }
        let session = &snapshot.session;

        match session.phase {
            Phase::Setup => return Err(anyhow::anyhow!("Could not join the game")),
            Phase::Finished => {
                print_boards(session);
                print_outcome(session);
                return Ok(());
            }
            _ => {}
        }

        if session.can_fire() {
            print_boards(session);
            println!("Your turn - enter target as x,y:");
            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            match parse_target(&line) {
                Ok(cell) => {
                    if let Err(e) = controller.fire(cell.x, cell.y).await {
                        println!("{}", e);
                    }
                }
                Err(e) => println!("{}", e),
            }
            continue;
        }

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            notice = notices.recv() => match notice {
                Ok(Notice::Error(msg)) => eprintln!("! {}", msg),
                Ok(Notice::Fatal(msg)) => eprintln!("!! {}", msg),
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => return Ok(()),
            },
        }
    }
}

fn print_boards(session: &Session) {
    println!();
    print!("{}", render_own_board(session));
    println!();
    print!("{}", render_target_board(session));
}

fn print_outcome(session: &Session) {
    if session.sunk_enemy_ships.len() >= NUM_SHIPS {
        println!("\nVICTORY! You have sunk all enemy ships!");
    } else if !session.fleet.is_empty() && session.sunk_own_ships().len() == session.fleet.len() {
        println!("\nDEFEAT. All your ships have been destroyed.");
    } else {
        println!("\nGame over.");
    }
}
