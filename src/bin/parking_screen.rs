use clap::{Parser, Subcommand};
use parking_api::adapters::client::DEFAULT_API_URL;
use parking_api::utils::logger;
use parking_api::{ParkingClient, ParkingScreen};

#[derive(Parser)]
#[command(name = "parking-screen")]
#[command(about = "Terminal screen for the parking lot API")]
struct Args {
    /// Base URL of the parking API
    #[arg(long, env = "PARKING_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the slot grid
    Slots,
    /// Park a vehicle in the lowest free slot
    Park { vehicle_number: String },
    /// Unpark a vehicle and show the fee
    Unpark { vehicle_number: String },
    /// Toggle maintenance on a slot
    Toggle { slot_number: u32 },
    /// Show lot statistics
    Stats,
    /// List parked vehicles
    Status,
    /// List completed sessions and their fees
    History,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let client = match ParkingClient::new(&args.api_url) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    tracing::debug!("Using parking API at {}", client.base_url());

    let mut screen = ParkingScreen::new(client);

    let result = match args.command.unwrap_or(Command::Slots) {
        Command::Slots => screen.refresh_slots().await,
        Command::Park { vehicle_number } => screen.park(&vehicle_number).await,
        Command::Unpark { vehicle_number } => screen.unpark(&vehicle_number).await,
        Command::Toggle { slot_number } => screen.press_slot(slot_number).await,
        Command::Stats => screen.show_statistics().await,
        Command::Status => screen.show_status().await,
        Command::History => screen.show_history().await,
    };

    if screen.slots().is_empty() {
        // 盡量顯示車位，失敗也不影響結果
        if let Err(e) = screen.refresh_slots().await {
            tracing::debug!("Could not refresh slots for the grid: {}", e);
        }
    }

    println!("{}", screen.render());

    if let Err(e) = result {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());
        std::process::exit(2);
    }

    Ok(())
}
