use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use eatr::screen::{AddMealScreen, InputMode};
use eatr::state::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up one or more barcodes and print their nutrients.
    Lookup {
        #[arg(required = true)]
        barcode: Vec<String>,

        /// Also print values for a serving of this many grams.
        #[arg(long)]
        grams: Option<String>,
    },
    /// Log in and record a meal.
    Add {
        barcode: String,

        #[arg(long)]
        grams: String,

        #[arg(long)]
        username: String,

        #[arg(long)]
        password: String,
    },
    /// Camera scan, falling back to barcodes typed on stdin.
    Scan,
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "eatr=debug".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn print_product(screen: &AddMealScreen) {
    let Some(product) = screen.product() else {
        return;
    };
    let record = &product.record;
    println!("{} [{}]", record.display_name(), product.barcode);
    if let Some(brand) = &record.brand {
        println!("  brand: {}", brand);
    }
    for row in screen.nutrient_rows() {
        match row.per_serving {
            Some(serving) => println!("  {:<40} {:>10.2} {:>10.2}", row.label, row.per_100g, serving),
            None => println!("  {:<40} {:>10.2}", row.label, row.per_100g),
        }
    }
    if let Some(kcal) = screen.serving_calories() {
        println!("  serving calories: {}", kcal);
    }
}

async fn lookup(state: &AppState, barcodes: Vec<String>, grams: Option<String>) -> anyhow::Result<()> {
    let mut screen = AddMealScreen::open(state, 0).await;
    if screen.mode() == InputMode::Camera {
        screen.toggle_mode().await;
    }
    if let Some(grams) = grams {
        screen.set_serving(grams);
    }
    for raw in barcodes {
        match screen.submit_manual(&raw).await {
            Ok(()) => print_product(&screen),
            Err(e) => eprintln!("{}: {}", raw, e.user_message()),
        }
    }
    screen.close();
    Ok(())
}

async fn add(state: &AppState, barcode: String, grams: String, username: String, password: String) -> anyhow::Result<()> {
    let user = state.backend.login(&username, &password).await?;

    let mut screen = AddMealScreen::open(state, user.user_id).await;
    screen.toggle_mode().await;
    screen.submit_manual(&barcode).await?;
    screen.set_serving(grams);
    let calories = screen.serving_calories();
    let meal_id = screen.submit_meal().await?;
    println!(
        "added meal{} ({} kcal)",
        meal_id.map(|id| format!(" #{}", id)).unwrap_or_default(),
        calories.unwrap_or_default()
    );
    screen.close();
    Ok(())
}

async fn scan(state: &AppState) -> anyhow::Result<()> {
    let mut screen = AddMealScreen::open(state, 0).await;

    if screen.is_scanning() {
        if screen.scan_until_resolved().await {
            print_product(&screen);
            screen.close();
            return Ok(());
        }
    } else if let Some(err) = screen.error() {
        eprintln!("{}", err);
    }

    if screen.mode() == InputMode::Camera {
        screen.toggle_mode().await;
    }
    eprintln!("enter a barcode per line (ctrl-d to quit)");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match screen.submit_manual(&line).await {
            Ok(()) => print_product(&screen),
            Err(e) => eprintln!("{}", e.user_message()),
        }
    }
    screen.close();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Args::parse();
    let state = AppState::init()?;

    match args.command {
        Command::Lookup { barcode, grams } => lookup(&state, barcode, grams).await,
        Command::Add {
            barcode,
            grams,
            username,
            password,
        } => add(&state, barcode, grams, username, password).await,
        Command::Scan => scan(&state).await,
    }
}
