use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::path::PathBuf;
use tarot_core::config::settings_path_in;
use tarot_core::*;

#[derive(Parser)]
#[command(name = "tarot")]
#[command(about = "Tarot readings with a daily card and reading history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a spread and record it
    Draw {
        /// Spread to draw (daily-guidance, past-present-future, relationship,
        /// situation-action-outcome)
        #[arg(long, default_value = "daily-guidance")]
        spread: String,

        /// Question to ask the cards
        #[arg(long, short)]
        question: Option<String>,

        /// Print the interpretation request body as JSON instead of the reading
        #[arg(long)]
        payload: bool,

        /// Seed the shuffle (for reproducible draws)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show today's card if one was drawn today
    Today,

    /// List past readings, newest first
    History {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,

        /// Write the full history to a CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// List the available spreads
    Spreads,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tarot_core::logging::init_with_verbosity(cli.verbose);

    let errors = default_catalog().validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let settings = JsonSettingsFile::new(settings_path_in(&data_dir));
    tracing::debug!("Using settings file {:?}", settings.path());

    match cli.command {
        Some(Commands::Draw {
            spread,
            question,
            payload,
            seed,
        }) => cmd_draw(&settings, &config, &spread, question, payload, seed),
        Some(Commands::Today) => cmd_today(&settings),
        Some(Commands::History { limit, export }) => cmd_history(&settings, limit, export),
        Some(Commands::Spreads) => {
            cmd_spreads();
            Ok(())
        }
        None => {
            // Default: show today's card, drawing it first if needed
            if DailyCardStore::new(&settings)
                .read_today_card(default_catalog())
                .is_some()
            {
                cmd_today(&settings)
            } else {
                cmd_draw(&settings, &config, "daily-guidance", None, false, None)
            }
        }
    }
}

fn cmd_draw(
    settings: &JsonSettingsFile,
    config: &Config,
    spread: &str,
    question: Option<String>,
    payload: bool,
    seed: Option<u64>,
) -> Result<()> {
    let spread: SpreadType = spread.parse()?;

    let rng: Box<dyn RngCore> = match seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::rng()),
    };

    let mut session = TarotSession::new(
        ReadingEngine::with_rng(rng),
        settings,
        config.history.clone(),
    );
    let reading = session.draw(spread, question.as_deref().unwrap_or(""));

    if payload {
        let request = InterpretationRequest::from_reading(&reading);
        println!("{}", serde_json::to_string_pretty(&request)?);
    } else {
        display_reading(&reading);
    }

    Ok(())
}

fn cmd_today(settings: &JsonSettingsFile) -> Result<()> {
    let store = DailyCardStore::new(settings);

    match store.read_today_card(default_catalog()) {
        Some(card) => {
            println!("\n  {}", SpreadType::DailyGuidance.title());
            println!();
            display_card(SpreadType::DailyGuidance.labels()[0], &card);
        }
        None => {
            println!("No card drawn today. Run `tarot draw` to draw one.");
        }
    }

    Ok(())
}

fn cmd_history(
    settings: &JsonSettingsFile,
    limit: Option<usize>,
    export: Option<PathBuf>,
) -> Result<()> {
    let entries = HistoryStore::new(settings).load();

    if let Some(path) = export {
        let count = write_history_csv(&entries, &path)?;
        println!("✓ Exported {} readings", count);
        println!("  CSV: {}", path.display());
        return Ok(());
    }

    if entries.is_empty() {
        println!("No readings yet.");
        return Ok(());
    }

    let shown = limit.unwrap_or(entries.len());
    for entry in entries.iter().take(shown) {
        let local = entry.created_at.with_timezone(&chrono::Local);
        println!(
            "{}  {:<30} {}",
            local.format("%Y-%m-%d %H:%M"),
            entry.spread.title(),
            entry.question
        );
        let cards: Vec<String> = entry
            .card_names
            .iter()
            .enumerate()
            .map(|(i, name)| match entry.is_reversed(i) {
                Some(true) => format!("{} (renversée)", name),
                _ => name.clone(),
            })
            .collect();
        println!("    {}", cards.join(", "));
    }

    Ok(())
}

fn cmd_spreads() {
    for spread in SpreadType::ALL {
        println!(
            "{:<26} {} ({} card{}): {}",
            kebab_case(spread.tag()),
            spread.title(),
            spread.card_count(),
            if spread.card_count() == 1 { "" } else { "s" },
            spread.labels().join(", ")
        );
        println!("{:<26} {}", "", spread.subtitle());
    }
}

fn kebab_case(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len() + 4);
    for c in tag.chars() {
        if c.is_uppercase() {
            out.push('-');
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn display_reading(reading: &Reading) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", reading.spread.title());
    println!("╰─────────────────────────────────────────╯");

    if let Some(ref question) = reading.question {
        println!();
        println!("  Question: {}", question);
    }
    println!();

    for (label, card) in reading.positions() {
        display_card(label, card);
    }
}

fn display_card(label: &str, drawn: &DrawnCard) {
    let orientation = if drawn.is_reversed { " (renversée)" } else { "" };
    println!("  {} → {}{}", label, drawn.card.name, orientation);
    println!("    {}", drawn.card.keywords.join(" · "));
    println!("    {}", drawn.meaning());
    println!();
}
