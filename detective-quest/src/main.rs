use anyhow::{Context, Result};
use clap::Parser;
use detective_quest::suspect_map::DEFAULT_CAPACITY;
use detective_quest::verdict::DEFAULT_THRESHOLD;
use detective_quest::{ConsoleTerminal, Game, LeafPolicy, Mansion, Settings, Terminal};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "detective-quest")]
#[command(about = "Explore the mansion, collect clues and accuse a suspect", long_about = None)]
struct Args {
    /// End the exploration as soon as a room with no way onward is reached
    #[arg(long)]
    stop_at_leaf: bool,

    /// Clues needed against the accused for the accusation to stand
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u32,

    /// Bucket count of the clue -> suspect table
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Print the case summary as JSON when the game is over
    #[arg(long)]
    summary_json: bool,

    /// Print the mansion map before starting
    #[arg(long)]
    show_map: bool,

    /// Log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // ゲーム画面は stdout なのでログは stderr へ
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    let settings = Settings {
        leaf_policy: if args.stop_at_leaf {
            LeafPolicy::AutoExit
        } else {
            LeafPolicy::Prompt
        },
        threshold: args.threshold,
        capacity: args.capacity,
    };

    let game = Game::new(&Mansion::detective_quest(), settings)
        .context("failed to set up the mansion")?;
    let mut terminal = ConsoleTerminal::stdio();

    if args.show_map {
        terminal.say("=== Mansion map ===")?;
        for line in game.rooms().outline() {
            terminal.say(&line)?;
        }
        terminal.say("")?;
    }

    let summary = game.play(&mut terminal).context("game aborted")?;

    if args.summary_json {
        println!("\n=== Case summary ===");
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
