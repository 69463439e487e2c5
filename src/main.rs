use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use whisky_magazin::catalog::whisky_topics;
use whisky_magazin::config::{self, Config};
use whisky_magazin::llm::OpenAiClient;
use whisky_magazin::pipeline::{self, Paths, Pipeline};
use whisky_magazin::retry::ThreadSleeper;
use whisky_magazin::{output, serve};

#[derive(Parser)]
#[command(name = "whisky-magazin")]
#[command(about = "Generates whisky and travel articles and builds a static site")]
#[command(long_about = "\
Generates whisky and travel articles and builds a static site

Articles are written by a chat-completion API, saved as JSON, and rendered
into plain HTML. Everything lives below the project root:

  ./
  ├── config.toml          # API key, site identity, affiliate links
  ├── articles/            # one JSON file per article
  ├── site/                # generated website
  ├── used_topics.json     # topics already written about
  └── magazin.log          # activity log

Without a subcommand an interactive menu is shown.

Run 'whisky-magazin gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project root holding config.toml, articles/ and site/
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Generate articles without rebuilding the site
    Generate {
        /// Number of articles
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Rebuild the site from all stored articles
    Build,
    /// Generate articles, then rebuild the site
    Auto {
        /// Number of articles
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Serve the built site locally
    Serve {
        #[arg(long, default_value_t = serve::DEFAULT_PORT)]
        port: u16,
        /// Do not open a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Show generation statistics
    Stats,
    /// Check the API connection with one short request
    Test,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = Paths::new(&cli.root);

    // Commands that work without a usable config.
    match &cli.command {
        Some(Command::GenConfig) => {
            print!("{}", config::stock_config_toml());
            return Ok(());
        }
        Some(Command::Stats) => {
            let stats = pipeline::collect_stats(&paths, whisky_topics().len())?;
            output::print_stats(&stats);
            return Ok(());
        }
        Some(Command::Serve { port, no_open }) => {
            serve::serve(&paths.site, *port, !*no_open)?;
            return Ok(());
        }
        _ => {}
    }

    let config = match config::load_config(&paths.root) {
        Ok(config) => config,
        Err(e) => {
            output::print_config_error(&e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(command) => run(command, &paths, &config),
        None => interactive_menu(&paths, &config),
    }
}

fn run(command: Command, paths: &Paths, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAiClient::new(&config.openai)?;
    let sleeper = ThreadSleeper;
    let magazin = Pipeline::new(paths, config, &client, &sleeper);
    let mut rng = rand::thread_rng();

    match command {
        Command::Generate { count } => {
            let report = magazin.generate_batch(count, &mut rng)?;
            output::print_batch_report(&report);
        }
        Command::Build => {
            let summary = magazin.build()?;
            output::print_build_summary(&summary, &paths.site);
        }
        Command::Auto { count } => {
            let (report, summary) = magazin.auto(count, &mut rng)?;
            output::print_batch_report(&report);
            if let Some(summary) = summary {
                output::print_build_summary(&summary, &paths.site);
            }
        }
        Command::Serve { port, no_open } => serve::serve(&paths.site, port, !no_open)?,
        Command::Stats => {
            let stats = pipeline::collect_stats(paths, whisky_topics().len())?;
            output::print_stats(&stats);
        }
        Command::Test => output::print_test_result(&magazin.test_connection()),
        Command::GenConfig => print!("{}", config::stock_config_toml()),
    }
    Ok(())
}

fn interactive_menu(paths: &Paths, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let article_count = paths.store().load_all()?.len();
    output::print_menu(article_count);
    print!("Deine Wahl (1-8): ");
    io::stdout().flush()?;

    let mut choice = String::new();
    if io::stdin().lock().read_line(&mut choice)? == 0 {
        return Ok(());
    }

    let command = match choice.trim() {
        "1" => Command::Test,
        "2" => Command::Auto { count: 1 },
        "3" | "5" => Command::Auto { count: 3 },
        "4" => Command::Build,
        "6" => Command::Serve {
            port: serve::DEFAULT_PORT,
            no_open: false,
        },
        "7" => Command::Stats,
        "8" => return Ok(()),
        _ => {
            println!("Ungültige Auswahl.");
            return Ok(());
        }
    };
    run(command, paths, config)
}
