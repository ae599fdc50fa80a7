use cascade::prelude::*;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::time::{Duration, Instant};

/// Lay out, validate and run cascade workflows
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the execution backend
    #[arg(long, global = true, env = "CASCADE_API_URL", default_value = "http://localhost:5001")]
    api_url: String,

    /// Bearer token for the execution backend
    #[arg(long, global = true, env = "CASCADE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the layout of a cascade file
    Layout {
        /// Path to the cascade YAML file
        file: String,
        /// Place cells in a single row in file order
        #[arg(long)]
        linear: bool,
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        /// JSON file overriding the card geometry
        #[arg(long)]
        metrics: Option<String>,
    },
    /// Report structural problems in a cascade file
    Validate {
        file: String,
    },
    /// Start a run on the backend
    Run {
        file: String,
        /// Input parameter as name=value. Values are parsed as JSON when possible.
        #[arg(short, long = "input", value_name = "NAME=VALUE")]
        inputs: Vec<String>,
        /// Let the backend load the file from this path instead of sending its text
        #[arg(long)]
        by_path: bool,
        /// Keep polling until the run finishes
        #[arg(short, long)]
        watch: bool,
        #[arg(long, default_value_t = 2000)]
        interval_ms: u64,
    },
    /// Poll a running session until it finishes
    Watch {
        session_id: String,
        /// Cascade file, used to list cells in definition order
        #[arg(long)]
        file: Option<String>,
        #[arg(long, default_value_t = 2000)]
        interval_ms: u64,
    },
    /// Print the log of a session
    Logs {
        session_id: String,
        /// Only entries after this index
        #[arg(long)]
        after: Option<u64>,
    },
    /// Print the cost of a session
    Cost {
        session_id: String,
    },
    /// Cancel a running session
    Cancel {
        session_id: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Answer a pending human-input checkpoint
    Respond {
        checkpoint_id: String,
        /// The answer. Parsed as JSON when possible, sent as a string otherwise.
        response: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Svg,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Layout {
            ref file,
            linear,
            format,
            ref output,
            ref metrics,
        } => run_layout(file, linear, format, output.as_deref(), metrics.as_deref()),
        Command::Validate { ref file } => run_validate(file),
        Command::Run {
            ref file,
            ref inputs,
            by_path,
            watch,
            interval_ms,
        } => {
            let client = connect(&cli);
            let definition = load_cascade(file);
            let mut request = if by_path {
                RunRequest::from_path(file.as_str())
            } else {
                RunRequest::from_definition(&definition)
                    .unwrap_or_else(|e| exit_with_error(&e.to_string()))
            };
            for input in inputs {
                let (name, value) = parse_input(input);
                request = request.with_input(name, value);
            }

            let run = client
                .run_cascade(&request)
                .await
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to start run: {}", e)));
            println!("Started session {}", run.session_id);

            if watch {
                let order = definition.cell_names().into_iter().map(String::from).collect();
                watch_session(client, &run.session_id, order, interval_ms).await;
            }
        }
        Command::Watch {
            ref session_id,
            ref file,
            interval_ms,
        } => {
            let client = connect(&cli);
            let order = file
                .as_deref()
                .map(|f| {
                    load_cascade(f)
                        .cell_names()
                        .into_iter()
                        .map(String::from)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();
            watch_session(client, session_id, order, interval_ms).await;
        }
        Command::Logs {
            ref session_id,
            after,
        } => {
            let logs = connect(&cli)
                .session_logs(session_id, after)
                .await
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to fetch logs: {}", e)));
            for entry in logs {
                println!(
                    "[{:>5}] {:<12} {}",
                    entry.index,
                    entry.cell_name.as_deref().unwrap_or("-"),
                    entry.message
                );
            }
        }
        Command::Cost { ref session_id } => {
            let cost = connect(&cli)
                .session_cost(session_id)
                .await
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to fetch cost: {}", e)));
            println!("Total: ${:.4}", cost.total_cost);
            for (cell, amount) in &cost.by_cell {
                println!("  {:<20} ${:.4}", cell, amount);
            }
        }
        Command::Cancel {
            ref session_id,
            ref reason,
        } => {
            connect(&cli)
                .cancel_session(session_id, reason.as_deref())
                .await
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to cancel: {}", e)));
            println!("Cancellation requested for {}", session_id);
        }
        Command::Respond {
            ref checkpoint_id,
            ref response,
        } => {
            connect(&cli)
                .respond_checkpoint(checkpoint_id, &parse_value(response))
                .await
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to respond: {}", e)));
            println!("Answered checkpoint {}", checkpoint_id);
        }
    }
}

fn run_layout(
    file: &str,
    linear: bool,
    format: OutputFormat,
    output: Option<&str>,
    metrics_path: Option<&str>,
) {
    let start = Instant::now();
    let definition = load_cascade(file);

    let metrics = match metrics_path {
        Some(path) => {
            let text = fs::read_to_string(path).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to read metrics file '{}': {}", path, e))
            });
            serde_json::from_str::<LayoutMetrics>(&text)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse metrics: {}", e)))
        }
        None => LayoutMetrics::default(),
    };

    let layout = LayoutEngine::for_definition(&definition)
        .linear(linear)
        .with_metrics(metrics)
        .build()
        .layout();
    tracing::info!(elapsed = ?start.elapsed(), "Layout computed");

    let rendered = match format {
        OutputFormat::Text => TextRenderer::render(&layout),
        OutputFormat::Json => serde_json::to_string_pretty(&layout)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize layout: {}", e))),
        OutputFormat::Svg => SvgRenderer::new().render(&layout),
    };

    match output {
        Some(path) => {
            fs::write(path, rendered).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write '{}': {}", path, e))
            });
            println!("Wrote {}", path);
        }
        None => println!("{}", rendered),
    }
}

fn run_validate(file: &str) {
    let definition = load_cascade(file);
    let issues = CascadeDocument::validate(&definition);
    if issues.is_empty() {
        println!("{}: {} cells, no issues", file, definition.cells.len());
        return;
    }
    for issue in &issues {
        println!("warning: {}", issue);
    }
    exit_with_error(&format!("{} issue(s) found in '{}'", issues.len(), file));
}

async fn watch_session(client: Client, session_id: &str, order: Vec<String>, interval_ms: u64) {
    let monitor = Monitor::new(client, session_id)
        .interval(Duration::from_millis(interval_ms))
        .cell_order(order);
    let (mut rx, handle) = monitor.watch();

    while rx.changed().await.is_ok() {
        let update = rx.borrow_and_update().clone();
        match update {
            MonitorUpdate::Waiting => {}
            MonitorUpdate::Failed { message } => eprintln!("poll failed: {}", message),
            MonitorUpdate::View(view) => {
                print_progress(&view);
                if view.is_terminal {
                    print_summary(&view);
                    break;
                }
            }
        }
    }

    if let Err(e) = handle.await {
        exit_with_error(&format!("Monitor task failed: {}", e));
    }
}

fn print_progress(view: &ViewState) {
    let running = if view.running.is_empty() {
        String::new()
    } else {
        format!(" running: {}", view.running.join(", "))
    };
    println!(
        "[{:?}] {}/{} cells ({:.0}%) ${:.4}{}",
        view.status,
        view.counts.finished(),
        view.counts.total(),
        view.progress * 100.0,
        view.total_cost,
        running
    );
    if let Some(checkpoint) = &view.awaiting_input {
        println!(
            "  waiting for input on checkpoint {}: {}",
            checkpoint.checkpoint_id,
            checkpoint.question.as_deref().unwrap_or("(no question)")
        );
    }
}

fn print_summary(view: &ViewState) {
    println!("\n--- Session {} ---", view.session_id);
    for cell in &view.cells {
        let cached = if cell.state.cached { " (cached)" } else { "" };
        println!("  {:<20} {}{}", cell.name, cell.state.status.as_str(), cached);
    }
    if let Some(error) = &view.error {
        println!("Error: {}", error);
    }
    println!("Total cost: ${:.4}", view.total_cost);
}

fn connect(cli: &Cli) -> Client {
    let client = Client::new(cli.api_url.clone())
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid backend URL: {}", e)));
    match &cli.api_key {
        Some(key) => client.with_api_key(key.clone()),
        None => client,
    }
}

fn load_cascade(path: &str) -> CascadeDefinition {
    CascadeDocument::from_file(path).unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn parse_input(raw: &str) -> (String, serde_json::Value) {
    let Some((name, value)) = raw.split_once('=') else {
        exit_with_error(&format!("Input '{}' must look like NAME=VALUE", raw));
    };
    (name.trim().to_string(), parse_value(value))
}

fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
