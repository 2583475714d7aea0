//! Interactive todo list on the terminal.
//!
//! Reads one command per line from stdin, dispatches the resulting actions
//! through the store and redraws the list. Logs go to stderr.

use reducer_runtime::Store;
use std::io::Write;
use todo::view::{self, Command};
use todo::{TodoConfig, TodoEnvironment, TodoReducer};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = TodoConfig::from_env()?;
    init_tracing(&config)?;

    info!(
        seed_samples = config.seed_samples,
        initial_todos = config.initial_todos.len(),
        "Starting todo list"
    );

    let env = TodoEnvironment::production();
    let state = config.initial_state(env.ids.as_ref());
    let store = Store::new(state, TodoReducer::new(), env);

    print!("{}", view::render(&store.snapshot().await));
    println!("Type `help` for commands.");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match view::parse_command(&line) {
            Ok(command) => command,
            Err(error) => {
                println!("{error}");
                prompt()?;
                continue;
            },
        };

        match command {
            Command::Quit => break,
            Command::Help => print!("{}", view::help()),
            command => match store.state(move |state| command.into_actions(state)).await {
                Ok(actions) => {
                    for action in actions {
                        store.send(action).await?;
                    }
                    print!("{}", view::render(&store.snapshot().await));
                },
                Err(error) => println!("{error}"),
            },
        }

        prompt()?;
    }

    info!("Shutting down");
    if let Err(error) = store.shutdown(config.shutdown_timeout).await {
        warn!(error = %error, "Shutdown did not complete cleanly");
    }

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()
}

/// Initialize tracing, writing to stderr so the list stays readable
fn init_tracing(config: &TodoConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_filter)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    Ok(())
}
