use clap::Parser;
use color_eyre::Result;
use tracing::{error, info};

use reservoir_entry::app::App;
use reservoir_entry::cli::CliArgs;
use reservoir_entry::{config, event, observability, terminal};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    let settings = config::load()?;
    if let Err(e) = observability::init_tracing(&settings.log_file, args.debug) {
        eprintln!("Logging disabled: {e}");
    }
    info!(api_url = %settings.api_url, "starting reservoir entry");

    if args.headless || !is_terminal() {
        return event::run_headless(&settings, args.json).await;
    }

    let mut app = App::new(settings)?;
    let mut terminal = terminal::setup_terminal()?;

    let result = event::run(&mut terminal, &mut app).await;

    terminal::cleanup_terminal_state(true, true);

    if let Err(e) = &result {
        error!(error = %e, "event loop failed");
    }
    result
}

fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
