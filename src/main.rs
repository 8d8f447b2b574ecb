mod app;
mod calculation;
mod chart;
mod cli;
mod config;
mod display;
mod error;
mod io;
mod pipeline;
mod prelude;
mod router;

use jiff::Zoned;
use tracing_subscriber::EnvFilter;

use app::App;
use cli::Cli;
use prelude::AppResult;

fn main() -> AppResult<()> {
    let cli = Cli::new();

    init_tracing();

    // The local calendar day. Hosted schedulers run in UTC, so that's what they'll see.
    let today = Zoned::now().date();

    let mut app = App::new(cli, today);

    router::dispatch(&mut app)
}

// private

/// Logs go to stderr so stdout stays clean for `--dry-run` and `raw` output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
