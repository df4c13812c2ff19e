use clap::Parser;
use pagetree::cli::{execute_command, output, Cli};
use pagetree::config::Settings;
use pagetree::infrastructure::ServiceContainer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            output::error(&e);
            std::process::exit(pagetree::exitcode::CONFIG);
        }
    };

    setup_logging(cli.debug, &settings.log_filter);

    let container = ServiceContainer::new(settings);
    if let Err(e) = execute_command(&cli, &container) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

fn setup_logging(verbosity: u8, default_filter: &str) {
    let filter = match verbosity {
        0 => EnvFilter::try_new(default_filter).unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::default().add_directive(LevelFilter::INFO.into()),
        2 => EnvFilter::default().add_directive(LevelFilter::DEBUG.into()),
        3 => EnvFilter::default().add_directive(LevelFilter::TRACE.into()),
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            EnvFilter::default().add_directive(LevelFilter::TRACE.into())
        }
    };

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr) // Set writer first
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    tracing::debug!("Debug verbosity: {}", verbosity);
}
