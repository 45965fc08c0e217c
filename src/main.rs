use clap::Parser;
use lineterm::core::config::{self, LineTermConfig};
use lineterm::{logging, tui};
use simplelog::{ConfigBuilder, SharedLogger, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "lineterm", about = "Line-editing console in the terminal")]
struct Args {
    /// Prompt written before each line
    #[arg(short, long)]
    prompt: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<String>,

    /// Ignore ~/.lineterm/config.toml
    #[arg(long)]
    no_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Buffer records until the configured log file is known
    let _ = logging::init();

    let file_config = if args.no_config {
        LineTermConfig::default()
    } else {
        match config::load_config() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Ignoring config file: {e}");
                LineTermConfig::default()
            }
        }
    };
    let config = config::resolve(&file_config, args.prompt.as_deref(), args.log_file.as_deref());

    // The terminal is in raw mode while running, so logs go to a file
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    let file_logger: Option<Box<dyn SharedLogger>> = match File::create(&config.log_file) {
        Ok(log_file) => Some(WriteLogger::new(config.log_level, log_config, log_file)),
        Err(_) => None,
    };
    logging::attach(file_logger);

    log::info!("lineterm starting up with config: {:?}", config);

    tui::run(config).await
}
