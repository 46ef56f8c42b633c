use clap::Parser;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "a203-extract")]
#[command(version)]
#[command(about = "Extract A47/A203.zip into the current directory", long_about = None)]
pub struct Cli {
    /// Log progress to stderr (-vv for per-entry detail)
    #[arg(short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Maximum level of diagnostics written to stderr
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}
