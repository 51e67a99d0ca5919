use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "statline")]
#[command(about = "Render a status line from host session data", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Disable ANSI colors even on a terminal
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Maximum line width in columns (defaults to the terminal width)
    #[arg(long, global = true)]
    pub width: Option<usize>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List available widgets
    Widgets,

    /// Write the default settings file
    Init {
        #[arg(long)]
        force: bool,
    },
}
