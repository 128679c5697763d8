use crate::config::SubmitMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "demo-booking")]
#[command(about = "Book-a-demo flow: business email check, CRM submit, scheduling link")]
pub struct CliConfig {
    /// Widget config file (TOML); defaults are used when omitted
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check whether an email address counts as a business email
    Classify { email: String },

    /// Open the demo modal, fill it in and submit it
    Book {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Override `widget.mode` from the config file
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Proxy,
    Direct,
}

impl From<ModeArg> for SubmitMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Proxy => SubmitMode::Proxy,
            ModeArg::Direct => SubmitMode::Direct,
        }
    }
}
