use crate::output::OutputFormat;
use clap::{Args, Parser, Subcommand};
use libcenote::observation::Tier;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short,
        long,
        help = "Survey configuration file [default: survey.yaml in the user config directory]"
    )]
    pub survey: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    #[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "List the observation for every surveyed coordinate")]
    Observations {
        #[arg(short, long, help = "Only list observations in this color tier")]
        tier: Option<Tier>,
        #[command(flatten)]
        output: OutputArgs,
    },
    #[command(about = "Count the observations in each color tier")]
    Summary {
        #[command(flatten)]
        output: OutputArgs,
    },
    #[command(about = "List the lines of the reference grid")]
    Grid {
        #[command(flatten)]
        output: OutputArgs,
    },
}
