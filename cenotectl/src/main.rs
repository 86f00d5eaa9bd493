//! This is a command-line tool to inspect survey data via [libcenote]
use crate::{
    cli::*,
    output::rows::{GridLineRow, ObservationRow, TierRow},
};
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use libcenote::{
    grid::Grid,
    loader::{DefaultFetcher, load_survey},
    survey::SurveyConfig,
};
use std::path::{Path, PathBuf};
use tracing::debug;

mod cli;
mod output;

fn default_survey_file() -> Result<PathBuf> {
    directories::ProjectDirs::from("org", "cenotemap", "cenotectl")
        .map(|dirs| dirs.config_dir().join("survey.yaml"))
        .ok_or_else(|| anyhow!("Unable to determine the user configuration directory"))
}

/// Relative data directories are interpreted relative to the survey file rather than the
/// current directory
fn resolve_datadir(survey: &mut SurveyConfig, survey_file: &Path) {
    let base = survey_file.parent().unwrap_or(Path::new("."));
    survey.datadir = Some(match survey.datadir.take() {
        Some(dir) if dir.is_relative() => base.join(dir),
        Some(dir) => dir,
        None => base.to_path_buf(),
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Cli::parse();

    // the grid doesn't depend on any survey data
    if let Commands::Grid { output } = &args.command {
        let lines = Grid::yucatan().lines();
        println!(
            "{}",
            output::format_seq(lines.iter().map(GridLineRow::new), output.format)?
        );
        return Ok(());
    }

    let survey_file = match args.survey {
        Some(path) => path,
        None => default_survey_file()?,
    };
    debug!(?survey_file, "Loading survey");
    let mut survey = SurveyConfig::load_from_file(&survey_file)
        .await
        .with_context(|| format!("Unable to load survey '{}'", survey_file.display()))?;
    resolve_datadir(&mut survey, &survey_file);

    let tables = load_survey(&DefaultFetcher::default(), &survey).await?;
    let observations = tables.observations();

    match args.command {
        // already handled above
        Commands::Grid { .. } => Ok(()),
        Commands::Observations { tier, output } => {
            let rows = observations
                .iter()
                .filter(|o| tier.is_none_or(|t| o.tier() == t))
                .map(ObservationRow::new);
            println!("{}", output::format_seq(rows, output.format)?);
            Ok(())
        }
        Commands::Summary { output } => {
            println!(
                "{}",
                output::format_seq(TierRow::summarize(&observations), output.format)?
            );
            Ok(())
        }
    }
}
