use std::time::Duration;

use clap::Args;
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::LevelFilter;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v info, -vv debug, -vvv trace)."
    )]
    pub verbose: u8,
    #[arg(
        long,
        default_value_t = false,
        help = "Display a progress spinner."
    )]
    pub progress: bool,
    #[arg(
        long,
        required = false,
        help = "Number of threads used by the table passes."
    )]
    pub threads: Option<usize>,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        if let Some(threads) = self.threads {
            std::env::set_var("POLARS_MAX_THREADS", threads.to_string());
        }
        let level = match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        pretty_env_logger::formatted_timed_builder()
            .filter_level(level)
            .parse_default_env()
            .try_init()?;
        Ok(())
    }
}

pub(crate) fn init_spinner(
    enabled: bool,
    message: &'static str,
) -> anyhow::Result<ProgressBar> {
    if !enabled {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
