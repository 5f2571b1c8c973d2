use std::path::PathBuf;

use clap::Args;
use console::style;
use log::info;
use pzm_tools::prelude::*;

use crate::utils::{
    init_spinner,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct LabelArgs {
    #[arg(help = "File storing a saved random forest model (JSON).")]
    model_filename: PathBuf,
    #[arg(help = "Input VCF filename, optionally gzip or BGZF compressed.")]
    vcf_filename:   PathBuf,
    #[arg(
        short = 'b',
        long,
        default_value_t = false,
        help = "Label predictions `0` and `1` instead of `Not_PZM` and `PZM`."
    )]
    binary_labels:  bool,
    #[arg(
        long,
        required = false,
        help = "BED file of additional regions whose variants are dropped."
    )]
    blacklist:      Option<PathBuf>,
    #[arg(long, default_value_t = false, help = "Skip min-max normalization.")]
    no_normalize:   bool,
    #[arg(long, default_value_t = false, help = "Skip the hard filter.")]
    no_filter:      bool,
    #[arg(
        long,
        default_value_t = false,
        help = "Fail on constant feature columns instead of mapping them to 0."
    )]
    strict:         bool,
}

impl LabelArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        if !self.vcf_filename.is_file() {
            anyhow::bail!(
                "Input VCF {} does not exist.",
                style(self.vcf_filename.display()).red()
            );
        }

        let policy = if self.strict {
            DegeneratePolicy::Error
        }
        else {
            DegeneratePolicy::Zero
        };
        let pipeline = Pipeline::builder()
            .with_normalize(!self.no_normalize)
            .with_hard_filter(!self.no_filter)
            .with_blacklist_path(self.blacklist.as_ref())
            .with_degenerate_policy(policy)
            .build()?;
        let model = TreeEnsemble::from_path(&self.model_filename)?;

        let spinner = init_spinner(utils.progress, "Reading variants...")?;
        let table = pipeline.read_vcf(&self.vcf_filename)?;
        spinner.set_message("Predicting...");
        let mut labelled = label_variants(&table, &model, self.binary_labels)?;

        let output = prediction_output_path(&self.vcf_filename);
        info!(
            "Start serializing the parsed variants and their predictions to {}",
            output.display()
        );
        write_csv(&mut labelled, &output)?;
        spinner.finish_and_clear();

        eprintln!(
            "Labelled {} variants, written to {}",
            style(labelled.height()).green(),
            style(output.display()).green()
        );
        Ok(())
    }
}
