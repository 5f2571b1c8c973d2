mod label;
mod utils;

use clap::{
    Parser,
    Subcommand,
};
use label::LabelArgs;
use log::info;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = "Tools for studying PZM variants",
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Label the variants in a given VCF file as PZM or not-PZM using a
    /// trained random forest model.
    Label {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  LabelArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Label { utils, args } => {
            utils.setup()?;
            info!("Received arguments: {:?}", args);
            args.run(&utils)?;
            info!("Successfully finished executing the `label` subcommand");
        },
    }
    Ok(())
}
