//! Command line definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use casebook_core::catalog::{AssetStatus, AssetType};
use casebook_core::external::AnalysisService;
use casebook_core::Selector;

#[derive(Parser, Debug)]
#[command(name = "casebook")]
#[command(about = "Download, transcribe and analyze a catalog of episodes")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ./casebook.toml if present)
    #[arg(long, global = true, env = "CASEBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Replace existing analysis results
    #[arg(short = 'x', long, global = true)]
    pub overwrite: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Season/episode selection shared by the stage commands. Zero means all.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SelectorArgs {
    /// Season number (0 for every season)
    #[arg(short, long, default_value_t = 0)]
    pub season: u32,

    /// Episode number within the season (0 for every episode)
    #[arg(short, long, default_value_t = 0)]
    pub episode: u32,
}

impl From<SelectorArgs> for Selector {
    fn from(args: SelectorArgs) -> Self {
        Selector::new(args.season, args.episode)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register the callback URL with the speech-to-text service
    #[command(visible_alias = "rcb")]
    RegisterCallback {
        /// Callback URL (default: speech.callback_url from the config)
        url: Option<String>,
    },

    /// Run the server receiving finished recognitions
    #[command(visible_alias = "s")]
    Server,

    /// Submit extracted audio for speech recognition
    #[command(visible_alias = "rec")]
    Recognize(SelectorArgs),

    /// Fetch finished recognitions from the speech-to-text service
    #[command(visible_alias = "col")]
    Collect(SelectorArgs),

    /// List recognition jobs known to the speech-to-text service
    Jobs,

    /// Show the status of one stage across the catalog
    #[command(visible_alias = "log")]
    Investigate {
        /// Stage to report on
        #[arg(short, long, value_enum)]
        asset: AssetArg,

        /// Analysis service (required for the analysis stage)
        #[arg(short = 'u', long, value_enum)]
        service: Option<ServiceArg>,

        /// Only show episodes with this status
        #[arg(short, long, default_value = "any")]
        filter: AssetStatus,
    },

    /// Download episode videos
    #[command(visible_alias = "dl")]
    Download(SelectorArgs),

    /// Extract audio from downloaded videos
    #[command(visible_alias = "ext")]
    Extract(SelectorArgs),

    /// Build transcripts from recognitions
    #[command(visible_alias = "tr")]
    Transcribe(SelectorArgs),

    /// Run entity analysis on transcripts
    #[command(visible_alias = "an")]
    Analyze {
        #[command(flatten)]
        selector: SelectorArgs,

        /// Analysis service
        #[arg(short = 'u', long, value_enum)]
        service: ServiceArg,
    },

    /// Print the effective configuration with secrets redacted
    Config,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetArg {
    Video,
    Audio,
    Recog,
    Trans,
    Analysis,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceArg {
    Gcp,
    Ibm,
}

impl From<ServiceArg> for AnalysisService {
    fn from(arg: ServiceArg) -> Self {
        match arg {
            ServiceArg::Gcp => AnalysisService::Gcp,
            ServiceArg::Ibm => AnalysisService::Ibm,
        }
    }
}

impl AssetArg {
    /// Stage for this argument; analysis needs the service to pick one.
    pub fn asset_type(&self, service: Option<ServiceArg>) -> Result<AssetType, String> {
        match self {
            Self::Video => Ok(AssetType::Video),
            Self::Audio => Ok(AssetType::Audio),
            Self::Recog => Ok(AssetType::Recognition),
            Self::Trans => Ok(AssetType::Transcript),
            Self::Analysis => service
                .map(|s| AnalysisService::from(s).asset_type())
                .ok_or_else(|| "the analysis stage needs a service (-u gcp|ibm)".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_stage_alias_and_selector() {
        let cli = Cli::try_parse_from(["casebook", "dl", "-s", "3", "-e", "1"]).unwrap();
        match cli.command {
            Command::Download(args) => {
                assert_eq!(Selector::from(args), Selector::episode(3, 1));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_investigate_arguments() {
        let cli = Cli::try_parse_from([
            "casebook", "log", "-a", "recog", "-f", "in-process",
        ])
        .unwrap();
        match cli.command {
            Command::Investigate {
                asset,
                service,
                filter,
            } => {
                assert_eq!(asset.asset_type(service), Ok(AssetType::Recognition));
                assert_eq!(filter, AssetStatus::InProcess);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_analysis_requires_service() {
        assert!(AssetArg::Analysis.asset_type(None).is_err());
        assert_eq!(
            AssetArg::Analysis.asset_type(Some(ServiceArg::Ibm)),
            Ok(AssetType::IbmAnalysis)
        );
    }

    #[test]
    fn test_global_overwrite_flag() {
        let cli = Cli::try_parse_from(["casebook", "an", "-u", "gcp", "-x"]).unwrap();
        assert!(cli.overwrite);
    }
}
