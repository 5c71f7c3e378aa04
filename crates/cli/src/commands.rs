//! Subcommand execution.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use tracing::{info, warn};

use casebook_core::config::validate_http_url;
use casebook_core::external::{
    AnalysisService, EntityAnalyzer, FfmpegExtractor, GcpLanguageClient, IbmNluClient,
    SpeechToText, WatsonSpeechToText, YoutubeDl,
};
use casebook_core::stages::in_flight_statuses;
use casebook_core::{investigate, AssetStatus, Config, RunSummary, SanitizedConfig, StageRunner};

use crate::args::{Cli, Command};
use crate::{callback, table};

pub async fn run(cli: Cli, config: Config) -> Result<()> {
    let runner = StageRunner::from_config(&config);

    match cli.command {
        Command::Download(args) => {
            let downloader = YoutubeDl::new(&config.downloader);
            let summary = runner.download(args.into(), &downloader).await?;
            finish("download", summary)
        }
        Command::Extract(args) => {
            let extractor = FfmpegExtractor::new(&config.extractor);
            let summary = runner.extract_audio(args.into(), &extractor).await?;
            finish("extract", summary)
        }
        Command::Recognize(args) => {
            let speech = speech_client(&config)?;
            let callback_url = config.speech.as_ref().and_then(|s| s.callback_url.as_deref());
            if callback_url.is_none() {
                warn!("No callback URL configured, use `collect` to fetch results");
            }
            let summary = runner
                .recognize(args.into(), &speech, callback_url)
                .await?;
            finish("recognize", summary)
        }
        Command::Collect(args) => {
            let speech = speech_client(&config)?;
            let summary = runner.collect_recognitions(args.into(), &speech).await?;
            finish("collect", summary)
        }
        Command::Transcribe(args) => {
            let summary = runner.transcribe(args.into()).await?;
            finish("transcribe", summary)
        }
        Command::Analyze { selector, service } => {
            let analyzer = analyzer(&config, service.into())?;
            let summary = runner
                .analyze(selector.into(), analyzer.as_ref(), cli.overwrite)
                .await?;
            finish("analyze", summary)
        }
        Command::Investigate {
            asset,
            service,
            filter,
        } => {
            let asset_type = asset.asset_type(service).map_err(anyhow::Error::msg)?;
            let in_flight = if asset_type.supports_in_process() {
                recognition_in_flight(&config).await
            } else {
                HashMap::new()
            };
            let report = investigate(runner.catalog(), asset_type, filter, &in_flight)?;
            println!("{}", table::status_table(&report));
            Ok(())
        }
        Command::Jobs => {
            let speech = speech_client(&config)?;
            let jobs = speech
                .list_jobs()
                .await
                .context("Failed to list recognition jobs")?;
            println!("{}", table::jobs_table(&jobs));
            Ok(())
        }
        Command::RegisterCallback { url } => {
            let url = url
                .or_else(|| config.speech.as_ref().and_then(|s| s.callback_url.clone()))
                .context("No callback URL given and speech.callback_url is not set")?;
            validate_http_url("callback URL", &url)?;
            let speech = speech_client(&config)?;
            let registered = speech
                .register_callback(&url)
                .await
                .context("Failed to register callback")?;
            info!(url = %registered.url, status = %registered.status, "Callback registered");
            Ok(())
        }
        Command::Server => callback::serve(&config).await,
        Command::Config => {
            let sanitized = SanitizedConfig::from(&config);
            println!("{}", serde_json::to_string_pretty(&sanitized)?);
            Ok(())
        }
    }
}

fn finish(stage: &str, summary: RunSummary) -> Result<()> {
    info!(
        stage,
        visited = summary.visited,
        completed = summary.completed,
        skipped = summary.skipped,
        failed = summary.failed,
        "Done"
    );
    if summary.has_failures() {
        bail!(
            "{} of {} episodes failed during {}",
            summary.failed,
            summary.visited,
            stage
        );
    }
    Ok(())
}

fn speech_client(config: &Config) -> Result<WatsonSpeechToText> {
    let speech = config
        .speech
        .as_ref()
        .context("The [speech] section is not configured")?;
    WatsonSpeechToText::new(speech).context("Failed to create speech-to-text client")
}

fn analyzer(config: &Config, service: AnalysisService) -> Result<Box<dyn EntityAnalyzer>> {
    let analyzer: Box<dyn EntityAnalyzer> = match service {
        AnalysisService::Gcp => {
            let gcp = config
                .analysis
                .gcp
                .as_ref()
                .context("The [analysis.gcp] section is not configured")?;
            Box::new(GcpLanguageClient::new(gcp)?)
        }
        AnalysisService::Ibm => {
            let ibm = config
                .analysis
                .ibm
                .as_ref()
                .context("The [analysis.ibm] section is not configured")?;
            Box::new(IbmNluClient::new(ibm)?)
        }
    };
    Ok(analyzer)
}

/// Running jobs at the vendor, or nothing when it cannot be asked.
async fn recognition_in_flight(config: &Config) -> HashMap<String, AssetStatus> {
    let Some(speech) = config.speech.as_ref() else {
        return HashMap::new();
    };
    let client = match WatsonSpeechToText::new(speech) {
        Ok(client) => client,
        Err(e) => {
            warn!(error = %e, "Speech client unavailable, in-process jobs not shown");
            return HashMap::new();
        }
    };
    match client.list_jobs().await {
        Ok(jobs) => in_flight_statuses(&jobs),
        Err(e) => {
            warn!(error = %e, "Could not list recognition jobs, in-process jobs not shown");
            HashMap::new()
        }
    }
}
