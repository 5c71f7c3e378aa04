use regex_lite::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::info;

use super::{
    already_exists, missing_input, produce, Recognition, SkipReason, StageError, StageOutcome,
};
use crate::catalog::{AssetType, Episode};
use crate::external::SpeechRecognitionResults;

static NINETEEN_HUNDREDS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"\bnineteen (seventy|eighty|ninety)(?: (one|two|three|four|five|six|seven|eight|nine))?\b",
    )
    .ok()
});

static TWO_THOUSANDS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"\btwo thousand (one|two|three|four|five|six|seven|eight|nine)\b").ok()
});

/// Plain-text transcript built from an episode's recognition.
pub struct Transcript<'a> {
    episode: &'a Episode,
}

impl<'a> Transcript<'a> {
    pub fn new(episode: &'a Episode) -> Self {
        Self { episode }
    }

    pub fn path(&self) -> PathBuf {
        self.episode.asset_file_path(AssetType::Transcript)
    }

    pub fn exists(&self) -> bool {
        self.episode.asset_exists(AssetType::Transcript)
    }

    /// Writes the transcript from the stored recognition.
    pub async fn create(&self) -> Result<StageOutcome, StageError> {
        if let Some(skipped) = already_exists(self.episode, AssetType::Transcript)
            .or_else(|| missing_input(self.episode, AssetType::Recognition))
        {
            return Ok(skipped);
        }

        let results = Recognition::new(self.episode).read_results().await?;
        let text = transcript_text(&results);
        if text.is_empty() {
            return Ok(StageOutcome::Skipped(SkipReason::EmptyRecognition));
        }

        let path = self.path();
        produce(&path, async |staging: &Path| {
            tokio::fs::write(staging, text.as_bytes()).await?;
            Ok(())
        })
        .await?;
        info!(file = %path.display(), "Transcript written");

        Ok(StageOutcome::Completed)
    }

    pub async fn read(&self) -> Result<String, StageError> {
        Ok(tokio::fs::read_to_string(self.path()).await?)
    }
}

/// One sentence per recognized alternative, with filler markers removed and
/// spoken years written as digits.
pub fn transcript_text(results: &[SpeechRecognitionResults]) -> String {
    let lines: Vec<String> = results
        .iter()
        .flat_map(|block| &block.results)
        .flat_map(|result| &result.alternatives)
        .map(|alternative| clean_line(&alternative.transcript))
        .filter(|line| line != ".")
        .collect();

    normalize_years(&lines.join("\n"))
}

fn clean_line(transcript: &str) -> String {
    let mut line = format!("{}.", transcript)
        .replace(" %HESITATION", "")
        .replace("%HESITATION", "");
    while line.contains("  ") {
        line = line.replace("  ", " ");
    }
    line.replace(" .", ".").trim().to_string()
}

/// Rewrites spoken years from 1970 to 2009 ("nineteen eighty four") as digits.
pub fn normalize_years(text: &str) -> String {
    let mut text = text.to_string();
    if let Some(re) = NINETEEN_HUNDREDS.as_ref() {
        text = re
            .replace_all(&text, |caps: &Captures| {
                let decade = match &caps[1] {
                    "seventy" => 7,
                    "eighty" => 8,
                    _ => 9,
                };
                let unit = caps.get(2).map_or(0, |m| digit(m.as_str()));
                format!("19{}{}", decade, unit)
            })
            .into_owned();
    }
    if let Some(re) = TWO_THOUSANDS.as_ref() {
        text = re
            .replace_all(&text, |caps: &Captures| format!("200{}", digit(&caps[1])))
            .into_owned();
    }
    text
}

fn digit(word: &str) -> u32 {
    match word {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        _ => 0,
    }
}
