//! Scoping of per-episode actions over the catalog.
//!
//! Every stage command shares the same selection rule: season 0 means every
//! season, episode 0 means every episode of the selected season(s). The
//! stage only supplies what to do with one episode.

use std::error::Error as StdError;
use std::fmt;
use std::ops::AsyncFnMut;
use thiserror::Error;
use tracing::debug;

use crate::catalog::{Catalog, CatalogError, Episode};

/// Boxed error returned by a per-episode action.
pub type ActionError = Box<dyn StdError + Send + Sync>;

/// Which episodes a command applies to. Zero selects everything at that level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selector {
    pub season: u32,
    pub episode: u32,
}

impl Selector {
    pub fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }

    /// Every episode of every season.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn season(season: u32) -> Self {
        Self::new(season, 0)
    }

    pub fn episode(season: u32, episode: u32) -> Self {
        Self::new(season, episode)
    }

    /// Whether exactly one episode is selected.
    pub fn is_single(&self) -> bool {
        self.season != 0 && self.episode != 0
    }

    /// Whether the episode identified by `season`/`episode` is selected.
    pub fn matches(&self, season: u32, episode: u32) -> bool {
        (self.season == 0 || self.season == season)
            && (self.episode == 0 || self.episode == episode)
    }

    /// Rejects an episode number without a season to resolve it in.
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.season == 0 && self.episode != 0 {
            return Err(SolveError::EpisodeWithoutSeason {
                episode: self.episode,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.season, self.episode) {
            (0, 0) => write!(f, "all seasons"),
            (season, 0) => write!(f, "season {}", season),
            (season, episode) => write!(f, "season {} episode {}", season, episode),
        }
    }
}

/// Errors that stop a dispatch run.
#[derive(Debug, Error)]
pub enum SolveError {
    #[error("You must specify a season number for episode {episode}")]
    EpisodeWithoutSeason { episode: u32 },

    #[error("Episode {episode} not found in season {season}")]
    EpisodeNotFound { season: u32, episode: u32 },

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Action failed for episode {episode}: {source}")]
    Action {
        episode: String,
        #[source]
        source: ActionError,
    },
}

impl Catalog {
    /// Runs `action` on every episode matched by `selector`, in season then
    /// episode order, and returns how many episodes it ran on.
    ///
    /// Actions run one at a time. An action error aborts the run; actions
    /// that should not stop their siblings must handle failures themselves.
    pub async fn solve<F, E>(&self, selector: Selector, mut action: F) -> Result<usize, SolveError>
    where
        F: AsyncFnMut(&mut Episode) -> Result<(), E>,
        E: Into<ActionError>,
    {
        selector.validate()?;

        let seasons = if selector.season == 0 {
            self.season_numbers().collect::<Vec<_>>()
        } else {
            vec![selector.season]
        };

        let mut visited = 0;
        for number in seasons {
            let mut season = self.load_season(number)?;
            debug!(
                season = number,
                episodes = season.episode_count(),
                "Loaded season"
            );

            if selector.episode != 0 {
                let episode = season.episode_mut(selector.episode).ok_or(
                    SolveError::EpisodeNotFound {
                        season: number,
                        episode: selector.episode,
                    },
                )?;
                run_action(&mut action, episode).await?;
                visited += 1;
                continue;
            }

            for episode in season.episodes_mut() {
                run_action(&mut action, episode).await?;
                visited += 1;
            }
        }

        Ok(visited)
    }
}

async fn run_action<F, E>(action: &mut F, episode: &mut Episode) -> Result<(), SolveError>
where
    F: AsyncFnMut(&mut Episode) -> Result<(), E>,
    E: Into<ActionError>,
{
    action(episode).await.map_err(|e| SolveError::Action {
        episode: episode.name(),
        source: e.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_validation() {
        assert!(Selector::all().validate().is_ok());
        assert!(Selector::season(3).validate().is_ok());
        assert!(Selector::episode(3, 2).validate().is_ok());
        assert!(matches!(
            Selector::new(0, 2).validate(),
            Err(SolveError::EpisodeWithoutSeason { episode: 2 })
        ));
    }

    #[test]
    fn test_selector_is_single() {
        assert!(Selector::episode(1, 1).is_single());
        assert!(!Selector::season(1).is_single());
        assert!(!Selector::all().is_single());
    }

    #[test]
    fn test_selector_matches() {
        assert!(Selector::all().matches(7, 3));
        assert!(Selector::season(7).matches(7, 3));
        assert!(!Selector::season(7).matches(6, 3));
        assert!(Selector::episode(7, 3).matches(7, 3));
        assert!(!Selector::episode(7, 3).matches(7, 4));
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(Selector::all().to_string(), "all seasons");
        assert_eq!(Selector::season(4).to_string(), "season 4");
        assert_eq!(Selector::episode(4, 9).to_string(), "season 4 episode 9");
    }
}
