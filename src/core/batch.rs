use crate::domain::model::{Event, EventOutcome, OutcomeStatus, RunReport};
use crate::domain::ports::{EventStore, MapFetcher};
use crate::utils::error::{MapError, Result};
use crate::utils::validation::validate_slug;
use chrono::Utc;
use std::path::PathBuf;

/// Walks every event with a slug and makes sure it has a map image.
///
/// Events are handled one at a time. Data store failures and a missing output
/// directory abort the run; anything else that goes wrong for a single event
/// is recorded in its outcome and the batch moves on.
pub struct BatchRunner<S: EventStore, F: MapFetcher> {
    store: S,
    fetcher: F,
    output_dir: PathBuf,
}

impl<S: EventStore, F: MapFetcher> BatchRunner<S, F> {
    pub fn new(store: S, fetcher: F, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            fetcher,
            output_dir: output_dir.into(),
        }
    }

    pub fn destination_for(&self, event: &Event) -> PathBuf {
        self.output_dir.join(event.image_filename())
    }

    pub async fn run(&self, force: bool) -> Result<RunReport> {
        let started_at = Utc::now();

        let events = self.store.events_with_slug().await?;
        tracing::info!("Found {} events with slugs.", events.len());

        tokio::fs::create_dir_all(&self.output_dir).await?;

        let mut outcomes = Vec::with_capacity(events.len());
        for event in &events {
            let status = match self.process(event, force).await {
                Ok(status) => status,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("  ERROR {}: {}", event.slug, e);
                    OutcomeStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(EventOutcome {
                slug: event.slug.clone(),
                status,
            });
        }

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            force,
            outcomes,
        };
        tracing::info!("{}", report.summary());
        Ok(report)
    }

    /// Resolves each event's center without fetching or writing anything.
    pub async fn preview(&self) -> Result<Vec<(String, String)>> {
        let events = self.store.events_with_slug().await?;
        let mut centers = Vec::with_capacity(events.len());

        for event in events {
            let center = self.center_for(&event).await?;
            tracing::info!("  {}  (center: {:?})", event.slug, center);
            centers.push((event.slug, center));
        }

        Ok(centers)
    }

    async fn process(&self, event: &Event, force: bool) -> Result<OutcomeStatus> {
        validate_slug(&event.slug)?;

        let destination = self.destination_for(event);
        if !force && tokio::fs::try_exists(&destination).await? {
            tracing::info!(
                "  skip  {}  (already exists, use --force to overwrite)",
                event.slug
            );
            return Ok(OutcomeStatus::Skipped { path: destination });
        }

        let center = self.center_for(event).await?;
        // Nothing to geocode: fail the event instead of sending an empty center.
        if center.is_empty() {
            return Err(MapError::UnresolvableLocation {
                slug: event.slug.clone(),
            });
        }

        self.fetcher.fetch(&center, &destination).await?;
        tracing::info!(
            "  saved {}  (center: {:?})",
            event.image_filename(),
            center
        );

        Ok(OutcomeStatus::Saved {
            path: destination,
            center,
        })
    }

    async fn center_for(&self, event: &Event) -> Result<String> {
        let mut blocks = self.store.blocks_for_event(event.id).await?;
        blocks.sort_by_key(|b| (b.ordering, b.id));
        Ok(event.center(&blocks))
    }
}
