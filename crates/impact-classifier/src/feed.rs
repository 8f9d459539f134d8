use chrono::{DateTime, Duration, Utc};
use pulse_core::{Headline, NewsItem, PipelineConfig};

use crate::HeadlineClassifier;

/// Selects the recent part of a feed and tags each headline with its impact
#[derive(Debug, Clone)]
pub struct NewsWindow {
    lookback: Duration,
    classifier: HeadlineClassifier,
}

impl NewsWindow {
    pub fn new(lookback: Duration, classifier: HeadlineClassifier) -> Self {
        Self {
            lookback,
            classifier,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.lookback_window, HeadlineClassifier::from_config(config))
    }

    /// Newest first, limited to `[now - lookback, now]`
    pub fn select(&self, mut headlines: Vec<Headline>, now: DateTime<Utc>) -> Vec<NewsItem> {
        let cutoff = now
            .checked_sub_signed(self.lookback)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        headlines.sort_by(|a, b| b.publish_time.cmp(&a.publish_time));

        let total = headlines.len();
        let items: Vec<NewsItem> = headlines
            .into_iter()
            .filter(|h| h.publish_time >= cutoff && h.publish_time <= now)
            .map(|h| {
                let impact = self.classifier.classify(&h.headline);
                NewsItem::tagged(h, impact)
            })
            .collect();

        tracing::debug!(
            "News window kept {} of {} headlines (lookback {}h)",
            items.len(),
            total,
            self.lookback.num_hours()
        );
        items
    }
}
