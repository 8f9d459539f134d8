use pulse_core::{HeadlineImpact, PipelineConfig};

/// Keyword rules for headline impact.
///
/// Matching is case-insensitive substring containment. A HIGH keyword wins
/// over any LOW keyword in the same headline.
#[derive(Debug, Clone)]
pub struct HeadlineClassifier {
    high_impact: Vec<String>,
    low_impact: Vec<String>,
}

impl HeadlineClassifier {
    pub fn new<H, L>(high_impact: H, low_impact: L) -> Self
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        Self {
            high_impact: lowered(high_impact),
            low_impact: lowered(low_impact),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.high_impact_keywords, &config.low_impact_keywords)
    }

    pub fn classify(&self, headline: &str) -> HeadlineImpact {
        let text = headline.to_lowercase();

        if self.high_impact.iter().any(|kw| text.contains(kw.as_str())) {
            HeadlineImpact::High
        } else if self.low_impact.iter().any(|kw| text.contains(kw.as_str())) {
            HeadlineImpact::Low
        } else {
            HeadlineImpact::Normal
        }
    }
}

fn lowered<I>(keywords: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}
