//! Usage aggregation

use crate::contract::{
    FeatureUsage, ModelUsage, ProviderKind, UsageRecord, UsageSummary, UsageTotals,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

impl UsageTotals {
    fn add(&mut self, record: &UsageRecord) {
        self.requests += 1;
        if !record.success {
            self.failures += 1;
        }
        self.input_tokens += u64::from(record.input_tokens);
        self.output_tokens += u64::from(record.output_tokens);
        self.cost_micros += record.cost_micros;
    }
}

/// Fold usage rows into totals plus per-model and per-feature breakdowns.
///
/// Breakdowns are ordered by cost, most expensive first, then by name.
pub fn summarize(
    records: &[UsageRecord],
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> UsageSummary {
    let mut totals = UsageTotals::default();
    let mut by_model: BTreeMap<(ProviderKind, String), UsageTotals> = BTreeMap::new();
    let mut by_feature: BTreeMap<String, UsageTotals> = BTreeMap::new();

    for record in records {
        totals.add(record);
        by_model
            .entry((record.provider, record.model.clone()))
            .or_default()
            .add(record);
        by_feature.entry(record.feature.clone()).or_default().add(record);
    }

    let mut by_model: Vec<ModelUsage> = by_model
        .into_iter()
        .map(|((provider, model), totals)| ModelUsage {
            provider,
            model,
            totals,
        })
        .collect();
    by_model.sort_by(|a, b| b.totals.cost_micros.cmp(&a.totals.cost_micros));

    let mut by_feature: Vec<FeatureUsage> = by_feature
        .into_iter()
        .map(|(feature, totals)| FeatureUsage { feature, totals })
        .collect();
    by_feature.sort_by(|a, b| b.totals.cost_micros.cmp(&a.totals.cost_micros));

    UsageSummary {
        from,
        to,
        totals,
        by_model,
        by_feature,
    }
}
