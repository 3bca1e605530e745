//! Cross-source link reconciliation.
//!
//! Validates one target (derived) link index against a primary reference
//! index and a secondary cache index. Presence problems are soft and
//! accumulate; any count-fidelity violation hard-fails the target.

use crate::extract::UrlKeyIndex;
use serde::Serialize;

/// One (url, key) pair flagged by a presence check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairRef {
    pub url: String,
    pub key: String,
}

/// Per-URL record of a count-fidelity violation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountMismatch {
    pub url: String,
    /// Representative pre-normalization string, when one was observed.
    pub original: Option<String>,
    pub target_keys: Vec<String>,
    pub target_count: usize,
    pub primary_count: usize,
    pub secondary_count: usize,
}

/// Per-source pair/URL totals, for the report header.
#[derive(Debug, Clone, Serialize)]
pub struct SourceTotals {
    pub unique_urls: usize,
    pub pairs: usize,
}

/// Outcome of one reconciliation run. Built fresh per run, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub primary: SourceTotals,
    pub secondary: SourceTotals,
    pub target: SourceTotals,
    /// Pairs in primary that the target lacks (soft).
    pub missing_in_target: Vec<PairRef>,
    /// Pairs in the target absent from both reference sources (soft).
    pub orphan_in_target: Vec<PairRef>,
    /// Fidelity-rule violations (hard; any entry fails the run).
    pub count_mismatches: Vec<CountMismatch>,
    pub verdict: bool,
}

impl ReconciliationReport {
    /// True when a hard failure is present, regardless of verdict
    /// composition.
    pub fn has_hard_failure(&self) -> bool {
        !self.count_mismatches.is_empty()
    }
}

fn totals(index: &UrlKeyIndex) -> SourceTotals {
    SourceTotals {
        unique_urls: index.unique_url_count(),
        pairs: index.pair_count(),
    }
}

/// Apply the presence and count-fidelity rules across the three sources.
///
/// The fidelity rule for a target URL: the target's distinct-key count
/// must equal the primary's, or — when the primary never saw the URL but
/// the secondary did — equal the secondary's. Every violating URL is
/// collected before the verdict is decided; a non-empty violation set
/// yields a failing verdict outright, and only in its absence do the soft
/// presence sets decide.
pub fn reconcile(
    primary: &UrlKeyIndex,
    secondary: &UrlKeyIndex,
    target: &UrlKeyIndex,
) -> ReconciliationReport {
    let missing_in_target: Vec<PairRef> = primary
        .pairs()
        .filter(|(url, key)| !target.contains_pair(url, key))
        .map(|(url, key)| PairRef {
            url: url.to_string(),
            key: key.to_string(),
        })
        .collect();

    let orphan_in_target: Vec<PairRef> = target
        .pairs()
        .filter(|(url, key)| {
            !primary.contains_pair(url, key) && !secondary.contains_pair(url, key)
        })
        .map(|(url, key)| PairRef {
            url: url.to_string(),
            key: key.to_string(),
        })
        .collect();

    let mut count_mismatches = Vec::new();
    for url in target.urls() {
        let target_count = target.key_count(url);
        let primary_count = primary.key_count(url);
        let secondary_count = secondary.key_count(url);

        let primary_form = target_count == primary_count;
        let fallback_form =
            primary_count == 0 && secondary_count > 0 && target_count == secondary_count;
        if !(primary_form || fallback_form) {
            count_mismatches.push(CountMismatch {
                url: url.to_string(),
                original: target.original_for(url).map(String::from),
                target_keys: target.keys_for(url),
                target_count,
                primary_count,
                secondary_count,
            });
        }
    }

    let verdict = if count_mismatches.is_empty() {
        missing_in_target.is_empty() && orphan_in_target.is_empty()
    } else {
        false
    };

    ReconciliationReport {
        primary: totals(primary),
        secondary: totals(secondary),
        target: totals(target),
        missing_in_target,
        orphan_in_target,
        count_mismatches,
        verdict,
    }
}
