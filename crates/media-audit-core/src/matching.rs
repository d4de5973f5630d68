use media_audit_models::ManagedMediaRecord;
use std::collections::BTreeMap;

/// Minimum similarity (exclusive) for a match to count. Below this the
/// titles are too different to trust across independently maintained
/// catalogs.
const MATCH_THRESHOLD: f64 = 85.0;

/// Case-insensitive similarity ratio between two titles on a 0-100 scale.
fn similarity_ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) * 100.0
}

/// Resolve a library title against a title-keyed catalog. Returns the record
/// with the highest similarity ratio, and only if that ratio is strictly
/// above the threshold. An equal-scoring later candidate never displaces an
/// earlier one.
pub fn find_best_match<'a>(
    title: &str,
    catalog: &'a BTreeMap<String, ManagedMediaRecord>,
) -> Option<&'a ManagedMediaRecord> {
    let mut best: Option<&ManagedMediaRecord> = None;
    let mut best_ratio = 0.0_f64;

    for (candidate, record) in catalog {
        let ratio = similarity_ratio(title, candidate);
        if ratio > best_ratio {
            best_ratio = ratio;
            best = Some(record);
        }
    }

    if best_ratio > MATCH_THRESHOLD {
        best
    } else {
        None
    }
}
