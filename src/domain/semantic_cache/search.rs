//! Linear nearest-neighbour search shared by the cache backends

use super::CachedEntry;
use crate::domain::DomainError;
use crate::domain::embedding::cosine_distance;

/// Reject vectors whose length differs from the cache dimensionality
pub fn ensure_dimensions(expected: usize, vector: &[f32]) -> Result<(), DomainError> {
    if vector.len() != expected {
        return Err(DomainError::dimension_mismatch(expected, vector.len()));
    }

    Ok(())
}

/// Closest non-expired entry within `threshold`, with its distance.
/// Entries of a different length than `query` are never candidates.
pub fn nearest<'a, I>(entries: I, query: &[f32], threshold: f32) -> Option<(&'a CachedEntry, f32)>
where
    I: IntoIterator<Item = &'a CachedEntry>,
{
    entries
        .into_iter()
        .filter(|entry| !entry.is_expired() && entry.embedding().len() == query.len())
        .map(|entry| (entry, cosine_distance(query, entry.embedding())))
        .filter(|(_, distance)| *distance <= threshold)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, vector: Vec<f32>) -> CachedEntry {
        CachedEntry::new(id, vector, id, format!("response {}", id), None)
    }

    #[test]
    fn test_ensure_dimensions() {
        assert!(ensure_dimensions(3, &[0.0, 0.0, 0.0]).is_ok());

        let err = ensure_dimensions(768, &vec![0.0; 384]).unwrap_err();
        assert!(matches!(
            err,
            DomainError::DimensionMismatch {
                expected: 768,
                actual: 384
            }
        ));
    }

    #[test]
    fn test_nearest_skips_entries_of_other_length() {
        let entries = vec![entry("stale", vec![0.0, 1.0, 0.0]), entry("fresh", vec![0.0, 1.0])];

        assert!(nearest(&entries[..1], &[1.0, 0.0], 2.0).is_none());

        let (found, _) = nearest(&entries, &[1.0, 0.0], 2.0).unwrap();
        assert_eq!(found.id(), "fresh");
    }

    #[test]
    fn test_nearest_picks_closest() {
        let entries = vec![
            entry("far", vec![0.0, 1.0]),
            entry("close", vec![1.0, 0.05]),
            entry("exact", vec![1.0, 0.0]),
        ];

        let (found, distance) = nearest(&entries, &[1.0, 0.0], 0.1).unwrap();

        assert_eq!(found.id(), "exact");
        assert!(distance.abs() < 1e-6);
    }

    #[test]
    fn test_nearest_respects_threshold() {
        let entries = vec![entry("far", vec![0.0, 1.0])];

        assert!(nearest(&entries, &[1.0, 0.0], 0.1).is_none());
        assert!(nearest(&entries, &[1.0, 0.0], 1.0).is_some());
    }

    #[test]
    fn test_nearest_skips_expired() {
        let expired = CachedEntry::new(
            "old",
            vec![1.0, 0.0],
            "old",
            "old",
            Some(std::time::Duration::from_secs(0)),
        );

        assert!(nearest([&expired], &[1.0, 0.0], 0.1).is_none());
    }

    #[test]
    fn test_nearest_empty() {
        let entries: Vec<CachedEntry> = Vec::new();
        assert!(nearest(&entries, &[1.0], 0.1).is_none());
    }
}
