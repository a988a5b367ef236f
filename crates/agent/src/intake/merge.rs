//! Field merger
//!
//! Last non-empty value wins. An empty or missing extraction means the model
//! did not mention the field this turn, never that the user cleared it.

use super::fields::FieldSet;

/// Combine the confirmed fields with this turn's extraction
pub fn merge_fields(confirmed: &FieldSet, extracted: &FieldSet) -> FieldSet {
    let mut merged = confirmed.clone();
    for (key, value) in extracted.iter() {
        if merged.get(key) != value {
            tracing::debug!(field = %key, "Field updated from extraction");
        }
        merged.set(key, value);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::fields::FieldKey;

    fn confirmed() -> FieldSet {
        FieldSet::new()
            .with(FieldKey::Name, "张三")
            .with(FieldKey::Company, "ABC")
            .with(FieldKey::Phone, "111")
    }

    #[test]
    fn test_non_empty_overwrites() {
        let merged = merge_fields(&confirmed(), &FieldSet::new().with(FieldKey::Phone, "222"));
        assert_eq!(merged.get(FieldKey::Phone), "222");
        assert_eq!(merged.get(FieldKey::Name), "张三");
    }

    #[test]
    fn test_empty_never_clears() {
        let extracted = FieldSet::from_pairs([("phone", ""), ("name", "  ")]);
        let merged = merge_fields(&confirmed(), &extracted);
        assert_eq!(merged, confirmed());
    }

    #[test]
    fn test_union_of_keys() {
        let extracted = FieldSet::new().with(FieldKey::Email, "zs@abc.com");
        let merged = merge_fields(&confirmed(), &extracted);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.get(FieldKey::Email), "zs@abc.com");
    }

    #[test]
    fn test_merge_is_idempotent_over_empty() {
        let a = confirmed();
        let b = FieldSet::new()
            .with(FieldKey::Phone, "222")
            .with(FieldKey::Budget, "10万");
        let once = merge_fields(&a, &b);
        assert_eq!(merge_fields(&once, &FieldSet::new()), once);
    }

    #[test]
    fn test_sequence_stays_monotonic() {
        let turns = [
            FieldSet::new().with(FieldKey::Name, "张三"),
            FieldSet::new().with(FieldKey::Company, "ABC"),
            FieldSet::from_pairs([("name", ""), ("company", ""), ("email", "a@b.com")]),
            FieldSet::new(),
        ];

        let mut current = FieldSet::new();
        let mut seen: Vec<FieldKey> = Vec::new();
        for extracted in &turns {
            current = merge_fields(&current, extracted);
            for key in &seen {
                assert!(current.is_filled(*key), "{} was cleared", key);
            }
            seen = current.iter().map(|(key, _)| key).collect();
        }
        assert_eq!(current.len(), 3);
    }
}
