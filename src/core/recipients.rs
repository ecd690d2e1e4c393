//! Recipient address-list encoding.
//!
//! At the API boundary recipients are an ordered set of addresses; the
//! comma-delimited string is only the storage encoding of that set.

/// Parses the stored delimited string back into the address list.
#[must_use]
pub fn parse(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(ToString::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Normalizes an address list: trims whitespace, drops blanks, removes
/// duplicates while preserving first-seen order.
#[must_use]
pub fn normalize(emails: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    emails
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .filter(|e| seen.insert(e.to_lowercase()))
        .map(ToString::to_string)
        .collect()
}

/// Serializes an address list into the stored delimited form.
/// Returns `None` when nothing remains after normalization.
#[must_use]
pub fn serialize(emails: &[String]) -> Option<String> {
    let normalized = normalize(emails);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_trims_and_drops_blanks() {
        assert_eq!(
            parse(Some(" a@x.mx , ,b@x.mx,")),
            owned(&["a@x.mx", "b@x.mx"])
        );
        assert!(parse(None).is_empty());
        assert!(parse(Some("")).is_empty());
    }

    #[test]
    fn test_normalize_dedupes_preserving_order() {
        let input = owned(&["b@x.mx", "A@x.mx", "a@x.mx", "b@x.mx", "c@x.mx"]);
        assert_eq!(normalize(&input), owned(&["b@x.mx", "A@x.mx", "c@x.mx"]));
    }

    #[test]
    fn test_serialize_round_trip() {
        let input = owned(&["a@x.mx", " b@x.mx "]);
        let stored = serialize(&input).unwrap();
        assert_eq!(stored, "a@x.mx,b@x.mx");
        assert_eq!(parse(Some(&stored)), owned(&["a@x.mx", "b@x.mx"]));
    }

    #[test]
    fn test_serialize_empty_is_none() {
        assert_eq!(serialize(&[]), None);
        assert_eq!(serialize(&owned(&["", "  "])), None);
    }
}
