//! Helpers for building the code lines exported to notebooks.
//!
//! Exported calls follow the notebook runtime's literal syntax, so lists and
//! strings are formatted the way that runtime prints them.

/// Quote a string literal.
pub(crate) fn quote(value: &str) -> String {
    format!("'{value}'")
}

/// Format column names as a list literal, e.g. `['a', 'b']`.
pub(crate) fn format_string_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Format column pairs as a list of tuples, e.g. `[('a', 'b'), ('c', 'd')]`.
pub(crate) fn format_pair_list(pairs: &[(String, String)]) -> String {
    let formatted: Vec<String> = pairs
        .iter()
        .map(|(x, y)| format!("({}, {})", quote(x), quote(y)))
        .collect();
    format!("[{}]", formatted.join(", "))
}

/// Union import lists, keeping first-seen order and dropping duplicates.
pub(crate) fn union_imports<I>(sets: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut merged: Vec<String> = Vec::new();
    for set in sets {
        for import in set {
            if !merged.contains(&import) {
                merged.push(import);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_string_list() {
        let items = vec!["a".to_string(), "b".to_string()];
        assert_eq!(format_string_list(&items), "['a', 'b']");
        assert_eq!(format_string_list(&[]), "[]");
    }

    #[test]
    fn test_format_pair_list() {
        let pairs = vec![
            ("a".to_string(), "b".to_string()),
            ("c".to_string(), "d".to_string()),
        ];
        assert_eq!(format_pair_list(&pairs), "[('a', 'b'), ('c', 'd')]");
    }

    #[test]
    fn test_union_imports_keeps_first_seen_order() {
        let merged = union_imports([
            vec!["import a".to_string(), "import b".to_string()],
            vec!["import b".to_string(), "import c".to_string()],
        ]);
        assert_eq!(merged, vec!["import a", "import b", "import c"]);
    }
}
