//! Label suggestions for relabeling.

/// Maximum number of suggestions returned.
pub const MAX_SUGGESTIONS: usize = 5;

/// Labels that contain `input` case-insensitively, excluding an exact
/// (case-insensitive) match, in first-occurrence order.
///
/// Duplicates in `labels` are reported once. An empty input suggests
/// nothing.
///
/// ```
/// use motfix::edit::suggest_labels;
///
/// let labels = ["Car", "Pedestrian", "Bicycle"];
/// assert_eq!(suggest_labels("Pe", labels), vec!["Pedestrian"]);
/// ```
pub fn suggest_labels<I, S>(input: &str, labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if input.is_empty() {
        return Vec::new();
    }
    let needle = input.to_lowercase();

    let mut out: Vec<String> = Vec::new();
    for label in labels {
        if out.len() == MAX_SUGGESTIONS {
            break;
        }
        let label = label.as_ref();
        let lower = label.to_lowercase();
        if lower.contains(&needle) && lower != needle && !out.iter().any(|s| s == label) {
            out.push(label.to_string());
        }
    }
    out
}
