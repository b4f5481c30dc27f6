/// Literal substrings replaced by a single space, applied in this order.
///
/// `''` and the trailing duplicate `'` / `[` entries are kept so the output
/// matches the text the artifacts were fit on byte for byte.
const REPLACEMENTS: &[&str] = &[
    "//", ".", "https:", "_", "-", "/", "''", "'", "[", "=", "]", "[", ")", "(", "\\n", "\\t",
    "\\", "@", "<", ">", "'",
];

/// Strip URL fragments, brackets and markup punctuation from raw thread text.
pub fn normalize(text: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, pattern| acc.replace(pattern, " "))
}
