
/// Splits a comma-separated facet list into trimmed identifiers.
/// Empty positions are kept so the arity of the input is preserved.
#[inline]
pub fn split_facets(s: &str) -> Vec<String> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split(',').map(|facet| facet.trim().to_string()).collect()
}


#[inline]
pub fn is_skippable_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}
