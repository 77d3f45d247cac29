//! Release message extraction from issue descriptions.

use std::sync::LazyLock;

use regex::Regex;

// A line such as `---Release---` or `--- Release Notes ---`.
#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static RELEASE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[ \t]*-{3,}[ \t]*release(?:[ \t]+notes?)?[ \t]*-{3,}[ \t]*\r?$").unwrap()
});

/// Returns every release section of `description` in document order.
///
/// A section starts right after a marker line and runs until the next marker
/// line or the end of the document. Sections are trimmed; a section may be
/// empty when two markers are adjacent.
pub fn release_sections(description: &str) -> Vec<&str> {
    let markers: Vec<_> = RELEASE_MARKER.find_iter(description).collect();

    markers
        .iter()
        .enumerate()
        .map(|(index, marker)| {
            let end = markers
                .get(index + 1)
                .map_or(description.len(), regex::Match::start);
            description[marker.end()..end].trim()
        })
        .collect()
}

/// Returns the most recent release message in an issue description.
///
/// The last section in document order wins. Returns `None` when there is no
/// description, no marker, or the last section is blank.
pub fn extract_last_release_message(description: Option<&str>) -> Option<String> {
    release_sections(description?)
        .pop()
        .filter(|section| !section.is_empty())
        .map(str::to_string)
}
