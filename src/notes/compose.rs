//! Comment composition.

use crate::data::IssueRecord;

/// Fixed tag that opens every issue heading.
pub const HEADING_TAG: &str = "TECH";

/// Issue-type labels in the order they are preferred for the heading.
pub const DEFAULT_LABEL_PRIORITY: [&str; 3] = ["bug", "feature", "chore"];

/// Fence used by the chat rendering of a comment.
pub const CHAT_FENCE: &str = "```";

/// Characters rendered as a plain `"` in issue titles.
const DOUBLE_QUOTE_LOOKALIKES: [char; 8] = [
    '\u{201C}', // “
    '\u{201D}', // ”
    '\u{201E}', // „
    '\u{201F}', // ‟
    '\u{2033}', // ″
    '\u{FF02}', // ＂
    '\u{00AB}', // «
    '\u{00BB}', // »
];

/// Returns the first label of `label_priority` that the issue carries.
pub fn issue_type_tag<'p, S: AsRef<str>>(
    issue: &IssueRecord,
    label_priority: &'p [S],
) -> Option<&'p str> {
    label_priority
        .iter()
        .map(AsRef::<str>::as_ref)
        .find(|label| issue.has_label(label))
}

/// Normalizes quote lookalikes and trims surrounding whitespace.
fn normalize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if DOUBLE_QUOTE_LOOKALIKES.contains(&c) {
                '"'
            } else {
                c
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn heading(issue: &IssueRecord, tag: Option<&str>) -> String {
    let title = normalize_title(&issue.title);
    match tag {
        Some(tag) => format!("**{HEADING_TAG} ({tag})**: {title}"),
        None => format!("**{HEADING_TAG}**: {title}"),
    }
}

/// Builds the comment body for `issues`.
///
/// Each issue becomes one block, in the order given:
///
/// ```text
/// **TECH (bug)**: <title>
/// <release message, if any>
/// Link: <url>
///
/// ```
///
/// `extract` receives the issue description and returns its release
/// message. An empty slice yields an empty string.
pub fn compose<F, S>(issues: &[IssueRecord], extract: F, label_priority: &[S]) -> String
where
    F: Fn(Option<&str>) -> Option<String>,
    S: AsRef<str>,
{
    let mut body = String::new();

    for issue in issues {
        body.push_str(&heading(issue, issue_type_tag(issue, label_priority)));
        body.push('\n');

        if let Some(message) = extract(issue.description.as_deref()) {
            body.push_str(&message);
            body.push('\n');
        }

        body.push_str(&format!("Link: {}\n\n", issue.url));
    }

    body
}

/// Renders a comment body for a chat system's code-block convention.
///
/// Double emphasis (`**`) becomes single emphasis (`*`) and the body is
/// wrapped in a ```` ``` ```` fence. Nothing else is changed.
pub fn to_chat_code_block(body: &str) -> String {
    format!("{CHAT_FENCE}{}{CHAT_FENCE}", body.replace("**", "*"))
}
