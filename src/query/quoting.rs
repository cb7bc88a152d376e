//! Literal/expression classification for script arguments.
//!
//! A string argument is wrapped in apostrophes unless it looks like
//! executable JavaScript. "Looks like" is a heuristic over the first
//! `(`-delimited and `.`-delimited tokens, not a parser: a literal that
//! happens to start with the word `document` is misclassified as an
//! expression. That quirk is documented observable behavior, kept on
//! purpose.

/// Whether `parameter` must be wrapped in apostrophes before being spliced
/// into a jQuery call.
///
/// Returns `false` (treated as executable JavaScript) when the token before
/// the first `(` contains `function`, `$` or `jQuery`, or the token before
/// the first `.` contains `document`. Everything else is a literal.
pub fn requires_apostrophe(parameter: &str) -> bool {
    let before_paren = parameter.split('(').next().unwrap_or(parameter);
    let before_dot = parameter.split('.').next().unwrap_or(parameter);
    !(before_paren.contains("function")
        || before_dot.contains("document")
        || before_paren.contains('$')
        || before_paren.contains("jQuery"))
}

/// Quotes `parameter` per [`requires_apostrophe`], or passes it through
/// verbatim when it classifies as an expression.
pub fn quote_argument(parameter: &str) -> String {
    if requires_apostrophe(parameter) {
        format!("'{}'", parameter)
    } else {
        parameter.to_string()
    }
}

/// Quotes each content item individually and joins them with commas, the
/// argument form `after`/`append` splice into their calls.
pub(crate) fn join_quoted(content: &[&str]) -> String {
    content
        .iter()
        .map(|item| quote_argument(item))
        .collect::<Vec<_>>()
        .join(",")
}
