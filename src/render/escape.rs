const TRIPLE_ASTERISK: &str = "***";
const ESCAPED_TRIPLE_ASTERISK: &str = "\\*\\*\\*";

/// Escape the sequences the static-site loader treats specially inside front-matter strings:
/// backticks, double quotes and `***`.
pub fn escape(text: &str) -> String {
    text.replace('`', "\\`")
        .replace('"', "\\\"")
        .replace(TRIPLE_ASTERISK, ESCAPED_TRIPLE_ASTERISK)
}

/// Reverse [`escape`].
pub fn unescape(text: &str) -> String {
    text.replace(ESCAPED_TRIPLE_ASTERISK, TRIPLE_ASTERISK)
        .replace("\\\"", "\"")
        .replace("\\`", "`")
}
