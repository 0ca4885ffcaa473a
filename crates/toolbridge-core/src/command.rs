//! Command-line templating.

use toolbridge_config::INPUT_PLACEHOLDER;

/// Expands `template` with `value`.
///
/// Every `${INPUT}` placeholder is replaced by `value`. A template without a
/// placeholder gets `value` appended after a single space. No quoting is
/// applied; templates are shell syntax and may contain pipes or several
/// commands.
#[must_use]
pub fn build(template: &str, value: &str) -> String {
    if template.contains(INPUT_PLACEHOLDER) {
        template.replace(INPUT_PLACEHOLDER, value)
    } else {
        format!("{template} {value}")
    }
}
