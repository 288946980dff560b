//! Safe, mechanical rewrites for common macro mistakes.
//!
//! No structural reasoning: every rewrite is a narrow pattern substitution
//! that cannot change what the template computes. Anything more ambitious
//! belongs in the linter's hands, not here.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static INLINE_IF_SET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{%\s*if\s+([^%]+?)\s*%\}\s*\{%\s*set\s+([^%]+?)\s*%\}\s*\{%\s*endif\s*%\}")
        .unwrap()
});

static INLINE_FOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{%\s*for\s+([^%]+?)\s*%\}[ \t]*(.*?)[ \t]*\{%\s*endfor\s*%\}").unwrap());

static DOUBLE_MUSTACHE_VAR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"\n{]*)\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}([^"\n}]*)""#).unwrap()
});

/// Expand one-line `{% if %}{% set %}{% endif %}` and `{% for %}...{% endfor %}`
/// blocks into multi-line form.
fn expand_inline_blocks(text: &str) -> String {
    let text = INLINE_IF_SET_RE.replace_all(text, "{% if $1 %}\n  {% set $2 %}\n{% endif %}");
    INLINE_FOR_RE
        .replace_all(&text, "{% for $1 %}\n  $2\n{% endfor %}")
        .into_owned()
}

/// Convert `{{ var }}` to `{var}` inside a double-quoted string, bare
/// identifiers only. Filters and expressions are left for the linter.
fn convert_double_mustache(text: &str) -> String {
    DOUBLE_MUSTACHE_VAR_RE
        .replace_all(text, |caps: &Captures| {
            format!("\"{}{{{}}}{}\"", &caps[1], &caps[2], &caps[3])
        })
        .into_owned()
}

/// Apply every mechanical rewrite to the text.
pub fn fix_text(text: &str) -> String {
    convert_double_mustache(&expand_inline_blocks(text))
}
