//! Unquoting of templated low-level scalars
//!
//! Values such as `replicas: ${REPLICAS}` are placeholders filled in at
//! deploy time. The YAML serializer sees them as strings and may quote
//! them, which would make the substituted value a string too. `serde_yaml`
//! has no way to mark a single value as raw, so the fix is applied to the
//! serialized text: on each line that starts with an allowed low-level key,
//! possibly behind sequence item markers, every quote character after the
//! first `:` is dropped.

/// Strip quote characters from the values of `keys` in serialized YAML.
///
/// A line matches when its text, ignoring leading indentation and any
/// `- ` sequence markers, starts with `<key>:`. Only the part after the first `:` is touched; all other lines
/// are returned unchanged.
pub fn unquote_scalar_keys<S: AsRef<str>>(text: &str, keys: &[S]) -> String {
    text.split('\n')
        .map(|line| unquote_line(line, keys))
        .collect::<Vec<_>>()
        .join("\n")
}

fn unquote_line<S: AsRef<str>>(line: &str, keys: &[S]) -> String {
    let trimmed = entry_text(line);
    let matches = keys.iter().any(|key| {
        trimmed
            .strip_prefix(key.as_ref())
            .is_some_and(|rest| rest.starts_with(':'))
    });
    if !matches {
        return line.to_string();
    }

    match line.split_once(':') {
        Some((key, value)) => format!("{}:{}", key, value.replace(['"', '\''], "")),
        None => line.to_string(),
    }
}

/// The line with indentation and leading `- ` item markers removed.
fn entry_text(line: &str) -> &str {
    let mut rest = line.trim_start();
    while let Some(item) = rest.strip_prefix("- ") {
        rest = item.trim_start();
    }
    rest
}
