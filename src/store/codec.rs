//! Line framing for the storage file. Fields are joined with `|` and written
//! verbatim, which is the plain format every existing file uses. Only when a
//! field itself contains a pipe is the line written in the escaped format:
//! a leading `\` marker, then fields where a literal pipe or backslash is
//! written as `\|` or `\\`. A plain line can never start with `\` because
//! its first field is a numeric id, so the two formats do not overlap.

/// Separator between the fields of a stored record.
pub const FIELD_DELIMITER: char = '|';
const ESCAPE: char = '\\';
/// First character of a line written in the escaped format.
const ESCAPED_MARKER: char = ESCAPE;

/// Escape a single field so it can be embedded in an escaped line.
pub(crate) fn escape_field(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch == FIELD_DELIMITER || ch == ESCAPE {
            escaped.push(ESCAPE);
        }
        escaped.push(ch);
    }
    escaped
}

/// Join unescaped fields into one encoded line (without newline). Falls back
/// to the escaped format only when a field contains the delimiter.
pub(crate) fn join_fields<'a, I>(fields: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let fields: Vec<&str> = fields.into_iter().collect();
    let escaped = fields.iter().any(|field| field.contains(FIELD_DELIMITER));

    let mut line = String::new();
    if escaped {
        line.push(ESCAPED_MARKER);
    }
    for (idx, field) in fields.iter().enumerate() {
        if idx > 0 {
            line.push(FIELD_DELIMITER);
        }
        if escaped {
            line.push_str(&escape_field(field));
        } else {
            line.push_str(field);
        }
    }
    line
}

/// Split a line into fields. Plain lines are cut on the first `count - 1`
/// delimiters, so the last field keeps whatever follows. Escaped lines are
/// split on every unescaped delimiter.
pub(crate) fn split_fields(line: &str, count: usize) -> Vec<String> {
    match line.strip_prefix(ESCAPED_MARKER) {
        Some(rest) => split_escaped(rest),
        None => line
            .splitn(count, FIELD_DELIMITER)
            .map(str::to_string)
            .collect(),
    }
}

fn split_escaped(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            ESCAPE => match chars.peek().copied() {
                Some(next) if next == FIELD_DELIMITER || next == ESCAPE => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push(ch),
            },
            FIELD_DELIMITER => fields.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
