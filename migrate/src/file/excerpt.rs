//! Helpers for pointing at the part of a change file that failed.

/// Converts a byte offset into a 1-based `(line, column)` pair.
///
/// Offsets past the end of `data` are clamped to the end.
pub fn line_column_from_offset(data: &[u8], offset: usize) -> (usize, usize) {
    let offset = offset.min(data.len());
    let preceding = &data[..offset];

    let line = preceding.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = preceding
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|pos| pos + 1)
        .unwrap_or(0);

    (line, offset - line_start + 1)
}

/// Renders the lines surrounding the 1-based `line`: up to `before` lines
/// above it, the line itself and up to `after` lines below it.
///
/// With `numbered` set each line is prefixed with its right-aligned line
/// number, as in `" 9: ..."` / `"10: ..."`.
pub fn lines_around(data: &[u8], line: usize, before: usize, after: usize, numbered: bool) -> String {
    let text = String::from_utf8_lossy(data);
    let lines: Vec<&str> = text.split('\n').collect();

    let target = line.clamp(1, lines.len());
    let first = target.saturating_sub(before).max(1);
    let last = (target + after).min(lines.len());
    let width = last.to_string().len();

    (first..=last)
        .map(|number| {
            let content = lines[number - 1];
            if numbered {
                format!("{:>width$}: {}", number, content, width = width)
            } else {
                content.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
