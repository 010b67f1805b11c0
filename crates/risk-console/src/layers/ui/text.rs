// Server-supplied strings (labels, error messages) are drawn as-is, so strip
// anything that could move the cursor or recolour the terminal first.
pub(super) fn sanitize_text_for_tui(text: &str) -> String {
    let stripped = strip_ansi_sequences(text);
    stripped
        .chars()
        .map(|ch| match ch {
            '\n' | '\r' | '\t' => ' ',
            _ if ch.is_control() => ' ',
            _ => ch,
        })
        .collect()
}

fn strip_ansi_sequences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\u{1b}' {
            out.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('[') => {
                chars.next();
                for seq_ch in chars.by_ref() {
                    if ('@'..='~').contains(&seq_ch) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(seq_ch) = chars.next() {
                    if seq_ch == '\u{7}' {
                        break;
                    }
                    if seq_ch == '\u{1b}' {
                        if chars.peek() == Some(&'\\') {
                            chars.next();
                        }
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}

pub(super) fn display_width(text: &str) -> usize {
    text.chars().count()
}

pub(super) fn pad_right(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    let current = display_width(text);
    if current < width {
        out.extend(std::iter::repeat(' ').take(width - current));
    }
    out
}

pub(super) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let count = display_width(text);
    if count <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return text.chars().take(max_len).collect();
    }
    let mut out: String = text.chars().take(max_len - 3).collect();
    out.push_str("...");
    out
}

/// Caption on the left, hint pushed to the right edge of `width`.
pub(super) fn caption_with_hint(caption: &str, hint: &str, width: usize) -> String {
    let caption_width = display_width(caption);
    if caption_width + 1 >= width {
        return truncate_with_ellipsis(caption, width);
    }
    let hint = truncate_with_ellipsis(hint, width - caption_width - 1);
    let gap = width - caption_width - display_width(&hint);
    format!("{}{}", pad_right(caption, caption_width + gap), hint)
}
