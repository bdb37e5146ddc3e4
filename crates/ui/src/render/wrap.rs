use unicode_width::UnicodeWidthStr;

/// Word-wrap `text` to `width` columns, starting every line with `prefix`.
///
/// Text that already fits is kept as written, minus trailing whitespace.
/// Otherwise words are split on whitespace and rejoined with single spaces. A
/// word wider than `width` is kept whole on its own line. Text with no words is
/// returned unchanged.
pub fn wrap(text: &str, width: usize, prefix: &str) -> String {
    let mut words = text.split_whitespace();
    let Some(first) = words.next() else {
        return text.to_string();
    };

    let trimmed = text.trim_end();
    if trimmed.width() <= width {
        return format!("{prefix}{trimmed}");
    }

    let mut wrapped = String::with_capacity(text.len() + prefix.len());
    wrapped.push_str(prefix);
    wrapped.push_str(first);
    let mut line_width = first.width();

    for word in words {
        let word_width = word.width();
        if line_width + 1 + word_width > width {
            wrapped.push('\n');
            wrapped.push_str(prefix);
            wrapped.push_str(word);
            line_width = word_width;
        } else {
            wrapped.push(' ');
            wrapped.push_str(word);
            line_width += 1 + word_width;
        }
    }

    wrapped
}
