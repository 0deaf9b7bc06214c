use unicode_width::UnicodeWidthStr;

/// Columns `text` occupies on a terminal, ANSI styling escapes excluded.
pub fn display_width(text: &str) -> usize {
    strip_ansi_escapes::strip_str(text).width()
}

/// Widest line and line count of `text`. Empty text still occupies one line.
pub fn text_extent(text: &str) -> (usize, usize) {
    let (widest, lines) = text
        .lines()
        .fold((0, 0), |(widest, lines), line| {
            (widest.max(display_width(line)), lines + 1)
        });
    (widest, lines.max(1))
}
