/// Strip control characters and unknown symbols, keep the punctuation lab
/// reports rely on. Greek mu becomes the micro sign, tabs and pipes survive
/// for the whitespace-collapse step. Returns trimmed, non-empty lines.
pub fn sanitize_page(raw: &str) -> Vec<String> {
    raw.chars()
        .map(|c| if c == 'μ' { 'µ' } else { c })
        .filter(|&c| is_kept(c))
        .collect::<String>()
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_kept(c: char) -> bool {
    if c == '\n' || c == '\t' || c == ' ' {
        return true;
    }
    if c.is_control() {
        return false;
    }
    c.is_alphanumeric()
        || c.is_whitespace()
        || matches!(
            c,
            '.' | ','
                | ';'
                | ':'
                | '-'
                | '/'
                | '('
                | ')'
                | '['
                | ']'
                | '+'
                | '='
                | '%'
                | '#'
                | '&'
                | '\''
                | '"'
                | '<'
                | '>'
                | '*'
                | '_'
                | '^'
                | '|'
                | '~'
                | '°'
                | '²'
                | '³'
                | '¹'
                | '⁶'
                | '⁹'
                | 'µ'
                | '×'
                | '±'
                | '≤'
                | '≥'
                | '↑'
                | '↓'
                | '\u{2013}' // En-dash –
                | '\u{2014}' // Em-dash —
                | '\u{2019}'
                | '\u{2018}'
        )
}
