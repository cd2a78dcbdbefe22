//! Comment-aware substring search shared by every scanner in the crate.
//!
//! All offsets are byte offsets into the scanned text. Needles are ASCII, so any
//! offset returned by a search is also a valid `str` slicing boundary.

/// Bytes that may precede a keyword for the match to count as a whole word.
const WORD_BOUNDARY: &[u8] = b"\n\t :(,";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Token,
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Next occurrence of `keyword` at or after `from` that is outside comments and
/// preceded by a word boundary.
pub fn find_keyword(input: &str, keyword: &str, from: usize) -> Option<usize> {
    find_str(input, keyword, from, Mode::Keyword, Direction::Forward)
}

/// Last occurrence of `keyword` starting at or before `from`, with the same
/// filtering as [`find_keyword`].
pub fn rfind_keyword(input: &str, keyword: &str, from: usize) -> Option<usize> {
    find_str(input, keyword, from, Mode::Keyword, Direction::Backward)
}

/// Next occurrence of `token` at or after `from` that is outside comments.
pub fn find_token(input: &str, token: &str, from: usize) -> Option<usize> {
    find_str(input, token, from, Mode::Token, Direction::Forward)
}

/// Last occurrence of `token` starting at or before `from` that is outside comments.
pub fn rfind_token(input: &str, token: &str, from: usize) -> Option<usize> {
    find_str(input, token, from, Mode::Token, Direction::Backward)
}

/// True when `offset` sits inside a block comment or after a line comment opener.
///
/// Decided purely from the nearest preceding markers, so string literals and
/// nested comments are not understood.
pub fn is_in_comment(input: &str, offset: usize) -> bool {
    let bytes = input.as_bytes();
    rfind_bytes(bytes, b"/*", offset) > rfind_bytes(bytes, b"*/", offset)
        || rfind_bytes(bytes, b"//", offset) > rfind_bytes(bytes, b"\n", offset)
}

/// 1-based line and column of a byte offset.
pub fn line_col(input: &str, offset: usize) -> (usize, usize) {
    let bytes = input.as_bytes();
    let offset = offset.min(bytes.len());
    let before = &bytes[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    (line, offset - line_start + 1)
}

/// The full line containing `offset`, without its newline.
pub fn line_at(input: &str, offset: usize) -> &str {
    let bytes = input.as_bytes();
    let offset = offset.min(bytes.len());
    let start = bytes[..offset]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    let end = bytes[offset..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |pos| offset + pos);
    input[start..end].trim_end_matches('\r')
}

fn find_str(
    input: &str,
    needle: &str,
    from: usize,
    mode: Mode,
    direction: Direction,
) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut offset = from;
    loop {
        let found = match direction {
            Direction::Forward => find_bytes(bytes, needle.as_bytes(), offset)?,
            Direction::Backward => rfind_bytes(bytes, needle.as_bytes(), offset)?,
        };
        if found > 0 {
            let not_a_word =
                mode == Mode::Keyword && !WORD_BOUNDARY.contains(&bytes[found - 1]);
            if not_a_word || is_in_comment(input, found) {
                offset = match direction {
                    Direction::Forward => found + 1,
                    Direction::Backward => found - 1,
                };
                continue;
            }
        }
        return Some(found);
    }
}

fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

fn rfind_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    let last_start = from.min(haystack.len() - needle.len());
    (0..=last_start)
        .rev()
        .find(|&start| &haystack[start..start + needle.len()] == needle)
}
