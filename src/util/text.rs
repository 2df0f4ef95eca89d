use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ESC: char = '\x1b';
const BEL: char = '\x07';
const ELLIPSIS: &str = "...";

/// Makes chat text safe to print as a single terminal line.
///
/// Chat messages are user-controlled, so before printing we drop ANSI CSI
/// (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ESC \`) sequences, bare ESC,
/// DEL and C0 controls. Tabs, newlines and carriage returns become spaces so
/// a message never spans more than one line.
///
/// Returns `Cow::Borrowed` when nothing needs changing.
///
/// ```
/// use vodchat::util::sanitize_for_terminal;
///
/// assert_eq!(sanitize_for_terminal("\x1b[31mred\x1b[0m text"), "red text");
/// assert_eq!(sanitize_for_terminal("two\nlines"), "two lines");
/// ```
pub fn sanitize_for_terminal(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| c.is_ascii_control()) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESC => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameter and intermediate bytes run until a final byte in 0x40..=0x7e
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == BEL {
                            break;
                        }
                        if c == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' | '\n' | '\r' => out.push(' '),
            c if c.is_ascii_control() => {}
            c => out.push(c),
        }
    }

    Cow::Owned(out)
}

/// Truncates `s` to at most `max_width` terminal columns, ending in `...` when cut.
///
/// Widths are Unicode-aware (CJK and emoji take two columns). When the limit
/// is too narrow for even one character plus the ellipsis, the text is cut
/// without one.
///
/// ```
/// use vodchat::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("PogChamp", 20), "PogChamp");
/// assert_eq!(truncate_to_width("hello chat", 8), "hello...");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let ellipsis_width = UnicodeWidthStr::width(ELLIPSIS);
    let (budget, suffix) = if max_width > ellipsis_width {
        (max_width - ellipsis_width, ELLIPSIS)
    } else {
        (max_width, "")
    };

    let mut width = 0;
    let mut cut = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        cut = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..cut], suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_is_borrowed() {
        let input = "KEKW that was close 😂";
        assert!(matches!(sanitize_for_terminal(input), Cow::Borrowed(_)));
    }

    #[test]
    fn test_newlines_and_tabs_flattened() {
        assert_eq!(sanitize_for_terminal("a\tb\r\nc"), "a b  c");
    }

    #[test]
    fn test_c0_and_del_removed() {
        assert_eq!(sanitize_for_terminal("he\x00ll\x07o\x7f!"), "hello!");
    }

    #[test]
    fn test_csi_sequences_removed() {
        assert_eq!(sanitize_for_terminal("\x1b[1;31mbold red\x1b[0m"), "bold red");
        assert_eq!(sanitize_for_terminal("up\x1b[2Ahere"), "uphere");
    }

    #[test]
    fn test_osc_sequences_removed() {
        assert_eq!(sanitize_for_terminal("\x1b]0;title\x07chat"), "chat");
        assert_eq!(sanitize_for_terminal("\x1b]8;;http://x\x1b\\link"), "link");
    }

    #[test]
    fn test_bare_escape_removed() {
        assert_eq!(sanitize_for_terminal("a\x1bb"), "ab");
    }

    #[test]
    fn test_unicode_preserved() {
        assert_eq!(sanitize_for_terminal("日本語\x1b[31m テスト"), "日本語 テスト");
    }

    #[test]
    fn test_truncate_fits() {
        assert_eq!(truncate_to_width("short", 5), "short");
        assert_eq!(truncate_to_width("", 0), "");
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("Testing", 4), "T...");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // 4 columns for two CJK chars plus the ellipsis
        assert_eq!(truncate_to_width("日本語テスト", 7), "日本...");
        assert_eq!(truncate_to_width("日本語テスト", 6), "日...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test", 0), "");
        assert_eq!(truncate_to_width("Test", 2), "Te");
        assert_eq!(truncate_to_width("Test", 3), "Tes");
        assert_eq!(truncate_to_width("日本", 1), "");
    }
}
