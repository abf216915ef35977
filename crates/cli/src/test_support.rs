use std::borrow::Cow;

const ESC: char = '\u{1b}';

/// Removes CSI escape sequences (`ESC [ params final`) from colored output.
pub fn strip_ansi(input: &str) -> Cow<'_, str> {
    let Some(start) = input.find(ESC) else {
        return Cow::Borrowed(input);
    };

    let mut plain = String::from(&input[..start]);
    let mut rest = input[start..].chars().peekable();
    while let Some(ch) = rest.next() {
        if ch != ESC {
            plain.push(ch);
            continue;
        }
        if rest.next_if_eq(&'[').is_none() {
            continue;
        }
        // parameter and intermediate bytes run until a final byte in '@'..='~'
        rest.by_ref().find(|byte| ('@'..='~').contains(byte));
    }
    Cow::Owned(plain)
}

#[cfg(test)]
mod tests {
    use super::strip_ansi;
    use rstest::rstest;
    use std::borrow::Cow;

    #[rstest]
    #[case("plain", "plain")]
    #[case("\u{1b}[1mbold\u{1b}[0m", "bold")]
    #[case("a=\u{1b}[38;2;136;192;74m7\u{1b}[39m b", "a=7 b")]
    #[case("\u{1b}[2Kcleared", "cleared")]
    #[case("tail\u{1b}[", "tail")]
    fn strips_color_sequences(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(strip_ansi(input), expected);
    }

    #[rstest]
    fn borrows_when_nothing_to_strip() {
        assert!(matches!(strip_ansi("name=\"ann\""), Cow::Borrowed(_)));
    }
}
