/// Byte cursor over markup source.
///
/// Everything the tokenizer stops on is ASCII, so slices taken between two
/// stop positions are always on character boundaries.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The source being tokenized.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Peeks `n` bytes ahead of the current one.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + n).copied()
    }

    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes().get(self.i..).is_some_and(|rest| rest.starts_with(pat))
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    pub fn bump_n(&mut self, n: usize) {
        self.i = (self.i + n).min(self.s.len());
    }

    /// Consumes `pat` if the input starts with it.
    pub fn eat(&mut self, pat: &[u8]) -> bool {
        if self.starts_with(pat) {
            self.bump_n(pat.len());
            true
        } else {
            false
        }
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.i += 1;
        }
    }

    /// Consumes bytes while `pred` holds and returns them.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.i;
        while self.peek().is_some_and(&pred) {
            self.i += 1;
        }
        &self.s[start..self.i]
    }

    /// Moves past the next occurrence of `pat`, returning the text before it.
    /// Returns `None` and leaves the cursor alone when `pat` never occurs.
    pub fn take_through(&mut self, pat: &str) -> Option<&'a str> {
        let rest = self.s.get(self.i..)?;
        let at = rest.find(pat)?;
        self.i += at + pat.len();
        Some(&rest[..at])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("<b>");
        assert_eq!(cur.pos(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some(b'<'));
        assert_eq!(cur.peek_at(1), Some(b'b'));
        assert_eq!(cur.bump(), Some(b'<'));
        assert_eq!(cur.pos(), 1);
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert!(cur.starts_with(b""));
    }

    #[test]
    fn eat_only_on_match() {
        let mut cur = Cursor::new("<!-- x -->");
        assert!(!cur.eat(b"</"));
        assert!(cur.eat(b"<!--"));
        assert_eq!(cur.take_through("-->"), Some(" x "));
        assert!(cur.eof());
    }

    #[test]
    fn take_through_missing_pattern() {
        let mut cur = Cursor::new("abc");
        assert_eq!(cur.take_through(">"), None);
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn take_while_stops_at_predicate() {
        let mut cur = Cursor::new("span style");
        assert_eq!(cur.take_while(|b| b.is_ascii_alphanumeric()), "span");
        cur.skip_whitespace();
        assert_eq!(cur.peek(), Some(b's'));
    }

    #[test]
    fn bump_n_clamps_at_end() {
        let mut cur = Cursor::new("hi");
        cur.bump_n(10);
        assert!(cur.eof());
        assert_eq!(cur.bump(), None);
    }
}
