use html_escape::decode_html_entities;

use crate::markup::ParseError;
use crate::markup::attributes::Attributes;
use crate::markup::cursor::Cursor;

/// One item of the flat tag stream the importer consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    Open {
        name: String,
        attributes: Attributes,
        self_closing: bool,
    },
    Close {
        name: String,
    },
    /// Character data with entities decoded.
    Text(String),
}

/// Splits markup into [`TagEvent`]s.
///
/// Comments, doctypes and processing instructions are skipped. Tag and
/// attribute names are lower-cased. A `<` that cannot start a tag is text.
pub struct Tokenizer<'a> {
    cur: Cursor<'a>,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cur: Cursor::new(source),
            failed: false,
        }
    }

    fn at_markup(&self) -> bool {
        if self.cur.peek() != Some(b'<') {
            return false;
        }
        match self.cur.peek_at(1) {
            Some(b'/') => self.cur.peek_at(2).is_some_and(|b| b.is_ascii_alphabetic()),
            Some(b'!' | b'?') => true,
            Some(b) => b.is_ascii_alphabetic(),
            None => false,
        }
    }

    fn syntax(&self, offset: usize, reason: &'static str) -> ParseError {
        ParseError::Syntax { offset, reason }
    }

    fn text(&mut self) -> TagEvent {
        let start = self.cur.pos();
        while !self.cur.eof() {
            if self.at_markup() {
                break;
            }
            self.cur.bump();
        }
        // `<` is ASCII, so the stop position is a char boundary.
        let raw = &self.cur.s[start..self.cur.pos()];
        TagEvent::Text(decode_html_entities(raw).into_owned())
    }

    fn skip_through(&mut self, open: &[u8], close: &str, reason: &'static str) -> Result<(), ParseError> {
        let start = self.cur.pos();
        self.cur.bump_n(open.len());
        self.cur
            .take_through(close)
            .map(|_| ())
            .ok_or_else(|| self.syntax(start, reason))
    }

    fn name(&mut self) -> String {
        self.cur
            .take_while(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':')
            .to_ascii_lowercase()
    }

    fn close_tag(&mut self) -> Result<TagEvent, ParseError> {
        let start = self.cur.pos();
        self.cur.bump_n(2);
        let name = self.name();
        self.cur.skip_whitespace();
        if !self.cur.eat(b">") {
            return Err(self.syntax(start, "unterminated close tag"));
        }
        Ok(TagEvent::Close { name })
    }

    fn open_tag(&mut self) -> Result<TagEvent, ParseError> {
        let start = self.cur.pos();
        self.cur.bump();
        let name = self.name();
        let mut attributes = Attributes::default();

        loop {
            self.cur.skip_whitespace();
            if self.cur.eat(b"/>") {
                return Ok(TagEvent::Open {
                    name,
                    attributes,
                    self_closing: true,
                });
            }
            if self.cur.eat(b">") {
                return Ok(TagEvent::Open {
                    name,
                    attributes,
                    self_closing: false,
                });
            }
            if self.cur.eof() {
                return Err(self.syntax(start, "unterminated tag"));
            }

            let attr_name = self
                .cur
                .take_while(|b| !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/'))
                .to_ascii_lowercase();
            if attr_name.is_empty() {
                // A stray `/` or `=` inside the tag.
                self.cur.bump();
                continue;
            }
            self.cur.skip_whitespace();
            let value = if self.cur.eat(b"=") {
                self.cur.skip_whitespace();
                self.attribute_value(start)?
            } else {
                String::new()
            };
            attributes.push(attr_name, value);
        }
    }

    fn attribute_value(&mut self, tag_start: usize) -> Result<String, ParseError> {
        let raw = match self.cur.peek() {
            Some(quote @ (b'"' | b'\'')) => {
                self.cur.bump();
                let close = if quote == b'"' { "\"" } else { "'" };
                self.cur
                    .take_through(close)
                    .ok_or_else(|| self.syntax(tag_start, "unterminated attribute value"))?
            }
            _ => self.cur.take_while(|b| !b.is_ascii_whitespace() && b != b'>'),
        };
        Ok(decode_html_entities(raw).into_owned())
    }

    fn next_event(&mut self) -> Option<Result<TagEvent, ParseError>> {
        loop {
            if self.cur.eof() {
                return None;
            }
            if !self.at_markup() {
                return Some(Ok(self.text()));
            }
            let skipped = if self.cur.starts_with(b"<!--") {
                self.skip_through(b"<!--", "-->", "unterminated comment")
            } else if self.cur.starts_with(b"<!") {
                self.skip_through(b"<!", ">", "unterminated declaration")
            } else if self.cur.starts_with(b"<?") {
                self.skip_through(b"<?", ">", "unterminated processing instruction")
            } else if self.cur.starts_with(b"</") {
                return Some(self.close_tag());
            } else {
                return Some(self.open_tag());
            };
            if let Err(err) = skipped {
                return Some(Err(err));
            }
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<TagEvent, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let event = self.next_event();
        if matches!(event, Some(Err(_))) {
            self.failed = true;
        }
        event
    }
}
