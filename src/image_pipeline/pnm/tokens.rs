//! Whitespace tokenizer for portable map headers and text bodies

/// Splits a byte buffer into whitespace-separated tokens, skipping `#`
/// comments up to the end of their line.
pub struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Tokens<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Byte offset just past the last token returned.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    fn skip_separators(&mut self) {
        while let Some(&byte) = self.data.get(self.pos) {
            if byte == b'#' {
                while let Some(&c) = self.data.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' {
                        break;
                    }
                }
            } else if byte.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_separators();
        let start = self.pos;
        while let Some(&byte) = self.data.get(self.pos) {
            if byte.is_ascii_whitespace() || byte == b'#' {
                break;
            }
            self.pos += 1;
        }
        (self.pos > start).then(|| &self.data[start..self.pos])
    }
}
