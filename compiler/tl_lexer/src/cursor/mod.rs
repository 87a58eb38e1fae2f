//! Byte cursor over the source text.
//!
//! Reading past the end yields `0x00`. A `0x00` before the end is an interior
//! NUL, which the lexer reports as an unknown character; EOF is decided by
//! position alone.

#[derive(Clone, Copy, Debug)]
pub(crate) struct Cursor<'a> {
    buf: &'a [u8],
    pos: u32,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        debug_assert!(
            u32::try_from(source.len()).is_ok(),
            "source longer than u32::MAX bytes"
        );
        Cursor {
            buf: source.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> u8 {
        self.buf.get(pos).copied().unwrap_or(0)
    }

    #[inline]
    pub(crate) fn current(&self) -> u8 {
        self.byte_at(self.pos as usize)
    }

    #[inline]
    pub(crate) fn peek(&self) -> u8 {
        self.byte_at(self.pos as usize + 1)
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.pos += 1;
    }

    #[inline]
    pub(crate) fn advance_n(&mut self, n: u32) {
        self.pos += n;
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos as usize >= self.buf.len()
    }

    #[inline]
    pub(crate) fn pos(&self) -> u32 {
        self.pos
    }

    pub(crate) fn source_len(&self) -> u32 {
        u32::try_from(self.buf.len()).unwrap_or(u32::MAX)
    }

    /// Bytes from the cursor to the end.
    pub(crate) fn rest(&self) -> &'a [u8] {
        self.buf.get(self.pos as usize..).unwrap_or(&[])
    }

    /// Move to absolute `pos`, clamped to the end of input.
    pub(crate) fn jump_to(&mut self, pos: usize) {
        self.pos = u32::try_from(pos.min(self.buf.len())).unwrap_or(u32::MAX);
    }

    #[inline]
    pub(crate) fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    #[inline]
    fn utf8_char_width(byte: u8) -> u32 {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Advance over one whole character, so spans stay on char boundaries.
    #[inline]
    pub(crate) fn advance_char(&mut self) {
        let width = Self::utf8_char_width(self.current());
        self.pos = (self.pos + width).min(self.source_len());
    }
}

#[cfg(test)]
mod tests;
