/// Pull-based source of bytecode bytes.
///
/// `None` means the source is exhausted.
pub trait ByteSource {
    fn next_byte(&mut self) -> Option<u8>;
}

/// Cursor over an in-memory function body.
#[derive(Debug, Clone)]
pub struct SliceCursor<'a> {
    code: &'a [u8],
    pos: usize,
}

impl<'a> SliceCursor<'a> {
    pub fn new(code: &'a [u8]) -> Self {
        Self { code, pos: 0 }
    }

    /// Offset of the next byte to be read.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.code.len()
    }

    pub fn remaining(&self) -> usize {
        self.code.len().saturating_sub(self.pos)
    }
}

impl ByteSource for SliceCursor<'_> {
    fn next_byte(&mut self) -> Option<u8> {
        let b = self.code.get(self.pos).copied()?;
        self.pos += 1;
        Some(b)
    }
}

/// Wraps a source and keeps every byte pulled through it.
pub(crate) struct Recorder<'a, S: ByteSource + ?Sized> {
    src: &'a mut S,
    bytes: Vec<u8>,
}

impl<'a, S: ByteSource + ?Sized> Recorder<'a, S> {
    pub(crate) fn new(src: &'a mut S) -> Self {
        Self { src, bytes: Vec::new() }
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Recorder<'_, S> {
    fn next_byte(&mut self) -> Option<u8> {
        let b = self.src.next_byte()?;
        self.bytes.push(b);
        Some(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_cursor() {
        let code = [1u8, 2, 3];
        let mut cur = SliceCursor::new(&code);
        assert_eq!(cur.remaining(), 3);
        assert_eq!(cur.next_byte(), Some(1));
        assert_eq!(cur.position(), 1);
        assert_eq!(cur.next_byte(), Some(2));
        assert_eq!(cur.next_byte(), Some(3));
        assert!(cur.is_at_end());
        assert_eq!(cur.next_byte(), None);
        assert_eq!(cur.position(), 3);
    }

    #[test]
    fn test_recorder_keeps_consumed_bytes() {
        let code = [7u8, 8, 9];
        let mut cur = SliceCursor::new(&code);
        let mut rec = Recorder::new(&mut cur);
        rec.next_byte();
        rec.next_byte();
        assert_eq!(rec.bytes(), &[7, 8]);
        assert_eq!(rec.into_bytes(), vec![7, 8]);
        assert_eq!(cur.position(), 2);
    }
}
