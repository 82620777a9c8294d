use crate::error::{RopeError, RopeResult};
use crate::len_pair::LenPair;

/// One line's text, summarized as a run-length list of `(byte_width, run_length)`
/// pairs plus cached totals.
///
/// Adjacent pairs never share a `byte_width` (the RLE is always coalesced).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RLEGroup {
    rle: Vec<(u8, usize)>,
    charlen: usize,
    bytelen: usize,
}

impl RLEGroup {
    /// The empty line.
    pub fn empty() -> Self {
        Self { rle: Vec::new(), charlen: 0, bytelen: 0 }
    }

    /// Build the coalesced RLE from a line of text. Infallible: `&str` is
    /// already guaranteed valid UTF-8 by the type system.
    pub fn new(text: &str) -> Self {
        let mut rle: Vec<(u8, usize)> = Vec::new();
        let mut charlen = 0usize;
        let mut bytelen = 0usize;
        for ch in text.chars() {
            let width = ch.len_utf8() as u8;
            charlen += 1;
            bytelen += width as usize;
            match rle.last_mut() {
                Some((w, run)) if *w == width => *run += 1,
                _ => rle.push((width, 1)),
            }
        }
        Self { rle, charlen, bytelen }
    }

    /// Build from raw bytes, validating UTF-8 first.
    pub fn from_utf8(bytes: &[u8]) -> RopeResult<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    pub fn charlen(&self) -> usize {
        self.charlen
    }

    pub fn bytelen(&self) -> usize {
        self.bytelen
    }

    pub fn len_pair(&self) -> LenPair {
        LenPair::new(self.charlen, self.bytelen)
    }

    pub fn rle(&self) -> &[(u8, usize)] {
        &self.rle
    }

    /// Largest `c` such that `char_to_byte(c) <= b`.
    pub fn byte_to_char(&self, b: usize) -> RopeResult<usize> {
        if b > self.bytelen {
            return Err(RopeError::OutOfRange { what: "byte offset", value: b, bound: self.bytelen });
        }
        let mut chars = 0usize;
        let mut bytes = 0usize;
        for &(width, run) in &self.rle {
            let width = width as usize;
            let run_bytes = width * run;
            if bytes + run_bytes <= b {
                chars += run;
                bytes += run_bytes;
                continue;
            }
            // b falls inside this run (or exactly at its start, handled above).
            let remaining = b - bytes;
            let whole_chars_in_run = remaining / width;
            chars += whole_chars_in_run;
            return Ok(chars);
        }
        Ok(chars)
    }

    /// Byte offset at the start of character `c`.
    pub fn char_to_byte(&self, c: usize) -> RopeResult<usize> {
        if c > self.charlen {
            return Err(RopeError::OutOfRange { what: "char offset", value: c, bound: self.charlen });
        }
        let mut chars = 0usize;
        let mut bytes = 0usize;
        for &(width, run) in &self.rle {
            if chars + run <= c {
                chars += run;
                bytes += width as usize * run;
                continue;
            }
            let remaining = c - chars;
            bytes += width as usize * remaining;
            return Ok(bytes);
        }
        Ok(bytes)
    }

    pub fn byte_to_pair(&self, b: usize) -> RopeResult<LenPair> {
        Ok(LenPair::new(self.byte_to_char(b)?, b))
    }

    pub fn char_to_pair(&self, c: usize) -> RopeResult<LenPair> {
        Ok(LenPair::new(c, self.char_to_byte(c)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_empty_group() {
        let g = RLEGroup::new("");
        assert_eq!(g.charlen(), 0);
        assert_eq!(g.bytelen(), 0);
        assert!(g.rle().is_empty());
    }

    #[test]
    fn ascii_line_is_one_run() {
        let g = RLEGroup::new("abc\n");
        assert_eq!(g.charlen(), 4);
        assert_eq!(g.bytelen(), 4);
        assert_eq!(g.rle(), &[(1, 4)]);
    }

    #[test]
    fn mixed_width_line_s6() {
        // widths 1,2,3,4 -> charlen=4, bytelen=10
        let g = RLEGroup::new("a\u{00e9}\u{4e2d}\u{1f600}");
        assert_eq!(g.charlen(), 4);
        assert_eq!(g.bytelen(), 10);
        assert_eq!(g.rle(), &[(1, 1), (2, 1), (3, 1), (4, 1)]);
        assert_eq!(g.byte_to_char(6).unwrap(), 3);
        assert_eq!(g.char_to_byte(3).unwrap(), 6);
    }

    #[test]
    fn rle_is_coalesced() {
        let g = RLEGroup::new("ab\u{00e9}\u{00e9}cd");
        // a,b width1 run2; e,e width2 run2; c,d width1 run2
        assert_eq!(g.rle(), &[(1, 2), (2, 2), (1, 2)]);
    }

    #[test]
    fn boundary_policy_at_run_edges() {
        // "a" (width1) + "\u{00e9}" (width2): boundary at byte 1 belongs to
        // the preceding run.
        let g = RLEGroup::new("a\u{00e9}");
        assert_eq!(g.byte_to_char(0).unwrap(), 0);
        assert_eq!(g.byte_to_char(1).unwrap(), 1);
        assert_eq!(g.byte_to_char(3).unwrap(), 2);
        assert_eq!(g.char_to_byte(0).unwrap(), 0);
        assert_eq!(g.char_to_byte(2).unwrap(), g.bytelen());
    }

    #[test]
    fn out_of_range_offsets_fail() {
        let g = RLEGroup::new("abc");
        assert!(g.byte_to_char(4).is_err());
        assert!(g.char_to_byte(4).is_err());
    }

    #[test]
    fn from_utf8_rejects_invalid_bytes() {
        let bad = [0xff, 0xfe];
        assert!(RLEGroup::from_utf8(&bad).is_err());
    }

    #[test]
    fn roundtrip_faithfulness() {
        for line in ["", "hello", "a\u{00e9}\u{4e2d}\u{1f600}b", "\u{4e2d}\u{4e2d}\u{4e2d}"] {
            let g = RLEGroup::new(line);
            assert_eq!(g.bytelen(), line.len());
            assert_eq!(g.charlen(), line.chars().count());
            for c in 0..=g.charlen() {
                let b = g.char_to_byte(c).unwrap();
                assert_eq!(g.byte_to_char(b).unwrap(), c);
            }
        }
    }
}
