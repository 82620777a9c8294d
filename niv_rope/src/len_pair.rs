use crate::error::{RopeError, RopeResult};
use std::ops::{Add, Index, Sub};

/// The cumulative-sum monoid element: `(character_count, byte_count)`.
///
/// Component 0 is `charlen`, component 1 is `bytelen`. Identity is `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LenPair {
    pub charlen: usize,
    pub bytelen: usize,
}

impl LenPair {
    pub const ZERO: LenPair = LenPair { charlen: 0, bytelen: 0 };

    pub fn new(charlen: usize, bytelen: usize) -> Self {
        Self { charlen, bytelen }
    }

    /// Read component `index` (0 = charlen, 1 = bytelen).
    pub fn get(&self, index: usize) -> RopeResult<usize> {
        match index {
            0 => Ok(self.charlen),
            1 => Ok(self.bytelen),
            _ => Err(RopeError::InvalidArgument(format!(
                "LenPair index must be 0 or 1, got {index}"
            ))),
        }
    }

    /// Pointwise subtraction that fails rather than panics when a component
    /// would go negative (the "partial" subtraction spec.md §3 describes).
    pub fn checked_sub(&self, other: &LenPair) -> RopeResult<LenPair> {
        let charlen = self.charlen.checked_sub(other.charlen).ok_or_else(|| {
            RopeError::InvalidArgument(format!(
                "charlen underflow: {} - {}",
                self.charlen, other.charlen
            ))
        })?;
        let bytelen = self.bytelen.checked_sub(other.bytelen).ok_or_else(|| {
            RopeError::InvalidArgument(format!(
                "bytelen underflow: {} - {}",
                self.bytelen, other.bytelen
            ))
        })?;
        Ok(LenPair { charlen, bytelen })
    }
}

impl Add for LenPair {
    type Output = LenPair;
    fn add(self, rhs: LenPair) -> LenPair {
        LenPair {
            charlen: self.charlen + rhs.charlen,
            bytelen: self.bytelen + rhs.bytelen,
        }
    }
}

impl Sub for LenPair {
    type Output = LenPair;
    fn sub(self, rhs: LenPair) -> LenPair {
        LenPair {
            charlen: self.charlen - rhs.charlen,
            bytelen: self.bytelen - rhs.bytelen,
        }
    }
}

impl Index<usize> for LenPair {
    type Output = usize;
    fn index(&self, index: usize) -> &usize {
        match index {
            0 => &self.charlen,
            1 => &self.bytelen,
            _ => panic!("LenPair index must be 0 or 1, got {index}"),
        }
    }
}

impl PartialOrd for LenPair {
    /// Componentwise ordering; `None` when neither dominates (used only by
    /// tests — production code compares individual components via `get`).
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        use std::cmp::Ordering::*;
        match (self.charlen.cmp(&other.charlen), self.bytelen.cmp(&other.bytelen)) {
            (Equal, Equal) => Some(Equal),
            (Less, Less) | (Less, Equal) | (Equal, Less) => Some(Less),
            (Greater, Greater) | (Greater, Equal) | (Equal, Greater) => Some(Greater),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_pointwise() {
        let a = LenPair::new(1, 2);
        let b = LenPair::new(3, 4);
        assert_eq!(a + b, LenPair::new(4, 6));
    }

    #[test]
    fn sub_is_pointwise() {
        let a = LenPair::new(4, 6);
        let b = LenPair::new(1, 2);
        assert_eq!(a - b, LenPair::new(3, 4));
    }

    #[test]
    fn get_rejects_bad_index() {
        let a = LenPair::new(1, 2);
        assert!(a.get(2).is_err());
        assert_eq!(a.get(0).unwrap(), 1);
        assert_eq!(a.get(1).unwrap(), 2);
    }

    #[test]
    fn checked_sub_fails_on_underflow() {
        let a = LenPair::new(1, 1);
        let b = LenPair::new(2, 0);
        assert!(a.checked_sub(&b).is_err());
    }

    #[test]
    fn ordering_is_componentwise() {
        assert!(LenPair::new(1, 1) < LenPair::new(2, 2));
        assert_eq!(
            LenPair::new(1, 2).partial_cmp(&LenPair::new(2, 1)),
            None
        );
    }
}
