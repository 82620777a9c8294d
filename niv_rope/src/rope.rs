use crate::config::RopeConfig;
use crate::error::{out_of_range, RopeResult};
use crate::len_pair::LenPair;
use crate::node::Node;
use crate::query::{QueryResult, QueryStep};
use crate::rle::RLEGroup;

/// A balanced binary tree over per-line `RLEGroup`s, keeping a running
/// `(char_count, byte_count)` sum at every branch so prefix sums, range
/// sums, and positional lookups all run in `O(log n)`.
///
/// Lines are atomic elements: `SumRope` does not address individual
/// characters, only whole lines and the `(char, byte)` offsets within them.
#[derive(Debug, Clone, PartialEq)]
pub struct SumRope {
    root: Option<Box<Node>>,
    config: RopeConfig,
}

impl Default for SumRope {
    fn default() -> Self {
        Self::new()
    }
}

impl SumRope {
    pub fn new() -> Self {
        Self { root: None, config: RopeConfig::default() }
    }

    pub fn with_config(config: RopeConfig) -> Self {
        Self { root: None, config }
    }

    /// Split `text` into lines (keeping the terminator with each line, per
    /// `str::split_inclusive`) and build a balanced tree over them.
    ///
    /// `from_text("")` yields an empty rope (zero lines), matching the
    /// convention that an empty document has no lines to report.
    pub fn from_text(text: &str) -> Self {
        Self::from_text_with_config(text, RopeConfig::default())
    }

    pub fn from_text_with_config(text: &str, config: RopeConfig) -> Self {
        let values: Vec<RLEGroup> = text.split_inclusive('\n').map(RLEGroup::new).collect();
        let root = Node::build_balanced(values, &config);
        Self { root, config }
    }

    pub fn config(&self) -> RopeConfig {
        self.config
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.root.as_ref().map(|n| n.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn char_len(&self) -> usize {
        self.total_sum().charlen
    }

    pub fn byte_len(&self) -> usize {
        self.total_sum().bytelen
    }

    pub fn total_sum(&self) -> LenPair {
        self.root.as_ref().map(|n| n.sum()).unwrap_or(LenPair::ZERO)
    }

    /// The `RLEGroup` for a single line.
    pub fn get_single(&self, line: usize) -> RopeResult<RLEGroup> {
        if line >= self.len() {
            return Err(out_of_range("line index", line, self.len()));
        }
        Ok(self
            .root
            .as_ref()
            .expect("len() > 0 implies root present")
            .get(line)
            .clone())
    }

    /// The `RLEGroup`s for `[start, end)`.
    pub fn get_range(&self, start: usize, end: usize) -> RopeResult<Vec<RLEGroup>> {
        let len = self.len();
        if start > end {
            return Err(out_of_range("range start", start, end));
        }
        if end > len {
            return Err(out_of_range("range end", end, len));
        }
        Ok((start..end)
            .map(|i| {
                self.root
                    .as_ref()
                    .expect("len() > 0 implies root present")
                    .get(i)
                    .clone()
            })
            .collect())
    }

    /// Replace a single line's contents. Sugar over `replace`.
    pub fn set_single(&mut self, line: usize, text: &str) -> RopeResult<()> {
        self.replace(line, 1, vec![RLEGroup::new(text)])
    }

    /// Replace lines `[start, end)` with `texts`, each becoming one line
    /// verbatim (no re-splitting on embedded newlines). Sugar over `replace`.
    pub fn set_range(&mut self, start: usize, end: usize, texts: &[String]) -> RopeResult<()> {
        let len = self.len();
        if start > end || end > len {
            return Err(out_of_range("range end", end, len));
        }
        let values: Vec<RLEGroup> = texts.iter().map(|t| RLEGroup::new(t)).collect();
        self.replace(start, end - start, values)
    }

    /// The core mutation: delete `old_count` elements beginning at `start`
    /// and insert `new_values` at that position. Implemented as split at
    /// `start`, split the right side at `old_count`, concat
    /// `left + new_values + tail`, rebalancing along the spine.
    pub fn replace(&mut self, start: usize, old_count: usize, new_values: Vec<RLEGroup>) -> RopeResult<()> {
        let len = self.len();
        if start + old_count > len {
            return Err(out_of_range("replace end", start + old_count, len));
        }
        #[cfg(debug_assertions)]
        eprintln!(
            "niv_rope: replace [{start}, {}) with {} line(s), rope currently has {len} line(s)",
            start + old_count,
            new_values.len()
        );
        let root = self.root.take();
        let (left, rest) = match root {
            Some(node) => node.split(start, &self.config),
            None => (None, None),
        };
        let (_middle, right) = match rest {
            Some(node) => node.split(old_count, &self.config),
            None => (None, None),
        };
        let middle = Node::build_balanced(new_values, &self.config);
        let joined = Node::combine(left, middle, &self.config);
        self.root = Node::combine(joined, right, &self.config);
        Ok(())
    }

    /// Convenience wrapper: remove lines `[start, end)` and splice `text`
    /// in as the replacement, re-split on `\n` with terminators kept.
    /// Returns the number of lines the replacement contributed. Used by
    /// callers working in raw text rather than pre-built `RLEGroup`s.
    pub fn replace_text(&mut self, start: usize, end: usize, text: &str) -> RopeResult<usize> {
        let len = self.len();
        if start > end || end > len {
            return Err(out_of_range("range end", end, len));
        }
        let values: Vec<RLEGroup> = text.split_inclusive('\n').map(RLEGroup::new).collect();
        let count = values.len();
        self.replace(start, end - start, values)?;
        Ok(count)
    }

    /// `LenPair` sum of the first `i` lines.
    pub fn prefix_sum(&self, i: usize) -> RopeResult<LenPair> {
        if i > self.len() {
            return Err(out_of_range("prefix length", i, self.len()));
        }
        Ok(self.root.as_ref().map(|n| n.prefix_sum(i)).unwrap_or(LenPair::ZERO))
    }

    /// `LenPair` sum of lines `[start, end)`.
    pub fn range_sum(&self, start: usize, end: usize) -> RopeResult<LenPair> {
        if start > end || end > self.len() {
            return Err(out_of_range("range end", end, self.len()));
        }
        Ok(self.prefix_sum(end)?.checked_sub(&self.prefix_sum(start)?)?)
    }

    /// All lines, in order, as `RLEGroup`s — the rope's own view of the
    /// text's per-line structure. `SumRope` indexes metrics, it does not
    /// store the original text; callers needing the literal characters
    /// keep their own buffer alongside it.
    pub fn to_list(&self) -> Vec<RLEGroup> {
        match &self.root {
            None => Vec::new(),
            Some(node) => node.flatten(),
        }
    }

    /// Positional lookup: locate which line holds the `value`-th unit along
    /// dimension `dim` (0 = chars, 1 = bytes), and the in-line position.
    pub fn query(&self, value: usize, dim: usize) -> RopeResult<QueryResult> {
        let total = self.total_sum().get(dim)?;
        if value > total {
            return Err(out_of_range("query value", value, total));
        }
        match &self.root {
            None => Ok(QueryResult {
                line: 0,
                line_start: LenPair::ZERO,
                position: LenPair::ZERO,
                group: RLEGroup::empty(),
                history: Vec::new(),
            }),
            Some(node) => {
                let mut history: Vec<QueryStep> = Vec::new();
                let (line, line_start, position, group) =
                    node.query(value, dim, 0, LenPair::ZERO, &mut history)?;
                Ok(QueryResult { line, line_start, position, group, history })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_text_splits_on_newline_keeping_terminators() {
        let rope = SumRope::from_text("one\ntwo\nthree");
        assert_eq!(rope.len(), 3);
        assert_eq!(rope.get_single(0).unwrap().bytelen(), 4);
        assert_eq!(rope.get_single(2).unwrap().bytelen(), 5);
    }

    #[test]
    fn from_text_empty_has_no_lines() {
        let rope = SumRope::from_text("");
        assert_eq!(rope.len(), 0);
        assert_eq!(rope.total_sum(), LenPair::ZERO);
    }

    #[test]
    fn total_sum_matches_manual_count() {
        let text = "abc\n\u{00e9}\u{00e9}\n\u{4e2d}\u{1f600}\n";
        let rope = SumRope::from_text(text);
        assert_eq!(rope.char_len(), text.chars().count());
        assert_eq!(rope.byte_len(), text.len());
    }

    #[test]
    fn prefix_sum_is_monotone_and_matches_total() {
        let rope = SumRope::from_text("a\nbb\nccc\ndddd\n");
        let mut prev = LenPair::ZERO;
        for i in 0..=rope.len() {
            let cur = rope.prefix_sum(i).unwrap();
            assert!(cur.charlen >= prev.charlen);
            assert!(cur.bytelen >= prev.bytelen);
            prev = cur;
        }
        assert_eq!(rope.prefix_sum(rope.len()).unwrap(), rope.total_sum());
    }

    #[test]
    fn range_sum_composes_from_prefix_sums() {
        let rope = SumRope::from_text("a\nbb\nccc\ndddd\n");
        assert_eq!(
            rope.range_sum(1, 3).unwrap(),
            rope.prefix_sum(3).unwrap().checked_sub(&rope.prefix_sum(1).unwrap()).unwrap()
        );
    }

    #[test]
    fn replace_shrinks_and_grows_line_count() {
        let mut rope = SumRope::from_text("one\ntwo\nthree\n");
        let inserted = rope.replace_text(1, 2, "TWO\nTWO-B\n").unwrap();
        assert_eq!(inserted, 2);
        assert_eq!(rope.len(), 4);
        assert_eq!(rope.get_single(1).unwrap().bytelen(), 4);
        assert_eq!(rope.get_single(2).unwrap().bytelen(), 6);
        assert_eq!(rope.get_single(3).unwrap().bytelen(), 6);
    }

    #[test]
    fn replace_at_ends_behaves() {
        let mut rope = SumRope::from_text("one\ntwo\n");
        rope.replace_text(0, 0, "zero\n").unwrap();
        assert_eq!(rope.len(), 3);
        assert_eq!(rope.get_single(0).unwrap().bytelen(), 5);

        rope.replace_text(rope.len(), rope.len(), "three\n").unwrap();
        assert_eq!(rope.len(), 4);
        assert_eq!(rope.get_single(3).unwrap().bytelen(), 6);
    }

    #[test]
    fn replace_round_trip_with_rle_groups() {
        // S3/property 3: replace(start, old_count, to_list()[start..start+old_count])
        // is a no-op on the rope's observable sequence.
        let mut rope = SumRope::from_text("abc\n\u{00e9}\u{00e9}\n\u{4e2d}\u{1f600}\n");
        let before = rope.to_list();
        let before_sum = rope.total_sum();
        rope.replace(1, 1, before[1..2].to_vec()).unwrap();
        assert_eq!(rope.to_list(), before);
        assert_eq!(rope.total_sum(), before_sum);
    }

    #[test]
    fn replace_inserts_and_deletes_rle_groups_directly() {
        let mut rope = SumRope::from_text("abc\n\u{00e9}\u{00e9}\n\u{4e2d}\u{1f600}\n");
        rope.replace(1, 1, vec![RLEGroup::new("xx\n"), RLEGroup::new("yy\n")]).unwrap();
        let lines = rope.to_list();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], RLEGroup::new("xx\n"));
        assert_eq!(lines[2], RLEGroup::new("yy\n"));
    }

    #[test]
    fn set_single_replaces_one_line_verbatim() {
        let mut rope = SumRope::from_text("a\nb\nc\n");
        rope.set_single(1, "replaced").unwrap();
        assert_eq!(rope.len(), 3);
        assert_eq!(rope.get_single(1).unwrap().bytelen(), 8);
    }

    #[test]
    fn query_by_char_dimension_locates_correct_line() {
        let rope = SumRope::from_text("aa\nbbbb\nc\n");
        // lines: "aa\n" (3 chars), "bbbb\n" (5 chars), "c\n" (2 chars)
        let r = rope.query(4, 0).unwrap();
        assert_eq!(r.line, 1);
        assert_eq!(r.line_start, LenPair::new(3, 3));

        let r0 = rope.query(0, 0).unwrap();
        assert_eq!(r0.line, 0);

        let last = rope.query(rope.char_len(), 0).unwrap();
        assert_eq!(last.line, rope.len() - 1);
    }

    #[test]
    fn query_by_byte_dimension_with_multibyte_line() {
        let rope = SumRope::from_text("x\n\u{4e2d}\u{4e2d}\n");
        // second line "中中\n" is 7 bytes, starts at byte offset 2
        let r = rope.query(2 + 3, 1).unwrap();
        assert_eq!(r.line, 1);
        assert_eq!(r.position.charlen, 1);
    }

    #[test]
    fn out_of_range_errors_are_reported() {
        let rope = SumRope::from_text("a\nb\n");
        assert!(rope.get_single(5).is_err());
        assert!(rope.prefix_sum(5).is_err());
        assert!(rope.query(1000, 0).is_err());
    }

    #[test]
    fn get_range_returns_requested_slice() {
        let rope = SumRope::from_text("a\nb\nc\nd\n");
        let slice = rope.get_range(1, 3).unwrap();
        assert_eq!(slice.len(), 2);
        assert_eq!(slice[0].bytelen(), 2);
    }

    #[test]
    fn s3_replace_matches_spec_scenario() {
        let mut rope = SumRope::from_text("abc\ndef\nghi");
        rope.replace(1, 1, vec![RLEGroup::new("xx\n"), RLEGroup::new("yy\n")]).unwrap();
        let lines = rope.to_list();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], RLEGroup::new("abc\n"));
        assert_eq!(lines[1], RLEGroup::new("xx\n"));
        assert_eq!(lines[2], RLEGroup::new("yy\n"));
        assert_eq!(lines[3], RLEGroup::new("ghi"));
        assert_eq!(rope.total_sum(), LenPair::new(13, 13));
        assert_eq!(rope.prefix_sum(2).unwrap(), LenPair::new(7, 7));
    }

    #[test]
    fn s1_build_from_text_and_query() {
        let rope = SumRope::from_text("a\nb\nc");
        assert_eq!(rope.len(), 3);
        assert_eq!(rope.total_sum(), LenPair::new(5, 5));
        let r = rope.query(3, 0).unwrap();
        assert_eq!(r.line, 1);
        assert_eq!(r.line_start, LenPair::new(2, 2));
        assert_eq!(r.position, LenPair::new(3, 3));
    }

    #[test]
    fn s2_multibyte_lines_query_by_byte() {
        let rope = SumRope::from_text("\u{03b1}\n\u{03b2}");
        assert_eq!(rope.get_single(0).unwrap().bytelen(), 3);
        assert_eq!(rope.get_single(0).unwrap().charlen(), 2);
        assert_eq!(rope.total_sum(), LenPair::new(3, 5));
        let r = rope.query(2, 1).unwrap();
        assert_eq!(r.line, 0);
        assert_eq!(r.position, LenPair::new(1, 2));
    }

    #[test]
    fn s5_stress_random_replace_preserves_invariants() {
        // Deterministic LCG so the test is reproducible without pulling in a
        // `rand` dependency the teacher workspace doesn't carry.
        struct Lcg(u64);
        impl Lcg {
            fn next(&mut self) -> u64 {
                self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
                self.0 >> 33
            }
            fn below(&mut self, bound: usize) -> usize {
                if bound == 0 { 0 } else { (self.next() as usize) % bound }
            }
        }

        let mut rng = Lcg(0x5eed);
        let mut rope = SumRope::from_text("seed\n");
        for step in 1..=2000usize {
            let len = rope.len();
            let start = rng.below(len + 1);
            let old_count = rng.below(len - start + 1);
            let new_count = 1 + rng.below(3);
            let values: Vec<RLEGroup> = (0..new_count)
                .map(|i| RLEGroup::new(&format!("l{step}-{i}\n")))
                .collect();
            rope.replace(start, old_count, values).unwrap();

            if step % 100 == 0 {
                // Invariant 1 (sum consistency) and 2 (prefix monotonicity).
                let flat = rope.to_list();
                let expected_sum = flat
                    .iter()
                    .fold(LenPair::ZERO, |acc, g| acc + g.len_pair());
                assert_eq!(rope.total_sum(), expected_sum);
                let mut prev = LenPair::ZERO;
                for i in 0..=rope.len() {
                    let cur = rope.prefix_sum(i).unwrap();
                    assert!(cur.charlen >= prev.charlen && cur.bytelen >= prev.bytelen);
                    prev = cur;
                }
                assert_eq!(prev, rope.total_sum());
            }
        }
    }

    #[test]
    fn s4_empty_rope_query_zero() {
        let rope = SumRope::new();
        assert_eq!(rope.len(), 0);
        assert_eq!(rope.total_sum(), LenPair::ZERO);
        let r = rope.query(0, 0).unwrap();
        assert_eq!(r.line, 0);
        assert_eq!(r.line_start, LenPair::ZERO);
        assert_eq!(r.position, LenPair::ZERO);
        assert_eq!(r.group, RLEGroup::empty());
        assert!(r.history.is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_line() -> impl Strategy<Value = String> {
        prop::collection::vec(prop_oneof![
            Just('a'), Just('b'), Just('\u{00e9}'), Just('\u{4e2d}'), Just('\u{1f600}'),
        ], 0..6)
        .prop_map(|chars| chars.into_iter().collect::<String>() + "\n")
    }

    fn arb_text() -> impl Strategy<Value = String> {
        prop::collection::vec(arb_line(), 0..12).prop_map(|lines| lines.concat())
    }

    proptest! {
        #[test]
        fn total_sum_matches_char_and_byte_counts(text in arb_text()) {
            let rope = SumRope::from_text(&text);
            prop_assert_eq!(rope.char_len(), text.chars().count());
            prop_assert_eq!(rope.byte_len(), text.len());
        }

        #[test]
        fn prefix_sum_is_monotone(text in arb_text()) {
            let rope = SumRope::from_text(&text);
            let mut prev = LenPair::ZERO;
            for i in 0..=rope.len() {
                let cur = rope.prefix_sum(i).unwrap();
                prop_assert!(cur.charlen >= prev.charlen);
                prop_assert!(cur.bytelen >= prev.bytelen);
                prev = cur;
            }
        }

        #[test]
        fn flatten_line_count_matches_len(text in arb_text()) {
            let rope = SumRope::from_text(&text);
            let expected = if text.is_empty() { 0 } else { text.split_inclusive('\n').count() };
            prop_assert_eq!(rope.len(), expected);
        }

        #[test]
        fn replace_with_same_text_preserves_everything(text in arb_text()) {
            let mut rope = SumRope::from_text(&text);
            let before_len = rope.len();
            let before_sum = rope.total_sum();
            rope.replace_text(0, before_len, &text).unwrap();
            prop_assert_eq!(rope.len(), before_len);
            prop_assert_eq!(rope.total_sum(), before_sum);
        }

        #[test]
        fn replace_round_trip_with_own_groups(text in arb_text()) {
            // property 3: R.replace(start, old_count, R.to_list()[start..start+old_count])
            // leaves R unchanged.
            let mut rope = SumRope::from_text(&text);
            let len = rope.len();
            if len > 0 {
                let before = rope.to_list();
                let start = 0;
                let old_count = len;
                rope.replace(start, old_count, before[start..start + old_count].to_vec()).unwrap();
                prop_assert_eq!(rope.to_list(), before);
            }
        }

        #[test]
        fn query_result_line_is_within_bounds(text in arb_text()) {
            let rope = SumRope::from_text(&text);
            if rope.char_len() > 0 {
                for value in [0, rope.char_len() / 2, rope.char_len()] {
                    let r = rope.query(value, 0).unwrap();
                    prop_assert!(r.line < rope.len());
                }
            }
        }
    }
}
