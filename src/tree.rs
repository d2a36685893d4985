//! Huffman tree construction
//!
//! The tree lives in an index arena and only exists long enough to read off
//! the depth of every leaf. Decoding never needs it: the container carries
//! code lengths, and [`crate::canonical`] rebuilds the codes from those.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::{debug, warn};

use crate::frequency::FrequencyTable;

/// Longest code length the 5-bit length field can hold.
pub const MAX_CODE_LENGTH: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Leaf(u8),
    Internal { low: usize, high: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    frequency: u64,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: usize,
}

impl HuffmanTree {
    /// Build a tree from `(symbol, weight)` pairs. Returns `None` when there
    /// are no symbols.
    ///
    /// Nodes are merged smallest weight first. Ties go to the node created
    /// earlier: leaves are created in the order given, and every merged node
    /// is newer than all existing ones. The first of the two nodes taken
    /// becomes the low (0) branch.
    pub fn build<I>(weights: I) -> Option<Self>
    where
        I: IntoIterator<Item = (u8, u64)>,
    {
        let mut nodes = Vec::new();
        let mut heap = BinaryHeap::new();
        for (symbol, frequency) in weights {
            heap.push(Reverse((frequency, nodes.len())));
            nodes.push(Node {
                frequency,
                kind: NodeKind::Leaf(symbol),
            });
        }

        while heap.len() > 1 {
            let (Some(Reverse((low_freq, low))), Some(Reverse((high_freq, high)))) =
                (heap.pop(), heap.pop())
            else {
                break;
            };
            let frequency = low_freq + high_freq;
            heap.push(Reverse((frequency, nodes.len())));
            nodes.push(Node {
                frequency,
                kind: NodeKind::Internal { low, high },
            });
        }

        let Reverse((_, root)) = heap.pop()?;
        Some(Self { nodes, root })
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Leaf(_)))
            .count()
    }

    pub fn internal_count(&self) -> usize {
        self.nodes.len() - self.leaf_count()
    }

    /// Total weight under the root.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].frequency
    }

    /// Depth of every leaf, sorted by symbol. A lone leaf is the root at
    /// depth 0 but still needs one bit per occurrence, so it gets length 1.
    pub fn code_lengths(&self) -> Vec<(u8, u32)> {
        let mut lengths = Vec::with_capacity(self.nodes.len() / 2 + 1);
        let mut stack = vec![(self.root, 0u32)];
        while let Some((index, depth)) = stack.pop() {
            match self.nodes[index].kind {
                NodeKind::Leaf(symbol) => lengths.push((symbol, depth.max(1))),
                NodeKind::Internal { low, high } => {
                    stack.push((high, depth + 1));
                    stack.push((low, depth + 1));
                }
            }
        }
        lengths.sort_unstable_by_key(|&(symbol, _)| symbol);
        lengths
    }
}

/// Code lengths for every symbol present in `table`, each at most
/// [`MAX_CODE_LENGTH`]. Empty when the table is empty.
pub fn code_lengths(table: &FrequencyTable) -> Vec<(u8, u32)> {
    limited_code_lengths(table.iter())
}

/// If the optimal tree is too deep, the weights are halved (never below 1)
/// and the tree rebuilt until it fits.
pub fn limited_code_lengths<I>(weights: I) -> Vec<(u8, u32)>
where
    I: IntoIterator<Item = (u8, u64)>,
{
    let mut weights: Vec<(u8, u64)> = weights.into_iter().collect();
    let mut passes = 0u32;
    loop {
        let Some(tree) = HuffmanTree::build(weights.iter().copied()) else {
            return Vec::new();
        };
        let lengths = tree.code_lengths();
        let max_length = lengths.iter().map(|&(_, l)| l).max().unwrap_or(0);
        if max_length <= MAX_CODE_LENGTH {
            debug!(
                symbols = lengths.len(),
                max_length,
                passes,
                "built huffman code lengths"
            );
            return lengths;
        }
        warn!(
            max_length,
            limit = MAX_CODE_LENGTH,
            "code too deep, rescaling frequencies"
        );
        for (_, weight) in weights.iter_mut() {
            *weight = (*weight >> 1).max(1);
        }
        passes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kraft_sum(lengths: &[(u8, u32)]) -> u64 {
        lengths.iter().map(|&(_, l)| 1u64 << (MAX_CODE_LENGTH - l)).sum()
    }

    #[test]
    fn test_empty_has_no_tree() {
        assert!(HuffmanTree::build(std::iter::empty()).is_none());
        assert!(code_lengths(&FrequencyTable::new()).is_empty());
    }

    #[test]
    fn test_single_symbol_gets_length_one() {
        let tree = HuffmanTree::build([(b'x', 6)]).unwrap();
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.internal_count(), 0);
        assert_eq!(tree.code_lengths(), vec![(b'x', 1)]);
    }

    #[test]
    fn test_two_symbols() {
        let table = FrequencyTable::from_bytes(b"AAAB");
        assert_eq!(code_lengths(&table), vec![(b'A', 1), (b'B', 1)]);
    }

    #[test]
    fn test_strict_binary_tree_shape() {
        let table = FrequencyTable::from_bytes(b"the quick brown fox jumps over the lazy dog");
        let tree = HuffmanTree::build(table.iter()).unwrap();
        assert_eq!(tree.leaf_count(), table.len());
        assert_eq!(tree.internal_count(), table.len() - 1);
        assert_eq!(tree.weight(), table.total());
        assert_eq!(kraft_sum(&tree.code_lengths()), 1u64 << MAX_CODE_LENGTH);
    }

    #[test]
    fn test_tie_break_prefers_older_nodes() {
        // a and b merge first; c (older) then beats the merged node to the low branch
        let tree = HuffmanTree::build([(b'a', 1), (b'b', 1), (b'c', 2)]).unwrap();
        assert_eq!(tree.code_lengths(), vec![(b'a', 2), (b'b', 2), (b'c', 1)]);
    }

    #[test]
    fn test_deterministic() {
        let table = FrequencyTable::from_bytes(b"abracadabra alakazam");
        assert_eq!(code_lengths(&table), code_lengths(&table));
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let mut data = vec![b'e'; 1000];
        data.extend_from_slice(b"zq");
        let lengths = code_lengths(&FrequencyTable::from_bytes(&data));
        let length_of = |s: u8| lengths.iter().find(|&&(sym, _)| sym == s).unwrap().1;
        assert!(length_of(b'e') < length_of(b'z'));
    }

    #[test]
    fn test_deep_tree_is_limited() {
        // Fibonacci weights give a maximally skewed tree, 39 levels deep
        let mut fib = vec![1u64, 1];
        while fib.len() < 40 {
            let next = fib[fib.len() - 1] + fib[fib.len() - 2];
            fib.push(next);
        }
        let weights: Vec<(u8, u64)> = fib.iter().enumerate().map(|(i, &f)| (i as u8, f)).collect();

        let unlimited = HuffmanTree::build(weights.iter().copied()).unwrap();
        let deepest = unlimited.code_lengths().iter().map(|&(_, l)| l).max().unwrap();
        assert!(deepest > MAX_CODE_LENGTH);

        let lengths = limited_code_lengths(weights);
        assert_eq!(lengths.len(), 40);
        assert!(lengths.iter().all(|&(_, l)| (1..=MAX_CODE_LENGTH).contains(&l)));
        assert_eq!(kraft_sum(&lengths), 1u64 << MAX_CODE_LENGTH);
    }
}
