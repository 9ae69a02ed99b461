//! Huffman code over the *bit-width* of each zig-zag-shifted sample,
//! followed by the value's raw low-order bits. See `spec.md` §4.6.
//!
//! The tree is a flat arena (`Vec<Node>` addressed by index) rather than
//! pointer-linked nodes, per the teacher's design-notes preference for
//! arena allocation (`spec.md` §9) — it also sidesteps any cyclic-reference
//! lifetime bookkeeping a linked tree would need.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::bits::{nbits, nbits128, reverse_bits_64};
use crate::bitstream::Bitstream;
use crate::codecs::wide::{read_wide, write_wide, zigzag_plus_one};
use crate::sample::Sample;
use crate::Error;

/// Widest possible symbol: `nbits(u)` for `u` up to `2^64` is 65.
const MAX_SYMBOL: u8 = 65;

struct Node {
    left: Option<u32>,
    right: Option<u32>,
    symbol: Option<u8>,
}

/// Build a Huffman tree from a histogram of bit-widths. Ties are broken by
/// `(weight, insertion_order)`, where leaves are inserted in ascending
/// symbol order — this is an arbitrary but *fixed* total order, so encoding
/// the same histogram twice yields the same tree (Testable Property 7).
fn build_tree(hist: &BTreeMap<u8, u64>) -> (Vec<Node>, u32) {
    let mut nodes = Vec::with_capacity(hist.len() * 2);
    let mut heap: BinaryHeap<Reverse<(u64, u64, u32)>> = BinaryHeap::new();
    let mut seq = 0u64;
    for (&symbol, &weight) in hist.iter() {
        let idx = nodes.len() as u32;
        nodes.push(Node { left: None, right: None, symbol: Some(symbol) });
        heap.push(Reverse((weight, seq, idx)));
        seq += 1;
    }
    while heap.len() > 1 {
        let Reverse((w1, _, i1)) = heap.pop().unwrap();
        let Reverse((w2, _, i2)) = heap.pop().unwrap();
        let idx = nodes.len() as u32;
        nodes.push(Node { left: Some(i1), right: Some(i2), symbol: None });
        heap.push(Reverse((w1 + w2, seq, idx)));
        seq += 1;
    }
    let Reverse((_, _, root)) = heap.pop().expect("histogram must have at least one entry");
    (nodes, root)
}

fn serialize_tree(
    bs: &mut Bitstream,
    nodes: &[Node],
    idx: u32,
    min_symbol: u8,
    value_bits: u32,
) -> Result<(), Error> {
    let node = &nodes[idx as usize];
    if let Some(symbol) = node.symbol {
        bs.write_bit(true)?;
        bs.write_bits((symbol - min_symbol) as u64, value_bits)
    } else {
        bs.write_bit(false)?;
        serialize_tree(bs, nodes, node.left.unwrap(), min_symbol, value_bits)?;
        serialize_tree(bs, nodes, node.right.unwrap(), min_symbol, value_bits)
    }
}

/// Read the two 7-bit headers and the pre-order tree body that follows.
fn deserialize_tree(bs: &mut Bitstream) -> Result<(Vec<Node>, u32), Error> {
    let min_symbol = bs.read_bits(7)? as u8;
    let value_bits = bs.read_bits(7)? as u32;
    let mut nodes = Vec::new();
    let root = deserialize_tree_body(bs, &mut nodes, min_symbol, value_bits)?;
    Ok((nodes, root))
}

fn deserialize_tree_body(
    bs: &mut Bitstream,
    nodes: &mut Vec<Node>,
    min_symbol: u8,
    value_bits: u32,
) -> Result<u32, Error> {
    if bs.read_bit()? {
        let offset = bs.read_bits(value_bits)? as u8;
        let idx = nodes.len() as u32;
        nodes.push(Node { left: None, right: None, symbol: Some(min_symbol + offset) });
        Ok(idx)
    } else {
        let left = deserialize_tree_body(bs, nodes, min_symbol, value_bits)?;
        let right = deserialize_tree_body(bs, nodes, min_symbol, value_bits)?;
        let idx = nodes.len() as u32;
        nodes.push(Node { left: Some(left), right: Some(right), symbol: None });
        Ok(idx)
    }
}

/// Reverse the low `length` bits of `code_lsb` into the MSB-first order
/// `Bitstream::write_bits` expects. `length` is in `1..=64`.
fn lsb_to_msb(code_lsb: u64, length: u32) -> u64 {
    reverse_bits_64(code_lsb) >> (64 - length)
}

/// `(code_bits_MSB_first, code_length)` indexed by symbol (bit-width), built
/// by walking the tree accumulating `left = 0, right = 1` into ascending bit
/// positions, per `spec.md` §4.6 step 4. A single-leaf (degenerate) tree is
/// special-cased to the 1-bit code `0`, per the stated edge case.
fn build_table(nodes: &[Node], root: u32) -> [(u64, u32); MAX_SYMBOL as usize + 1] {
    let mut table = [(0u64, 0u32); MAX_SYMBOL as usize + 1];
    if let Some(symbol) = nodes[root as usize].symbol {
        table[symbol as usize] = (0, 1);
        return table;
    }
    fn walk(nodes: &[Node], idx: u32, depth: u32, code_lsb: u64, table: &mut [(u64, u32)]) {
        let node = &nodes[idx as usize];
        if let Some(symbol) = node.symbol {
            table[symbol as usize] = (lsb_to_msb(code_lsb, depth), depth);
            return;
        }
        walk(nodes, node.left.unwrap(), depth + 1, code_lsb, table);
        walk(nodes, node.right.unwrap(), depth + 1, code_lsb | (1u64 << depth), table);
    }
    walk(nodes, root, 0, 0, &mut table);
    table
}

fn histogram<T: Sample>(samples: &[T]) -> (BTreeMap<u8, u64>, Vec<u32>) {
    let widths: Vec<u32> = samples
        .iter()
        .map(|&x| nbits128(zigzag_plus_one(x)))
        .collect();
    let mut hist = BTreeMap::new();
    for &l in &widths {
        *hist.entry(l as u8).or_insert(0u64) += 1;
    }
    (hist, widths)
}

pub fn encode<T: Sample>(samples: &[T]) -> Result<Vec<u8>, Error> {
    let initial_words = (samples.len() * T::width_bytes() as usize) * 2 + 32;
    let mut bs = Bitstream::new_owned(initial_words.max(8));
    if samples.is_empty() {
        bs.write_bits(0, 7)?;
        bs.write_bits(0, 7)?;
        return Ok(bs.into_bytes());
    }

    let (hist, widths) = histogram(samples);
    let min_symbol = *hist.keys().next().unwrap();
    let max_symbol = *hist.keys().next_back().unwrap();
    let value_bits = nbits((max_symbol - min_symbol) as u64);
    log::debug!(
        "log-huffman: {} distinct bit-widths, min={min_symbol} value_bits={value_bits}",
        hist.len()
    );

    let (nodes, root) = build_tree(&hist);
    bs.write_bits(min_symbol as u64, 7)?;
    bs.write_bits(value_bits as u64, 7)?;
    serialize_tree(&mut bs, &nodes, root, min_symbol, value_bits)?;

    let table = build_table(&nodes, root);
    for (&x, &l) in samples.iter().zip(widths.iter()) {
        let u = zigzag_plus_one(x);
        let (code, len) = table[l as usize];
        bs.write_bits(code, len)?;
        if l > 1 {
            write_wide(&mut bs, u & !(1u128 << (l - 1)), l - 1)?;
        }
    }
    Ok(bs.into_bytes())
}

pub fn decode<T: Sample>(encoded: &[u8], count: usize) -> Result<Vec<T>, Error> {
    let mut bs = Bitstream::wrap_read(encoded);
    if count == 0 {
        bs.read_bits(7)?;
        bs.read_bits(7)?;
        return Ok(Vec::new());
    }

    let (nodes, root) = deserialize_tree(&mut bs)?;
    let degenerate = nodes[root as usize].symbol;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let l = match degenerate {
            Some(symbol) => {
                bs.read_bit()?;
                symbol as u32
            }
            None => {
                let mut idx = root;
                loop {
                    let bit = bs.read_bit()?;
                    idx = if bit {
                        nodes[idx as usize].right.unwrap()
                    } else {
                        nodes[idx as usize].left.unwrap()
                    };
                    if let Some(symbol) = nodes[idx as usize].symbol {
                        break symbol as u32;
                    }
                }
            }
        };
        let tail = if l > 1 { read_wide(&mut bs, l - 1)? } else { 0u128 };
        let u = tail | (1u128 << (l - 1));
        out.push(T::zigzag_decode((u - 1) as u64));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Sample>(samples: &[T]) {
        let encoded = encode(samples).unwrap();
        let decoded: Vec<T> = decode(&encoded, samples.len()).unwrap();
        assert_eq!(decoded, samples);
    }

    #[test]
    fn s6_tree_serializes_and_shortest_code_is_symbol_3() {
        let mut hist = BTreeMap::new();
        hist.insert(0u8, 1u64);
        hist.insert(1, 1);
        hist.insert(2, 2);
        hist.insert(3, 4);
        hist.insert(4, 3);
        hist.insert(5, 2);

        let (nodes, root) = build_tree(&hist);
        let min_symbol = *hist.keys().next().unwrap();
        let max_symbol = *hist.keys().next_back().unwrap();
        let value_bits = nbits((max_symbol - min_symbol) as u64);

        let mut bs = Bitstream::new_owned(8);
        bs.write_bits(min_symbol as u64, 7).unwrap();
        bs.write_bits(value_bits as u64, 7).unwrap();
        serialize_tree(&mut bs, &nodes, root, min_symbol, value_bits).unwrap();
        bs.rewind();

        let (de_nodes, de_root) = deserialize_tree(&mut bs).unwrap();

        fn leaves_in_order(nodes: &[Node], idx: u32, out: &mut Vec<u8>) {
            let n = &nodes[idx as usize];
            match n.symbol {
                Some(s) => out.push(s),
                None => {
                    leaves_in_order(nodes, n.left.unwrap(), out);
                    leaves_in_order(nodes, n.right.unwrap(), out);
                }
            }
        }
        let mut original = Vec::new();
        let mut round_tripped = Vec::new();
        leaves_in_order(&nodes, root, &mut original);
        leaves_in_order(&de_nodes, de_root, &mut round_tripped);
        assert_eq!(original, round_tripped);

        let table = build_table(&nodes, root);
        let (_, len3) = table[3];
        for sym in [0u8, 1, 2, 4, 5] {
            let (_, len) = table[sym as usize];
            assert!(len3 <= len, "symbol 3 must have the shortest (or tied) code length");
        }
    }

    #[test]
    fn prefix_code_property_no_codeword_is_a_prefix_of_another() {
        let mut hist = BTreeMap::new();
        for (symbol, weight) in [(1u8, 5u64), (2, 1), (3, 1), (4, 1), (5, 1), (6, 1), (7, 1)] {
            hist.insert(symbol, weight);
        }
        let (nodes, root) = build_tree(&hist);
        let table = build_table(&nodes, root);
        let codes: Vec<(u64, u32)> = hist
            .keys()
            .map(|&s| table[s as usize])
            .filter(|&(_, len)| len > 0)
            .collect();
        for i in 0..codes.len() {
            for j in 0..codes.len() {
                if i == j {
                    continue;
                }
                let (a, la) = codes[i];
                let (b, lb) = codes[j];
                if la <= lb {
                    let prefix_of_b = b >> (lb - la);
                    assert_ne!(a, prefix_of_b, "code {i} is a prefix of code {j}");
                }
            }
        }
    }

    #[test]
    fn roundtrip_basic_widths() {
        roundtrip::<i32>(&[1, 2, 4, 5, 6, -3, 8]);
        roundtrip::<i64>(&[31014740000, 31000620000, 30985390000, 30968450000, 30950330000]);
        roundtrip::<i8>(&[-17, -54, -68, 13, 0, 41, 60, 127, -128]);
        roundtrip::<i16>(&[0, 181, 363, 5454, -32768, 32767]);
    }

    #[test]
    fn roundtrip_empty_block() {
        let a: Vec<i32> = vec![];
        roundtrip(&a);
    }

    #[test]
    fn roundtrip_single_symbol_degenerate_tree() {
        let a: Vec<i32> = vec![7; 40];
        roundtrip(&a);
    }

    #[test]
    fn roundtrip_i64_min_needs_65_bits() {
        roundtrip::<i64>(&[i64::MIN, 0, i64::MAX, i64::MIN, 1, -1]);
    }

    #[test]
    fn determinism_same_histogram_yields_identical_bytes() {
        let a: Vec<i32> = vec![1, -5, 1000, -1000, 0, 2, -2, 17];
        assert_eq!(encode(&a).unwrap(), encode(&a).unwrap());
    }

    #[test]
    fn skewed_distribution_compresses_better_than_raw_width() {
        let mut a: Vec<i32> = vec![1; 100];
        a.extend([123456, -654321]);
        let encoded = encode(&a).unwrap();
        assert!(encoded.len() < a.len() * std::mem::size_of::<i32>());
    }
}
