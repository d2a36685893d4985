//! Canonical code assignment and symbol matching
//!
//! Codes are a pure function of the `(length, symbol)` pairs: entries are
//! sorted by length then symbol, and each code is the previous one plus one,
//! shifted left whenever the length grows. That is what lets the container
//! store lengths only.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::bitstream::BitReader;
use crate::config::DecodeStrategy;
use crate::error::HuffmanError;
use crate::tree::MAX_CODE_LENGTH;

const LENGTH_SLOTS: usize = MAX_CODE_LENGTH as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub symbol: u8,
    pub length: u32,
    pub code: u32,
}

/// A canonical prefix code over byte symbols.
#[derive(Debug, Clone)]
pub struct CodeTable {
    /// Ordered by (length, symbol).
    sorted: Vec<CodeEntry>,
    by_symbol: [Option<u16>; 256],
    first_code: [u32; LENGTH_SLOTS],
    first_index: [usize; LENGTH_SLOTS],
    count: [u32; LENGTH_SLOTS],
}

impl CodeTable {
    /// Assign canonical codes to `(symbol, length)` pairs.
    ///
    /// Rejects lengths outside `1..=31`, repeated symbols, and length sets
    /// that violate the Kraft inequality. Incomplete codes are accepted.
    pub fn from_lengths<I>(lengths: I) -> Result<Self, HuffmanError>
    where
        I: IntoIterator<Item = (u8, u32)>,
    {
        let mut seen = [false; 256];
        let mut sorted = Vec::new();
        let mut kraft = 0u64;
        for (symbol, length) in lengths {
            if !(1..=MAX_CODE_LENGTH).contains(&length) {
                return Err(HuffmanError::InvalidCodeLength { symbol, length });
            }
            if std::mem::replace(&mut seen[symbol as usize], true) {
                return Err(HuffmanError::DuplicateSymbol(symbol));
            }
            kraft += 1u64 << (MAX_CODE_LENGTH - length);
            sorted.push(CodeEntry {
                symbol,
                length,
                code: 0,
            });
        }
        if kraft > 1u64 << MAX_CODE_LENGTH {
            return Err(HuffmanError::Oversubscribed);
        }

        sorted.sort_unstable_by_key(|e| (e.length, e.symbol));

        let mut code = 0u32;
        let mut previous_length = 0u32;
        for entry in sorted.iter_mut() {
            code <<= entry.length - previous_length;
            entry.code = code;
            code += 1;
            previous_length = entry.length;
        }

        let mut table = Self {
            sorted,
            by_symbol: [None; 256],
            first_code: [0; LENGTH_SLOTS],
            first_index: [0; LENGTH_SLOTS],
            count: [0; LENGTH_SLOTS],
        };
        for (index, entry) in table.sorted.iter().enumerate() {
            let slot = entry.length as usize;
            if table.count[slot] == 0 {
                table.first_code[slot] = entry.code;
                table.first_index[slot] = index;
            }
            table.count[slot] += 1;
            table.by_symbol[entry.symbol as usize] = Some(index as u16);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Entries in (length, symbol) order.
    pub fn entries(&self) -> &[CodeEntry] {
        &self.sorted
    }

    pub fn get(&self, symbol: u8) -> Option<&CodeEntry> {
        self.by_symbol[symbol as usize].map(|i| &self.sorted[i as usize])
    }

    pub fn max_length(&self) -> u32 {
        self.sorted.last().map_or(0, |e| e.length)
    }

    fn match_linear(&self, code: u32, bits: u32) -> Option<u8> {
        self.sorted
            .iter()
            .find(|e| e.length == bits && e.code == code)
            .map(|e| e.symbol)
    }

    fn match_indexed(&self, code: u32, bits: u32) -> Option<u8> {
        let slot = bits as usize;
        let offset = code.checked_sub(self.first_code[slot])?;
        if offset < self.count[slot] {
            Some(self.sorted[self.first_index[slot] + offset as usize].symbol)
        } else {
            None
        }
    }

    /// Read bits until they spell a code and return its symbol.
    ///
    /// Fails with `Truncated` if the stream ends first and with `InvalidCode`
    /// if no code of any length matches.
    pub fn decode_symbol<R: Read>(
        &self,
        reader: &mut BitReader<R>,
        strategy: DecodeStrategy,
    ) -> Result<u8, HuffmanError> {
        let mut code = 0u32;
        let mut bits = 0u32;
        while bits < self.max_length() {
            let bit = reader
                .read_bit()?
                .ok_or(HuffmanError::Truncated("encoded payload"))?;
            code = (code << 1) | bit as u32;
            bits += 1;
            let found = match strategy {
                DecodeStrategy::LinearScan => self.match_linear(code, bits),
                DecodeStrategy::LengthIndexed => self.match_indexed(code, bits),
            };
            if let Some(symbol) = found {
                return Ok(symbol);
            }
        }
        Err(HuffmanError::InvalidCode { code, bits })
    }
}
