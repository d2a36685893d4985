//! The `HUFFMAN2` container
//!
//! ```text
//! magic        8 bytes   "HUFFMAN2"
//! count        8 bits    distinct symbols, 0 means 256
//! table        count x (symbol: 8 bits, length: 5 bits), (length, symbol) order
//! total        32 bits   encoded symbols, including repeats
//! payload      canonical codes, MSB first, zero-padded to a byte
//! ```
//!
//! Everything after the magic is one continuous bitstream, so the total and
//! the payload generally do not start on a byte boundary. An empty input is
//! stored as an empty file.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitstream::{BitReader, BitWriter};
use crate::canonical::CodeTable;
use crate::config::{CodecConfig, DecodeStrategy};
use crate::error::HuffmanError;
use crate::frequency::FrequencyTable;
use crate::tree;

pub const MAGIC: &[u8; 8] = b"HUFFMAN2";

const COUNT_BITS: u32 = 8;
const SYMBOL_BITS: u32 = 8;
const LENGTH_BITS: u32 = 5;
const TOTAL_BITS: u32 = 32;

/// Everything in front of the payload.
#[derive(Debug, Clone)]
pub struct Header {
    pub table: CodeTable,
    pub total_symbols: u32,
}

impl Header {
    /// Size of the serialized header in bits.
    pub fn bit_len(&self) -> u64 {
        (MAGIC.len() as u64) * 8
            + COUNT_BITS as u64
            + self.table.len() as u64 * (SYMBOL_BITS + LENGTH_BITS) as u64
            + TOTAL_BITS as u64
    }
}

/// Header facts reported by `inspect`, without decoding the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub container_size: u64,
    pub distinct_symbols: usize,
    pub total_symbols: u32,
    pub max_code_length: u32,
    pub header_bits: u64,
    /// Payload bits including the final padding.
    pub payload_bits: u64,
    pub bits_per_symbol: f64,
    /// `(symbol, length)` in table order.
    pub code_lengths: Vec<(u8, u32)>,
}

/// Compress `data` into `output`. Writes nothing for empty input.
pub fn encode<W: Write>(data: &[u8], output: W) -> Result<(), HuffmanError> {
    if data.is_empty() {
        return Ok(());
    }
    let total = u32::try_from(data.len()).map_err(|_| HuffmanError::InputTooLarge {
        size: data.len() as u64,
        limit: u32::MAX as u64,
    })?;

    let frequencies = FrequencyTable::from_bytes(data);
    let table = CodeTable::from_lengths(tree::code_lengths(&frequencies))?;
    debug!(
        distinct = table.len(),
        max_length = table.max_length(),
        total,
        "writing container"
    );

    let mut writer = BitWriter::new(output);
    writer.write_bytes(MAGIC)?;
    // 256 wraps to 0
    writer.write_number(table.len() as u64, COUNT_BITS)?;
    for entry in table.entries() {
        writer.write_number(entry.symbol as u64, SYMBOL_BITS)?;
        writer.write_number(entry.length as u64, LENGTH_BITS)?;
    }
    writer.write_number(total as u64, TOTAL_BITS)?;

    for &symbol in data {
        let entry = table.get(symbol).ok_or(HuffmanError::MissingSymbol(symbol))?;
        writer.write_number(entry.code as u64, entry.length)?;
    }
    writer.finish()?;
    Ok(())
}

fn read_field<R: Read>(
    reader: &mut BitReader<R>,
    bits: u32,
    field: &'static str,
) -> Result<u64, HuffmanError> {
    reader
        .read_number(bits)?
        .ok_or(HuffmanError::Truncated(field))
}

/// Read the header. `Ok(None)` means the input was empty, which is how an
/// empty input is stored.
pub fn read_header<R: Read>(
    reader: &mut BitReader<R>,
    verify_magic: bool,
) -> Result<Option<Header>, HuffmanError> {
    let mut magic = [0u8; 8];
    match reader.read_number(8)? {
        None => return Ok(None),
        Some(first) => magic[0] = first as u8,
    }
    if !reader.read_bytes(&mut magic[1..])? {
        return Err(HuffmanError::Truncated("magic tag"));
    }
    if verify_magic && &magic != MAGIC {
        return Err(HuffmanError::BadMagic { found: magic });
    }

    let count = match read_field(reader, COUNT_BITS, "symbol count")? {
        0 => 256,
        n => n as usize,
    };
    let mut lengths = Vec::with_capacity(count);
    for _ in 0..count {
        let symbol = read_field(reader, SYMBOL_BITS, "table symbol")? as u8;
        let length = read_field(reader, LENGTH_BITS, "table code length")? as u32;
        lengths.push((symbol, length));
    }
    let table = CodeTable::from_lengths(lengths)?;
    let total_symbols = read_field(reader, TOTAL_BITS, "symbol total")? as u32;
    debug!(
        distinct = table.len(),
        max_length = table.max_length(),
        total_symbols,
        "read container header"
    );
    Ok(Some(Header {
        table,
        total_symbols,
    }))
}

/// Decompress a container from `input` into `output`, returning the number
/// of bytes written.
pub fn decode<R: Read, W: Write>(
    input: R,
    mut output: W,
    config: &CodecConfig,
) -> Result<u64, HuffmanError> {
    let mut reader = BitReader::new(input);
    let Some(header) = read_header(&mut reader, config.verify_magic)? else {
        return Ok(0);
    };
    decode_payload(&mut reader, &header, config.decoder, &mut output)?;
    output.flush()?;
    Ok(header.total_symbols as u64)
}

fn decode_payload<R: Read, W: Write>(
    reader: &mut BitReader<R>,
    header: &Header,
    strategy: DecodeStrategy,
    output: &mut W,
) -> Result<(), HuffmanError> {
    const CHUNK: usize = 64 * 1024;
    let mut buffer = Vec::with_capacity(CHUNK.min(header.total_symbols as usize));
    for _ in 0..header.total_symbols {
        buffer.push(header.table.decode_symbol(reader, strategy)?);
        if buffer.len() == CHUNK {
            output.write_all(&buffer)?;
            buffer.clear();
        }
    }
    output.write_all(&buffer)?;
    Ok(())
}

/// Summarize a container held in memory.
pub fn inspect(container: &[u8], verify_magic: bool) -> Result<ContainerSummary, HuffmanError> {
    let mut reader = BitReader::new(container);
    let Some(header) = read_header(&mut reader, verify_magic)? else {
        return Ok(ContainerSummary::default());
    };
    let container_bits = container.len() as u64 * 8;
    let header_bits = header.bit_len();
    let payload_bits = container_bits.saturating_sub(header_bits);
    let bits_per_symbol = if header.total_symbols == 0 {
        0.0
    } else {
        payload_bits as f64 / header.total_symbols as f64
    };
    Ok(ContainerSummary {
        container_size: container.len() as u64,
        distinct_symbols: header.table.len(),
        total_symbols: header.total_symbols,
        max_code_length: header.table.max_length(),
        header_bits,
        payload_bits,
        bits_per_symbol,
        code_lengths: header
            .table
            .entries()
            .iter()
            .map(|e| (e.symbol, e.length))
            .collect(),
    })
}
