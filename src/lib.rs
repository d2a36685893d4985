//! canon-huff: canonical Huffman compression for whole files.
//!
//! Compression counts byte frequencies, builds a Huffman tree, keeps only
//! the resulting code lengths, and reassigns codes canonically so the
//! container needs to carry nothing but `(symbol, length)` pairs:
//! - [`bitstream`]: MSB-first bit reader and writer
//! - [`frequency`]: per-symbol counts
//! - [`tree`]: Huffman tree and code lengths
//! - [`canonical`]: canonical code table and symbol matching
//! - [`container`]: the `HUFFMAN2` file layout

pub mod bitstream;
pub mod canonical;
pub mod config;
pub mod container;
pub mod error;
pub mod frequency;
pub mod tree;

use std::io::{Read, Write};

use tracing::info;

use crate::config::CodecConfig;
use crate::container::ContainerSummary;
use crate::error::HuffmanError;
use crate::frequency::FrequencyTable;

pub use crate::canonical::{CodeEntry, CodeTable};
pub use crate::config::DecodeStrategy;

/// Size and entropy figures for one compression call
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CompressionReport {
    pub original_size: usize,
    pub compressed_size: usize,
    /// compressed / original; 1.0 for empty input
    pub ratio: f64,
    /// Shannon entropy of the input in bits per byte
    pub entropy_bits: f64,
}

/// Compressor and decompressor bound to one configuration
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn check_size(&self, size: usize) -> Result<(), HuffmanError> {
        if size as u64 > self.config.max_input_size {
            return Err(HuffmanError::InputTooLarge {
                size: size as u64,
                limit: self.config.max_input_size,
            });
        }
        Ok(())
    }

    /// Compress `data` into `output`. Empty input produces no output at all.
    pub fn compress_to<W: Write>(&self, data: &[u8], output: W) -> Result<(), HuffmanError> {
        self.check_size(data.len())?;
        container::encode(data, output)
    }

    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>, HuffmanError> {
        let mut output = Vec::new();
        self.compress_to(data, &mut output)?;
        info!(
            original = data.len(),
            compressed = output.len(),
            "compressed"
        );
        Ok(output)
    }

    /// Compress and report sizes and entropy alongside the bytes.
    pub fn compress_with_report(
        &self,
        data: &[u8],
    ) -> Result<(Vec<u8>, CompressionReport), HuffmanError> {
        let compressed = self.compress(data)?;
        let ratio = if data.is_empty() {
            1.0
        } else {
            compressed.len() as f64 / data.len() as f64
        };
        let report = CompressionReport {
            original_size: data.len(),
            compressed_size: compressed.len(),
            ratio,
            entropy_bits: FrequencyTable::from_bytes(data).entropy_bits(),
        };
        Ok((compressed, report))
    }

    /// Decompress a container read from `input`, returning the number of
    /// bytes written to `output`.
    pub fn decompress_to<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
    ) -> Result<u64, HuffmanError> {
        container::decode(input, output, &self.config)
    }

    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, HuffmanError> {
        let mut output = Vec::new();
        self.decompress_to(data, &mut output)?;
        info!(
            compressed = data.len(),
            decompressed = output.len(),
            "decompressed"
        );
        Ok(output)
    }

    /// Describe a container's header without decoding its payload.
    pub fn inspect(&self, data: &[u8]) -> Result<ContainerSummary, HuffmanError> {
        container::inspect(data, self.config.verify_magic)
    }
}
