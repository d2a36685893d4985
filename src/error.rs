//! Error types for canon-huff

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuffmanError {
    #[error("truncated stream while reading {0}")]
    Truncated(&'static str),

    #[error("unknown magic tag {found:?}, expected \"HUFFMAN2\"")]
    BadMagic { found: [u8; 8] },

    #[error("invalid code length {length} for symbol {symbol:#04x}")]
    InvalidCodeLength { symbol: u8, length: u32 },

    #[error("symbol {0:#04x} appears twice in the code table")]
    DuplicateSymbol(u8),

    #[error("code lengths are oversubscribed (Kraft sum exceeds 1)")]
    Oversubscribed,

    #[error("no code matches the bit pattern {code:#b} ({bits} bits)")]
    InvalidCode { code: u32, bits: u32 },

    #[error("symbol {0:#04x} has no code in the table")]
    MissingSymbol(u8),

    #[error("input of {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: u64, limit: u64 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
