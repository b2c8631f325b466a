//! Elementary stream framing.
//!
//! Only the Annex-B byte stream format is supported: units are delimited by
//! `00 00 01` start codes, optionally preceded by one extra zero byte.

/// Annex-B start code scanning and access unit grouping
pub mod annexb;
