//! Social network clients used by Telescout.
//!
//! Currently only the Telegram pipeline is implemented: a thin MTProto
//! client wrapper plus the per-channel fetch step the server fans out over.
pub mod telegram;
