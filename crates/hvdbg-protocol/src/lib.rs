//! # hvdbg-protocol
//!
//! The wire contract between the hvdbg interpreter and its backend driver.
//!
//! Requests are fixed-layout little-endian structures handed to an opaque,
//! synchronous [`Transport`]. The interpreter never sees the driver itself:
//! it encodes a request, allocates a zeroed response buffer, and reads back
//! however many bytes the driver reported.
//!
//! ## Layouts
//!
//! | request | size | fields |
//! |---|---|---|
//! | [`ReadMemoryRequest`] | 24 | address u64, pid u32, size u32, memory type u32, reading type u32 |
//! | [`MsrRequest`] | 24 | msr u64, core u32, action u32, value u64 |

pub mod error;
pub mod memory;
pub mod msr;
pub mod transport;

pub use error::{DecodeError, TransportError};
pub use memory::{MemoryType, ReadMemoryRequest, ReadingType};
pub use msr::{CoreSelector, MsrAction, MsrRequest, APPLY_ALL_CORES};
pub use transport::{send, ControlCode, ResponseBuffer, Transport};
