//! JS8 physical layer: decimation, sync search, LDPC(174,87) decode and
//! encode, and the multi-submode worker that ties them together.

pub mod baseline;
pub mod config;
pub mod costas;
pub mod crc;
pub mod decimator;
pub mod decoder;
pub mod encoder;
pub mod events;
pub mod fft;
pub mod ldpc;
pub mod message;
pub mod ringbuffer;
pub mod simulation;
pub mod submode;
pub mod subtract;
pub mod symbol;
pub mod sync;
pub mod tracing_init;
pub mod worker;

pub use config::JobParams;
pub use decoder::{decode_candidate, decode_pass, decode_pass_with_events, Decoded, SyncNotice};
pub use encoder::encode;
pub use events::Event;
pub use submode::Submode;
