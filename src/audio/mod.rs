//! Audio collaborator interfaces: decoding and window encoding.

pub mod decoder;
pub mod encoder;

pub use decoder::{AudioDecoder, DecodedAudio, MockDecoder, WavDecoder};
pub use encoder::{AudioEncoder, EncodedChunk, MockEncoder, WavEncoder};
