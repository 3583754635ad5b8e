//! Seekable byte streams handed through the pipeline.

use std::io::{Read, Seek};

/// A readable, seekable byte stream.
///
/// Blanket-implemented for every `Read + Seek` type so that pipeline stages
/// can accept `&mut dyn ReadSeek`. Trust verification may consume stream
/// position, so every stage after the gate rewinds before reading.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}
