pub mod decode;
pub mod framing;
