//! Error correction engines: a generic GF(2^m) Reed-Solomon encoder shared
//! by Data Matrix, QR Code and MaxiCode, and the modulo 929 arithmetic used
//! by PDF417.

pub mod galois;
pub mod pdf417;

pub use galois::ReedSolomon;
