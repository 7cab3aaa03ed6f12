//! Encoders for 2D symbologies: PDF417 (and its truncated and Micro
//! variants), Data Matrix ECC200, QR Code and MaxiCode.
//!
//! Every encoder turns a byte message into codewords, protects them with
//! Reed-Solomon error correction and lays them out as a [BitMatrix] of
//! modules. Drawing the modules is left to the caller, either by hand or
//! through the `embedded-graphics` adapter.
//!
//! ```
//! use symbology::{encode, EncodeOptions, Symbol, Symbology};
//!
//! let symbol = encode(b"123456", &EncodeOptions::new(Symbology::DataMatrix)).unwrap();
//! assert!(matches!(symbol, Symbol::DataMatrix(_)));
//! assert_eq!(symbol.matrix().width(), 10);
//! ```

pub mod datamatrix;
pub mod ecc;
pub mod error;
pub mod gs1;
pub mod matrix;
pub mod maxicode;
pub mod options;
pub mod pdf417;
pub mod qr;

use log::debug;

use datamatrix::DataMatrixSymbol;
use maxicode::MaxiCodeSymbol;
use pdf417::Pdf417Symbol;
use qr::QrSymbol;

pub use error::{EncodeError, Result};
pub use matrix::{BitMatrix, Render};
pub use options::{EncodeOptions, Symbology};

/// A symbol produced by [encode].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    DataMatrix(DataMatrixSymbol),
    Pdf417(Pdf417Symbol),
    MicroPdf417(Pdf417Symbol),
    Qr(QrSymbol),
    MaxiCode(MaxiCodeSymbol),
}

impl Symbol {
    pub const fn symbology(&self) -> Symbology {
        match self {
            Symbol::DataMatrix(_) => Symbology::DataMatrix,
            Symbol::Pdf417(_) => Symbology::Pdf417,
            Symbol::MicroPdf417(_) => Symbology::MicroPdf417,
            Symbol::Qr(_) => Symbology::Qr,
            Symbol::MaxiCode(_) => Symbology::MaxiCode,
        }
    }

    pub const fn matrix(&self) -> &BitMatrix {
        match self {
            Symbol::DataMatrix(s) => &s.matrix,
            Symbol::Pdf417(s) | Symbol::MicroPdf417(s) => &s.matrix,
            Symbol::Qr(s) => &s.matrix,
            Symbol::MaxiCode(s) => &s.matrix,
        }
    }

    pub fn render(&self) -> Render<'_> {
        match self {
            Symbol::DataMatrix(s) => s.render(),
            Symbol::Pdf417(s) | Symbol::MicroPdf417(s) => s.render(),
            Symbol::Qr(s) => s.render(),
            Symbol::MaxiCode(s) => s.render(),
        }
    }
}

/// Encodes `data` with the symbology and settings of `options`.
pub fn encode(data: &[u8], options: &EncodeOptions) -> Result<Symbol> {
    if options.gs1 && !matches!(options.symbology, Symbology::DataMatrix | Symbology::Qr) {
        return Err(EncodeError::InvalidConfiguration(format!("GS1 is not available for {:?}", options.symbology)));
    }
    debug!("encoding {} bytes as {:?}", data.len(), options.symbology);

    Ok(match options.symbology {
        Symbology::DataMatrix => Symbol::DataMatrix(datamatrix::encode(data, &options.data_matrix()?)?),
        Symbology::Pdf417 => Symbol::Pdf417(pdf417::encode(data, &options.pdf417())?),
        Symbology::MicroPdf417 => Symbol::MicroPdf417(pdf417::encode_micro(data, &options.pdf417())?),
        Symbology::Qr => Symbol::Qr(qr::encode(data, &options.qr())?),
        Symbology::MaxiCode => Symbol::MaxiCode(maxicode::encode(data, &options.maxicode()?)?),
    })
}
