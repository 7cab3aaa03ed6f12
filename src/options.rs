//! Flat configuration for [crate::encode], turned into the typed options of
//! each symbology.

use crate::datamatrix::{DataMatrixOptions, Encodation, SymbolShape};
use crate::error::{EncodeError, Result};
use crate::maxicode::{MaxiCodeOptions, StructuredCarrier};
use crate::pdf417::{Compaction, Pdf417Options};
use crate::qr::{EcLevel, QrOptions};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Symbology {
    #[default]
    DataMatrix,
    Pdf417,
    MicroPdf417,
    Qr,
    MaxiCode,
}

/// Options of every symbology in one place. Fields that do not apply to
/// the selected symbology are ignored.
///
/// ```
/// use symbology::{EncodeOptions, Symbology};
/// use symbology::qr::EcLevel;
///
/// let options = EncodeOptions::new(Symbology::Qr)
///     .set_qr_level(EcLevel::High)
///     .set_version(Some(2));
/// assert_eq!(options.qr().version, Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncodeOptions {
    pub symbology: Symbology,
    /// GS1 element string (Data Matrix and QR Code)
    pub gs1: bool,

    /// Rows of a PDF417/MicroPDF417, or of a Data Matrix together with `cols`
    pub rows: Option<u8>,
    /// Data columns of a PDF417/MicroPDF417, or Data Matrix columns
    pub cols: Option<u8>,

    pub shape: SymbolShape,
    pub encodation: Encodation,
    pub legacy_144: bool,

    pub compaction: Compaction,
    /// PDF417 ECC level 0..=8
    pub pdf417_level: Option<u8>,
    pub truncated: bool,
    pub eci: Option<u32>,

    pub qr_level: EcLevel,
    pub version: Option<u8>,
    pub mask: Option<u8>,
    pub boost: bool,

    pub maxicode_mode: Option<u8>,
    /// `"<postcode><country><service>"` for MaxiCode modes 2 and 3
    pub primary: Option<String>,
}

impl EncodeOptions {
    pub fn new(symbology: Symbology) -> Self {
        Self { symbology, ..Default::default() }
    }

    pub fn set_gs1(mut self, gs1: bool) -> Self {
        self.gs1 = gs1;
        self
    }

    pub fn set_rows(mut self, rows: Option<u8>) -> Self {
        self.rows = rows;
        self
    }

    pub fn set_cols(mut self, cols: Option<u8>) -> Self {
        self.cols = cols;
        self
    }

    pub fn set_shape(mut self, shape: SymbolShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn set_encodation(mut self, encodation: Encodation) -> Self {
        self.encodation = encodation;
        self
    }

    pub fn set_legacy_144(mut self, legacy_144: bool) -> Self {
        self.legacy_144 = legacy_144;
        self
    }

    pub fn set_compaction(mut self, compaction: Compaction) -> Self {
        self.compaction = compaction;
        self
    }

    pub fn set_pdf417_level(mut self, level: Option<u8>) -> Self {
        self.pdf417_level = level;
        self
    }

    pub fn set_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn set_eci(mut self, eci: Option<u32>) -> Self {
        self.eci = eci;
        self
    }

    pub fn set_qr_level(mut self, level: EcLevel) -> Self {
        self.qr_level = level;
        self
    }

    pub fn set_version(mut self, version: Option<u8>) -> Self {
        self.version = version;
        self
    }

    pub fn set_mask(mut self, mask: Option<u8>) -> Self {
        self.mask = mask;
        self
    }

    pub fn set_boost(mut self, boost: bool) -> Self {
        self.boost = boost;
        self
    }

    pub fn set_maxicode_mode(mut self, mode: Option<u8>) -> Self {
        self.maxicode_mode = mode;
        self
    }

    pub fn set_primary(mut self, primary: Option<String>) -> Self {
        self.primary = primary;
        self
    }

    pub fn data_matrix(&self) -> Result<DataMatrixOptions> {
        let size = match (self.rows, self.cols) {
            (Some(rows), Some(cols)) => Some((rows, cols)),
            (None, None) => None,
            _ => return Err(EncodeError::InvalidConfiguration(
                "a Data Matrix size needs both rows and columns".into())),
        };
        Ok(DataMatrixOptions {
            shape: self.shape,
            size,
            encodation: self.encodation,
            gs1: self.gs1,
            legacy_144: self.legacy_144,
        })
    }

    pub fn pdf417(&self) -> Pdf417Options {
        Pdf417Options {
            compaction: self.compaction,
            level: self.pdf417_level,
            cols: self.cols,
            rows: self.rows,
            truncated: self.truncated,
            eci: self.eci,
        }
    }

    pub fn qr(&self) -> QrOptions {
        QrOptions {
            version: self.version,
            level: self.qr_level,
            mask: self.mask,
            boost: self.boost,
            gs1: self.gs1,
        }
    }

    pub fn maxicode(&self) -> Result<MaxiCodeOptions> {
        let carrier = self.primary.as_deref().map(StructuredCarrier::parse).transpose()?;
        Ok(MaxiCodeOptions { mode: self.maxicode_mode, carrier })
    }
}
