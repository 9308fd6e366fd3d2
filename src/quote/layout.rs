// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;

/// A named, fixed-size region of the quote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
}

impl Field {
    const fn new(name: &'static str, offset: usize, len: usize) -> Self {
        Self { name, offset, len }
    }

    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

/// Size of `sgx_quote_header_t`
pub const HEADER_LEN: usize = 48;
/// Size of `sgx_report_body_t`
pub const REPORT_BODY_LEN: usize = 384;
/// Shortest buffer that carries a complete header and report body
pub const MIN_QUOTE_LEN: usize = HEADER_LEN + REPORT_BODY_LEN;

// report body fields are relative to the end of the header
const fn body(name: &'static str, offset: usize, len: usize) -> Field {
    Field::new(name, HEADER_LEN + offset, len)
}

pub const VERSION: Field = Field::new("version", 0, 2);
pub const ATT_KEY_TYPE: Field = Field::new("att_key_type", 2, 2);
pub const MR_ENCLAVE: Field = body("mr_enclave", 64, 32);
pub const MR_SIGNER: Field = body("mr_signer", 128, 32);
pub const ISV_PROD_ID: Field = body("isv_prod_id", 256, 2);
pub const ISV_SVN: Field = body("isv_svn", 258, 2);
pub const REPORT_DATA: Field = body("report_data", 320, 64);

/// SGX ECDSA quote (v3) fields consumed by the relay, in layout order
pub const QUOTE_LAYOUT: [Field; 7] = [
    VERSION,
    ATT_KEY_TYPE,
    MR_ENCLAVE,
    MR_SIGNER,
    ISV_PROD_ID,
    ISV_SVN,
    REPORT_DATA,
];

/// Read-only view over a raw SGX ECDSA quote.  Construction checks that the
/// buffer is long enough for every field in [`QUOTE_LAYOUT`], so the
/// accessors never go out of bounds.
#[derive(Debug, Clone, Copy)]
pub struct Quote<'a> {
    raw: &'a [u8],
}

impl<'a> Quote<'a> {
    pub fn parse(raw: &'a [u8]) -> Result<Quote<'a>, Error> {
        let len = raw.len();

        if len < MIN_QUOTE_LEN {
            return Err(Error::Syntax(format!(
                "quote: expecting at least {MIN_QUOTE_LEN} bytes, got {len}"
            )));
        }

        Ok(Quote { raw })
    }

    /// The whole quote, as submitted
    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }

    pub fn field(&self, f: &Field) -> &'a [u8] {
        &self.raw[f.offset..f.end()]
    }

    /// MRENCLAVE, the measurement of the attested enclave
    pub fn measurement(&self) -> [u8; 32] {
        let mut m = [0u8; 32];
        m.copy_from_slice(self.field(&MR_ENCLAVE));
        m
    }

    pub fn mr_signer(&self) -> [u8; 32] {
        let mut m = [0u8; 32];
        m.copy_from_slice(self.field(&MR_SIGNER));
        m
    }

    /// The enclave-chosen report data, carrying the enclave's P-256 public key
    pub fn report_data(&self) -> [u8; 64] {
        let mut d = [0u8; 64];
        d.copy_from_slice(self.field(&REPORT_DATA));
        d
    }

    pub fn version(&self) -> u16 {
        self.read_u16(&VERSION)
    }

    pub fn att_key_type(&self) -> u16 {
        self.read_u16(&ATT_KEY_TYPE)
    }

    pub fn isv_prod_id(&self) -> u16 {
        self.read_u16(&ISV_PROD_ID)
    }

    pub fn isv_svn(&self) -> u16 {
        self.read_u16(&ISV_SVN)
    }

    fn read_u16(&self, f: &Field) -> u16 {
        let b = self.field(f);
        u16::from_le_bytes([b[0], b[1]])
    }
}
