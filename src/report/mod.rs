// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

//! The report module turns verified quote claims into the artefact handed
//! back to the client: a SCALE-encoded [`RegisterPayload`] signed with the
//! relay's sr25519 [`ServiceKeyPair`].
//!
//! # Example
//!
//! ```
//! use dcap_relay::report::{verify_signature, MultiSigner, RegisterPayload, ServiceKeyPair};
//! use parity_scale_codec::Encode;
//!
//! let kp = ServiceKeyPair::from_seed(&[42; 32]).expect("deriving key pair");
//!
//! let payload = RegisterPayload {
//!     code: vec![0; 32],
//!     who: vec![1, 2, 3],
//!     pubkey: vec![0; 64],
//!     public: MultiSigner::Sr25519(kp.public_key()),
//! };
//!
//! let sig = kp.sign(&payload.encode());
//!
//! assert!(verify_signature(&kp.public_key(), &payload.encode(), &sig));
//! ```

pub use self::errors::Error;
pub use self::payload::{MultiSigner, RegisterPayload, SignedReport};
pub use self::signer::{parse_seed, verify_signature, ServiceKeyPair, SEED_LEN};

mod errors;
mod payload;
pub mod scale;
mod signer;
