//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - The long-term vault key and its on-disk lifecycle (`keystore`)
//! - AES-256-GCM sealing and opening of secrets (`cipher`)

pub mod cipher;
pub mod keystore;

pub use cipher::{AuthenticatedCipher, SealedToken};
pub use keystore::{Key, KeyStore, KEY_LEN};
