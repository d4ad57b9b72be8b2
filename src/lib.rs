//! Protected firmware packaging
//!
//! Encrypts a firmware image together with its release message and signs the
//! result, producing a blob a bootloader can authenticate before decrypting:
//!
//! ```text
//! signature ‖ version ‖ plaintext_length ‖ ciphertext_length ‖ iv ‖ ciphertext
//! ```
//!
//! # Example
//!
//! ```no_run
//! use fwprotect::{open, package, KeyMaterial};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let keys = KeyMaterial::load("secret_build_output.txt")?;
//! let blob = package(b"ABC", 1, "v1", &keys)?;
//!
//! // Self-check before shipping
//! let released = open(&blob, &keys)?;
//! assert_eq!(released.payload(), b"ABCv1\0");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod keys;
pub mod package;
pub mod prelude;
pub mod verify;

#[cfg(test)]
mod testing;

pub use error::FwProtectError;
pub use keys::{KeyMaterial, DEFAULT_SECRETS_FILE};
pub use package::{compose_payload, package, package_checked_version, Packager};
pub use verify::{open, open_with, ReleasedFirmware};

// Re-export the lower crates for callers that need the wire or crypto types
pub use fwprotect_crypto as crypto;
pub use fwprotect_protocol as protocol;
