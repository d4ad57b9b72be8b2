use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::prelude::__tracing_subscriber_SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use fwprotect::crypto::{sha256, Zeroizing};
use fwprotect::protocol::FirmwareBlob;
use fwprotect::{open, package, FwProtectError, KeyMaterial, DEFAULT_SECRETS_FILE};

#[derive(Parser, Debug)]
#[command(name = "fw-protect", version, about = "Encrypt and sign firmware update blobs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Package a firmware image into a protected blob
    Protect {
        /// Plaintext firmware image
        #[arg(long)]
        infile: PathBuf,
        /// Where to write the protected blob
        #[arg(long)]
        outfile: PathBuf,
        /// Firmware version, 0 for a debug build
        #[arg(long)]
        version: u16,
        /// Release message appended to the firmware
        #[arg(long)]
        message: String,
        /// Secrets file from key provisioning
        #[arg(long, env = "FWPROTECT_SECRETS", default_value = DEFAULT_SECRETS_FILE)]
        secrets: PathBuf,
    },
    /// Print the layout of a protected blob as JSON
    Inspect {
        blob: PathBuf,
        /// Signature width in bytes (RSA modulus size)
        #[arg(long, default_value_t = 128)]
        signature_len: usize,
    },
    /// Check a blob's signature and decrypt it with the given secrets
    Verify {
        blob: PathBuf,
        #[arg(long, env = "FWPROTECT_SECRETS", default_value = DEFAULT_SECRETS_FILE)]
        secrets: PathBuf,
        /// Length of the firmware image, to recover the release message after it
        #[arg(long)]
        firmware_len: Option<usize>,
    },
}

#[derive(Serialize, Debug)]
struct BlobReport {
    signature_len: usize,
    version: u16,
    debug: bool,
    plaintext_length: u16,
    ciphertext_length: u16,
    iv: String,
    signature: String,
    digest: String,
}

#[derive(Serialize, Debug)]
struct VerifyReport {
    version: u16,
    debug: bool,
    payload_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Read a plaintext firmware image into a buffer that is wiped on drop
fn read_firmware(path: &Path) -> Result<Zeroizing<Vec<u8>>, FwProtectError> {
    Ok(std::fs::read(path).map(Zeroizing::new)?)
}

fn protect(
    infile: &Path,
    outfile: &Path,
    version: u16,
    message: &str,
    secrets: &Path,
) -> Result<(), FwProtectError> {
    let firmware = read_firmware(infile)?;
    let keys = KeyMaterial::load(secrets)?;
    info!(
        "Packaging {} ({} bytes) as version {}",
        infile.display(),
        firmware.len(),
        version
    );

    let blob = package(&firmware, version, message, &keys)?;
    // Refuse to write anything we cannot read back
    open(&blob, &keys)?;

    // Write beside the target and rename, so a failure never leaves a partial blob
    let dir = match outfile.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    std::io::Write::write_all(&mut tmp, &blob)?;
    tmp.persist(outfile).map_err(|e| FwProtectError::Io(e.error))?;

    info!("Wrote {} bytes to {}", blob.len(), outfile.display());
    Ok(())
}

fn inspect(path: &Path, signature_len: usize) -> Result<BlobReport, FwProtectError> {
    let bytes = std::fs::read(path)?;
    let blob = FirmwareBlob::parse(&bytes, signature_len)?;
    debug!("Parsed blob metadata: {:?}", blob.metadata);
    Ok(BlobReport {
        signature_len,
        version: blob.metadata.version,
        debug: blob.metadata.is_debug(),
        plaintext_length: blob.metadata.plaintext_length,
        ciphertext_length: blob.metadata.ciphertext_length,
        iv: BASE64.encode(blob.iv),
        signature: BASE64.encode(&blob.signature),
        digest: BASE64.encode(sha256(&[blob.signed_region().as_slice()])),
    })
}

fn verify(
    path: &Path,
    secrets: &Path,
    firmware_len: Option<usize>,
) -> Result<VerifyReport, FwProtectError> {
    let bytes = std::fs::read(path)?;
    let keys = KeyMaterial::load(secrets)?;
    let released = open(&bytes, &keys)?;
    info!("Signature valid for {}", path.display());

    let message = match firmware_len {
        Some(len) => {
            let (_, message) = released.split_message(len).ok_or_else(|| {
                FwProtectError::InvalidLength(format!(
                    "firmware length {} does not leave a UTF-8 release message in a {}-byte payload",
                    len,
                    released.payload().len()
                ))
            })?;
            Some(message.to_string())
        }
        None => None,
    };

    Ok(VerifyReport {
        version: released.version(),
        debug: released.is_debug(),
        payload_length: released.payload().len(),
        message,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), FwProtectError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| FwProtectError::Io(std::io::Error::other(e)))?;
    println!("{}", json);
    Ok(())
}

fn run(cli: Cli) -> Result<(), FwProtectError> {
    match cli.command {
        Command::Protect {
            infile,
            outfile,
            version,
            message,
            secrets,
        } => protect(&infile, &outfile, version, &message, &secrets),
        Command::Inspect {
            blob,
            signature_len,
        } => print_json(&inspect(&blob, signature_len)?),
        Command::Verify {
            blob,
            secrets,
            firmware_len,
        } => print_json(&verify(&blob, &secrets, firmware_len)?),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            if let Some(hint) = e.suggestion() {
                eprintln!("hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}
