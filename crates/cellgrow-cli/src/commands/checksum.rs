use crate::cli::ChecksumArgs;
use crate::error::Result;
use cellgrow::core::io::checksum::{ChecksumEncoding, shelx_checksum_bytes, shelx_checksum_with};
use tracing::{debug, info, warn};

pub fn run(args: ChecksumArgs) -> Result<()> {
    info!("Computing SHELX checksum of {:?}", &args.file);
    let bytes = std::fs::read(&args.file)?;
    let encoding = if args.ascii {
        ChecksumEncoding::Ascii
    } else {
        ChecksumEncoding::Windows1250
    };
    let calculated = digest(&bytes, encoding);
    println!("{}", calculated);

    if let Some(expected) = args.expected {
        if expected == calculated {
            println!("✓ Checksum matches the expected value.");
        } else {
            warn!(expected, calculated, "Checksum mismatch.");
            println!(
                "Warning: checksum {} does not match the expected value {}.",
                calculated, expected
            );
        }
    }
    Ok(())
}

/// UTF-8 files are re-encoded to the code page; anything else is taken as code-page
/// bytes already.
fn digest(bytes: &[u8], encoding: ChecksumEncoding) -> u32 {
    match std::str::from_utf8(bytes) {
        Ok(text) => shelx_checksum_with(text, encoding),
        Err(_) => {
            debug!("File is not valid UTF-8; summing its raw bytes.");
            match encoding {
                ChecksumEncoding::Windows1250 => shelx_checksum_bytes(bytes),
                ChecksumEncoding::Ascii => {
                    let ascii: Vec<u8> = bytes.iter().copied().filter(u8::is_ascii).collect();
                    shelx_checksum_bytes(&ascii)
                }
            }
        }
    }
}
