//! Container splitting: detects and unwraps an optional ZIP wrapper,
//! verifies the `fig-kiwi` magic, slices the payload into length-prefixed
//! chunks, and decompresses each chunk with the scheme its leading bytes
//! indicate.

use std::borrow::Cow;
use std::io::Read;

use thiserror::Error;
use tracing::debug;

/// 8-byte container magic, followed by a 4-byte version word.
pub const MAGIC: &[u8; 8] = b"fig-kiwi";

const ZIP_ENTRY_NAME: &str = "canvas.fig";
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// First two bytes of image payloads stored uncompressed: PNG, JPEG, GIF.
const IMAGE_SIGNATURES: [[u8; 2]; 3] = [[0x89, b'P'], [0xFF, 0xD8], [b'G', b'I']];

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("expected `fig-kiwi` magic, found {found:02x?}")]
    BadMagic { found: Vec<u8> },
    #[error("not a scene container and not a readable wrapper archive: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("wrapper archive has no `canvas.fig` entry; entries: {entries:?}")]
    MissingEntry { entries: Vec<String> },
    #[error("failed reading wrapper entry `canvas.fig`: {0}")]
    EntryRead(#[from] std::io::Error),
    #[error("container yielded {found} chunk(s), need at least 2 (schema + data)")]
    TooFewChunks { found: usize },
}

/// Split a raw container buffer into its decompressed chunks, in order.
///
/// The buffer either starts with the magic directly or is a ZIP archive
/// holding the magic-prefixed payload under a fixed entry name.
pub fn split_chunks(data: &[u8]) -> Result<Vec<Vec<u8>>, ContainerError> {
    let payload = unwrap_archive(data)?;
    if !payload.starts_with(MAGIC) {
        return Err(ContainerError::BadMagic {
            found: payload.iter().copied().take(MAGIC.len()).collect(),
        });
    }

    // Skip magic plus the version word.
    let mut offset = MAGIC.len() + 4;
    let mut chunks = Vec::new();
    while offset + 4 <= payload.len() {
        let len = u32::from_le_bytes([
            payload[offset],
            payload[offset + 1],
            payload[offset + 2],
            payload[offset + 3],
        ]) as usize;
        offset += 4;
        if len == 0 || offset + len > payload.len() {
            break;
        }
        chunks.push(decompress_chunk(&payload[offset..offset + len]));
        offset += len;
    }

    debug!(chunks = chunks.len(), "container split");
    if chunks.len() < 2 {
        return Err(ContainerError::TooFewChunks {
            found: chunks.len(),
        });
    }
    Ok(chunks)
}

/// Extract the magic-prefixed payload from a ZIP wrapper, or pass the
/// buffer through when it already starts with the magic.
fn unwrap_archive(data: &[u8]) -> Result<Cow<'_, [u8]>, ContainerError> {
    if data.starts_with(MAGIC) {
        return Ok(Cow::Borrowed(data));
    }

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data))?;
    let names: Vec<String> = archive.file_names().map(String::from).collect();
    if !names.iter().any(|n| n == ZIP_ENTRY_NAME) {
        return Err(ContainerError::MissingEntry { entries: names });
    }

    let mut entry = archive.by_name(ZIP_ENTRY_NAME)?;
    let mut payload = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut payload)?;
    Ok(Cow::Owned(payload))
}

/// Decompress one chunk. Uncompressed image payloads pass through
/// untouched; Zstandard frames are recognized by magic; everything else
/// tries raw deflate, then Zstandard, and finally falls back to the raw
/// bytes so a single unusable chunk cannot abort the decode.
fn decompress_chunk(chunk: &[u8]) -> Vec<u8> {
    if chunk.len() >= 2 && IMAGE_SIGNATURES.contains(&[chunk[0], chunk[1]]) {
        return chunk.to_vec();
    }
    if chunk.len() >= 4 && chunk[..4] == ZSTD_MAGIC {
        return zstd::stream::decode_all(chunk).unwrap_or_else(|_| chunk.to_vec());
    }
    if let Ok(out) = inflate_raw(chunk) {
        return out;
    }
    if let Ok(out) = zstd::stream::decode_all(chunk) {
        return out;
    }
    chunk.to_vec()
}

fn inflate_raw(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    flate2::read::DeflateDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}
