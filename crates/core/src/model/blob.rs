use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// The blob table of one decode session: raw byte payloads (image data or
/// path-geometry opcode streams) addressed by integer index.
#[derive(Debug, Clone, Default)]
pub struct BlobStore {
    blobs: Vec<Vec<u8>>,
}

impl BlobStore {
    pub fn new(blobs: Vec<Vec<u8>>) -> Self {
        Self { blobs }
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn bytes(&self, index: usize) -> Option<&[u8]> {
        self.blobs.get(index).map(Vec::as_slice)
    }

    /// Materialize an image blob as a `data:` URL, sniffing the mime type
    /// from the payload signature.
    pub fn data_url(&self, index: usize) -> Option<String> {
        let bytes = self.bytes(index)?;
        Some(format!(
            "data:{};base64,{}",
            sniff_mime(bytes),
            STANDARD.encode(bytes)
        ))
    }
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "application/octet-stream"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_blobs_in_order() {
        let store = BlobStore::new(vec![vec![1, 2], vec![], vec![3]]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.bytes(0), Some(&[1u8, 2][..]));
        assert_eq!(store.bytes(1), Some(&[][..]));
        assert_eq!(store.bytes(3), None);
    }

    #[test]
    fn data_url_sniffs_png() {
        let store = BlobStore::new(vec![vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A]]);
        let url = store.data_url(0).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn unknown_payload_falls_back_to_octet_stream() {
        let store = BlobStore::new(vec![vec![0x00, 0x01]]);
        assert!(store.data_url(0).unwrap().starts_with("data:application/octet-stream;"));
    }
}
