use symhd_hashes::{Blake2b, HashAdapter};

/// Adapter that ignores the requested length and always answers with `len`
/// bytes: a Blake2b digest cut short, or padded with `0xff`.
pub struct MockAdapter {
    len: usize,
}

impl MockAdapter {
    pub fn new(len: usize) -> Self {
        Self { len }
    }

    fn resize(&self, mut out: Vec<u8>) -> Vec<u8> {
        out.resize(self.len, 0xff);
        out
    }
}

impl HashAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn output_len(&self) -> usize {
        Blake2b.output_len()
    }

    fn hash(&self, data: &[u8], _length: usize) -> Vec<u8> {
        self.resize(Blake2b.hash(data, Blake2b.output_len()))
    }

    fn keyed_hash(&self, key: &[u8], data: &[u8], _length: usize) -> Vec<u8> {
        self.resize(Blake2b.keyed_hash(key, data, Blake2b.output_len()))
    }
}
