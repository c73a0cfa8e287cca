use crate::block::BlockId;
use crc32fast::Hasher;

/// Generate a document seed from its name using CRC32
pub fn get_document_seed(name: &str) -> String {
    let mut buff = String::from(name);
    if !name.starts_with("report://") {
        buff = format!("report://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:08x}", hasher.finalize())
}

/// Sequential id generator for blocks within a document
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Document seed (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(document_name: &str) -> Self {
        Self {
            seed: get_document_seed(document_name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> BlockId {
        self.count += 1;
        BlockId::new(format!("{}-{}", self.seed, self.count))
    }

    /// Generate the next id for which `taken` returns false
    ///
    /// Documents loaded from JSON may already hold ids from this seed.
    pub fn new_unique_id(&mut self, taken: impl Fn(&BlockId) -> bool) -> BlockId {
        loop {
            let id = self.new_id();
            if !taken(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_seed_generation() {
        let seed1 = get_document_seed("quarterly");
        let seed2 = get_document_seed("quarterly");

        // Same name always generates same seed
        assert_eq!(seed1, seed2);

        // Different names generate different seeds
        let seed3 = get_document_seed("monthly");
        assert_ne!(seed1, seed3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("quarterly");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.as_str().ends_with("-1"));
        assert!(id2.as_str().ends_with("-2"));
        assert!(id1.as_str().starts_with(gen.seed()));
    }

    #[test]
    fn test_unique_id_skips_taken() {
        let mut gen = IdGenerator::from_seed("abc".to_string());
        let taken = [BlockId::from("abc-1"), BlockId::from("abc-2")];

        let id = gen.new_unique_id(|candidate| taken.contains(candidate));
        assert_eq!(id.as_str(), "abc-3");
    }
}
