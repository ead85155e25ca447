use crc32fast::Hasher;

/// Generate document ID from file path using CRC32
pub fn get_document_id(path: &str) -> String {
    let mut buff = String::from(path);
    if !path.starts_with("file://") {
        buff = format!("file://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for instances and style sources within a document.
///
/// Ids have the shape `{seed}-{count}`. A generator re-created for a document
/// that already contains ids must [`observe`](IdGenerator::observe) them first
/// so it never reissues one.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(path: &str) -> Self {
        Self {
            seed: get_document_id(path),
            count: 0,
        }
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count = self.count.saturating_add(1);
        format!("{}-{}", self.seed, self.count)
    }

    /// Advance the counter past `id` if it was issued under this seed.
    ///
    /// Suffixes the counter could never move past are ignored; an id that
    /// large is treated like any foreign id.
    pub fn observe(&mut self, id: &str) {
        let suffix = id
            .strip_prefix(self.seed.as_str())
            .and_then(|rest| rest.strip_prefix('-'));

        if let Some(n) = suffix.and_then(|s| s.parse::<u64>().ok()).filter(|n| *n < u64::MAX) {
            self.advance_to(n);
        }
    }

    /// Never issue an id at or below `count`
    pub fn advance_to(&mut self, count: u64) {
        self.count = self.count.max(count);
    }

    pub fn observe_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            self.observe(id);
        }
    }

    /// Get document ID seed
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of ids issued (or observed) so far
    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_generation() {
        let id1 = get_document_id("/home.page.json");
        let id2 = get_document_id("/home.page.json");

        // Same path always generates same ID
        assert_eq!(id1, id2);

        // Different paths generate different IDs
        let id3 = get_document_id("/about.page.json");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("/test.page.json");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id3.ends_with("-3"));

        let seed = gen.seed();
        assert!(id1.starts_with(seed));
        assert!(id3.starts_with(seed));
    }

    #[test]
    fn test_observe_skips_existing_ids() {
        let mut gen = IdGenerator::from_seed("doc");
        gen.observe_all(["doc-4", "doc-12", "other-99", "doc-x", "root"]);

        assert_eq!(gen.count(), 12);
        assert_eq!(gen.new_id(), "doc-13");
    }

    #[test]
    fn test_observe_never_moves_backwards() {
        let mut gen = IdGenerator::from_seed("doc");
        gen.new_id();
        gen.new_id();
        gen.observe("doc-1");

        assert_eq!(gen.new_id(), "doc-3");
    }

    #[test]
    fn test_observe_past_u32_range() {
        let mut gen = IdGenerator::from_seed("p");
        gen.observe("p-4294967295");

        assert_eq!(gen.new_id(), "p-4294967296");
    }

    #[test]
    fn test_observe_ignores_unadvanceable_suffix() {
        let mut gen = IdGenerator::from_seed("p");
        gen.observe("p-3");
        gen.observe("p-18446744073709551615");
        gen.observe("p-99999999999999999999999");

        assert_eq!(gen.count(), 3);
        assert_eq!(gen.new_id(), "p-4");
    }
}
