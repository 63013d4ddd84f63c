use crate::node::NodeId;
use crc32fast::Hasher;

/// Generate an id seed from a project id using CRC32
pub fn get_seed(project_id: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(project_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes within a project
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String, // Project seed (CRC32)
    count: u64,   // Sequential counter
}

impl IdGenerator {
    pub fn new(project_id: &str) -> Self {
        Self {
            seed: get_seed(project_id),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential id
    pub fn new_id(&mut self) -> NodeId {
        self.count += 1;
        NodeId::new(format!("{}-{}", self.seed, self.count))
    }

    /// Advance past an id issued by this seed, so it is never handed out again
    pub fn observe(&mut self, id: &NodeId) {
        let issued = id
            .as_str()
            .strip_prefix(self.seed.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<u64>().ok());

        if let Some(n) = issued {
            self.count = self.count.max(n);
        }
    }

    /// Get seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}
