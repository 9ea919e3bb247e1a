use std::sync::Arc;

use crate::engine::types::{Block, BlockId};
use serde_json::{Value, json};
use std::collections::HashMap;

pub struct BlockFactory {
    params: HashMap<String, Value>,
}

impl BlockFactory {
    pub fn new() -> Self {
        let mut params = HashMap::new();
        params.insert("id".into(), json!("block-1"));
        params.insert("size".into(), json!(256));
        params.insert("fill".into(), json!(0xAB));
        Self { params }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn create(self) -> (BlockId, Arc<Block>) {
        let id = BlockId::from(self.params["id"].as_str().unwrap());
        let size = self.params["size"].as_u64().unwrap() as usize;
        let fill = self.params["fill"].as_u64().unwrap() as u8;
        (id, Arc::new(Block::new(vec![fill; size])))
    }

    /// A run of distinctly named blocks of the configured size.
    pub fn create_list(self, count: usize) -> Vec<(BlockId, Arc<Block>)> {
        let size = self.params["size"].as_u64().unwrap() as usize;
        let fill = self.params["fill"].as_u64().unwrap() as u8;
        let prefix = self.params["id"].as_str().unwrap().to_string();
        (0..count)
            .map(|i| {
                (
                    BlockId::from(format!("{prefix}-{i}")),
                    Arc::new(Block::new(vec![fill; size])),
                )
            })
            .collect()
    }
}

impl Default for BlockFactory {
    fn default() -> Self {
        Self::new()
    }
}
