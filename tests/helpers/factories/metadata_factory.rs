use crate::engine::types::{BlockMetadata, Origin};
use serde_json::{Value, json};
use std::collections::HashMap;

pub struct BlockMetadataFactory {
    params: HashMap<String, Value>,
}

impl BlockMetadataFactory {
    pub fn new() -> Self {
        let mut params = HashMap::new();
        params.insert("id".into(), json!("block-1"));
        params.insert("origin".into(), json!("Altruistic"));
        params.insert("size".into(), json!(256));
        params.insert("cached_at".into(), json!(1_000_000.0));
        params.insert("last_accessed".into(), json!(1_000_000.0));
        params.insert("access_count".into(), json!(1));
        Self { params }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn create(self) -> BlockMetadata {
        let origin = match self.params["origin"].as_str().unwrap() {
            "Personal" => Origin::Personal,
            _ => Origin::Altruistic,
        };
        let mut meta = BlockMetadata::new(
            self.params["id"].as_str().unwrap().into(),
            origin,
            self.params["size"].as_u64().unwrap(),
            self.params["cached_at"].as_f64().unwrap(),
        );
        meta.last_accessed = self.params["last_accessed"].as_f64().unwrap();
        meta.access_count = self.params["access_count"].as_u64().unwrap();
        meta
    }
}

impl Default for BlockMetadataFactory {
    fn default() -> Self {
        Self::new()
    }
}
