use crate::engine::health::{BlockHint, ReplicationBucket};
use serde_json::{Value, json};
use std::collections::HashMap;

pub struct BlockHintFactory {
    params: HashMap<String, Value>,
}

impl BlockHintFactory {
    pub fn new() -> Self {
        let mut params = HashMap::new();
        params.insert("replication".into(), json!("Medium"));
        params.insert("noisy_request_rate".into(), json!(0.0));
        params.insert("high_entropy".into(), json!(false));
        params.insert("missing_regions".into(), json!(0));
        params.insert("last_seen".into(), json!(0));
        params.insert("size".into(), json!(256));
        Self { params }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn create(self) -> BlockHint {
        let replication = match self.params["replication"].as_str().unwrap() {
            "Low" => ReplicationBucket::Low,
            "High" => ReplicationBucket::High,
            _ => ReplicationBucket::Medium,
        };
        let mut hint = BlockHint::new(replication, self.params["size"].as_u64().unwrap());
        hint.noisy_request_rate = self.params["noisy_request_rate"].as_f64().unwrap();
        hint.high_entropy = self.params["high_entropy"].as_bool().unwrap();
        hint.missing_regions = self.params["missing_regions"].as_u64().unwrap() as u32;
        hint.last_seen = self.params["last_seen"].as_u64().unwrap();
        hint
    }
}

impl Default for BlockHintFactory {
    fn default() -> Self {
        Self::new()
    }
}
