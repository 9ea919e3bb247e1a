pub use super::factories::{BlockFactory, BlockHintFactory, BlockMetadataFactory};

pub struct Factory;

impl Factory {
    pub fn block() -> BlockFactory {
        BlockFactory::new()
    }

    pub fn metadata() -> BlockMetadataFactory {
        BlockMetadataFactory::new()
    }

    pub fn hint() -> BlockHintFactory {
        BlockHintFactory::new()
    }
}
