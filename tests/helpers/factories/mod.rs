pub mod block_factory;
pub mod hint_factory;
pub mod metadata_factory;

pub use block_factory::BlockFactory;
pub use hint_factory::BlockHintFactory;
pub use metadata_factory::BlockMetadataFactory;

#[cfg(test)]
mod block_factory_test;
#[cfg(test)]
mod hint_factory_test;
#[cfg(test)]
mod metadata_factory_test;
