use crate::test_helpers::factories::BlockFactory;

#[test]
fn creates_block_with_requested_size() {
    let (id, block) = BlockFactory::new().with("id", "abc").with("size", 1024).create();
    assert_eq!(id.as_str(), "abc");
    assert_eq!(block.size(), 1024);
}

#[test]
fn create_list_names_blocks_distinctly() {
    let blocks = BlockFactory::new().with("id", "chunk").create_list(3);
    assert_eq!(blocks.len(), 3);
    assert_eq!(blocks[0].0.as_str(), "chunk-0");
    assert_eq!(blocks[2].0.as_str(), "chunk-2");
}
