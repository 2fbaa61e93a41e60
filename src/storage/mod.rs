mod trie;

pub use trie::{Iter, StorageError, Trie, IDENTIFIER_ALPHABET};
