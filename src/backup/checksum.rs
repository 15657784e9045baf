//! Integrity checksum over a set of files
//!
//! The digest is SHA-256 over the concatenated file contents, taken in
//! ascending order of relative path. Input order does not matter.

use sha2::{Digest, Sha256};

/// A file's relative path and contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub path: String,
    pub content: Vec<u8>,
}

impl FileContent {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Hex SHA-256 of the contents of `files` in canonical path order
pub fn compute_checksum(files: &[FileContent]) -> String {
    let mut ordered: Vec<&FileContent> = files.iter().collect();
    ordered.sort_by(|a, b| a.path.cmp(&b.path));

    let mut hasher = Sha256::new();
    for file in ordered {
        hasher.update(&file.content);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_set_has_digest() {
        assert_eq!(
            compute_checksum(&[]),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_content_change_changes_digest() {
        let before = compute_checksum(&[FileContent::new("a.ts", "one")]);
        let after = compute_checksum(&[FileContent::new("a.ts", "two")]);
        assert_ne!(before, after);
    }

    #[test]
    fn test_order_follows_path_not_input() {
        let a = FileContent::new("a.ts", "first");
        let b = FileContent::new("b.ts", "second");

        let forward = compute_checksum(&[a.clone(), b.clone()]);
        let backward = compute_checksum(&[b, a]);
        assert_eq!(forward, backward);

        let mut hasher = Sha256::new();
        hasher.update(b"firstsecond");
        assert_eq!(forward, format!("{:x}", hasher.finalize()));
    }

    proptest! {
        #[test]
        fn checksum_is_deterministic_and_order_independent(
            files in prop::collection::btree_map("[a-z]{1,8}(/[a-z]{1,8}){0,2}", prop::collection::vec(any::<u8>(), 0..64), 0..8),
            seed in any::<u64>(),
        ) {
            let files: Vec<FileContent> = files
                .into_iter()
                .map(|(path, content)| FileContent::new(path, content))
                .collect();

            let mut shuffled = files.clone();
            let len = shuffled.len();
            if len > 1 {
                shuffled.rotate_left((seed as usize) % len);
                shuffled.reverse();
            }

            let digest = compute_checksum(&files);
            prop_assert_eq!(&digest, &compute_checksum(&files));
            prop_assert_eq!(&digest, &compute_checksum(&shuffled));
            prop_assert_eq!(digest.len(), 64);
        }
    }
}
