/// Analysis over the destination tree.
pub mod duplicates;

pub use duplicates::{
    find_duplicates, hash_file, remove_duplicates, DuplicateFile, DuplicateGroup, DuplicateSet,
    RemovalSummary,
};
