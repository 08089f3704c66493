mod arena;
mod builder;
mod mutation;
mod navigator;
mod node;
pub mod rollup;
mod update;

pub use arena::FilesTree;
pub use builder::{TreeBuilder, build_tree, build_tree_cancellable};
pub use navigator::{Entry, Navigator, display_order};
pub use node::{DirectoryData, FileData, NodeId, NodeKind, PriorityState, TreeNode, WantedState};
pub use rollup::Rollup;
pub use update::UpdateOutcome;
