//! Materialized-path encoding for reply trees.
//!
//! Every post row carries `path`: the ids of its ancestors, root first,
//! terminated by the post's own id. Postgres compares `BIGINT[]` values
//! element by element with a shorter array sorting before its extensions,
//! so `ORDER BY path` walks the tree depth-first and keeps each subtree
//! contiguous. Paths are fixed at insert time and never recomputed.

/// Parent id meaning "no parent"; a root post starts its own branch.
pub const NO_PARENT: i64 = 0;

/// Path for a new post: the parent's chain with the new id appended, or a
/// fresh single-element chain for a root post.
///
/// The id must be the post's final assigned identifier; paths embed
/// concrete ids, never provisional ones.
pub fn child_path(parent_path: Option<&[i64]>, id: i64) -> Vec<i64> {
    match parent_path {
        Some(parent) => {
            let mut path = Vec::with_capacity(parent.len() + 1);
            path.extend_from_slice(parent);
            path.push(id);
            path
        }
        None => vec![id],
    }
}

/// Traversal mode for reading a thread's posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostSort {
    /// Chronological by id; no tree structure involved.
    #[default]
    Flat,
    /// Depth-first by path; a reply appears right after its ancestors.
    Tree,
    /// Paginate whole root subtrees; `limit` counts roots, not posts.
    ParentTree,
}

impl PostSort {
    /// Maps the `sort` query parameter; anything unrecognized is flat.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("tree") => PostSort::Tree,
            Some("parent_tree") => PostSort::ParentTree,
            _ => PostSort::Flat,
        }
    }
}
