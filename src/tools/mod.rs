//! The batch tools: one module per CLI surface.
//!
//! Operation ordering is a correctness requirement. A jurisdiction's
//! canonical node file must be merged and namespaced before its process,
//! subgraph, and subview files are rewritten, because those rewrites are
//! driven by the id map produced from the canonical file.

pub mod compose;
pub mod edges;
pub mod merge;
pub mod namespace;
pub mod validate;
