//! Language-dependent static knowledge: comment syntax and semantic scopes.
//!
//! Two read-only tables live here. The comment classifier decides whether a
//! line is purely a comment in a given host language, with optional paragraph
//! state for block-comment continuations. The scope map translates a semantic
//! scope name (`function`, `class`, `block`, ...) into the set of AST node
//! kinds that scope may match for each supported language.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod comments;
mod scope_map;

pub use comments::{CommentStyle, comment_style, is_comment_only, update_block_state};
pub use scope_map::{ast_language_ids, node_kinds_for_scope};
