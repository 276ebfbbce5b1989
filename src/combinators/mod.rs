//! The combinator algebra (§4.6). Each submodule adds inherent methods to
//! [`crate::future::Future`]; there is no separate combinator type per
//! operation; the teacher's per-combinator struct hierarchy (`Map`,
//! `AndThen`, `Select`, ...) is replaced by registering a closure on the
//! parent (§9, "Class hierarchy for `Mapped`/`Bind`/...").

pub mod apply;
pub mod delay;
pub mod enqueuing;
pub mod flat_map;
pub mod flatten;
pub mod map;
pub mod split;
pub mod validate;

pub use apply::Transform;
