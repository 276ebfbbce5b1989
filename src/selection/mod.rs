//! Selection and aggregation combinators (§4.7): free functions over
//! collections of futures rather than inherent `Future` methods, since
//! they consume ownership of (and fan out to) more than one input.

pub mod combine;
pub mod first;
pub mod parallel;
pub mod reduce;
pub mod retrying;

pub use combine::{combine, combine2, combine3, combine4};
pub use first::{
    first_resolved, first_resolved2, first_resolved3, first_resolved4, first_value, first_value2, first_value3,
    first_value4,
};
pub use parallel::in_parallel;
pub use reduce::reduce;
pub use retrying::retrying;
