//! One module per operator: the operator value plus its observer wrapper.

pub mod as_future;
pub mod concat;
pub mod do_on_completed;
pub mod do_work;
pub mod drop;
pub mod drop_while;
pub mod filter;
pub mod flat_map;
pub mod fold;
pub mod map;
pub mod safe;
pub mod take;
pub mod take_while;
pub mod zip;

pub use as_future::AsFuture;
pub use concat::ConcatOp;
pub use do_on_completed::DoOnCompletedOp;
pub use do_work::DoWorkOp;
pub use drop::DropOp;
pub use drop_while::DropWhileOp;
pub use filter::FilterOp;
pub use flat_map::FlatMapOp;
pub use fold::FoldOp;
pub use map::MapOp;
pub use safe::SafeOp;
pub use take::TakeOp;
pub use take_while::TakeWhileOp;
pub use zip::ZipOp;
