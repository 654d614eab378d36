pub mod cancellation;
pub mod tagger;

pub use cancellation::{Cancellable, CancellationToken, Checkpoint};
pub use tagger::{ITagger, TaggedSpan};
