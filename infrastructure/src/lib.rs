pub mod codec;
pub mod sync;
