mod job_source;

#[rustfmt::skip]
pub use self::{
    job_source::JobSource,
};
