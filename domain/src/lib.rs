pub mod convert;
pub mod model;
pub mod service;

#[rustfmt::skip]
pub use self::{
    convert::{job_from_api, ConvertError},
    model::entity::*,
};
