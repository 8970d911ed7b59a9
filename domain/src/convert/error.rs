/// Reasons a JSON payload cannot become a [`Job`](crate::Job).
///
/// `path` is the dotted location of the offending key, with array indices,
/// e.g. `container.volumes[0].dst_path`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("missing field `{path}`")]
    MissingField { path: String },

    #[error("field `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: String,
    },

    #[error("field `{path}`: unknown value {value:?}")]
    UnknownEnumValue { path: String, value: String },
}

impl ConvertError {
    /// Location of the offending field.
    pub fn path(&self) -> &str {
        match self {
            Self::MissingField { path }
            | Self::TypeMismatch { path, .. }
            | Self::UnknownEnumValue { path, .. } => path,
        }
    }
}
