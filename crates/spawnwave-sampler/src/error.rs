use thiserror::Error;

use crate::region::RegionKind;

/// Spawn-region configuration mistakes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerError {
    #[error("spawn region is missing `{0}`")]
    MissingField(&'static str),

    #[error("spawn region field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("unknown spawn region kind '{0}'")]
    UnknownKind(String),

    #[error("unimplemented spawn region kind '{0}'")]
    Unimplemented(RegionKind),

    #[error("{0} colliders can only be sampled on planar regions")]
    UnsupportedCollider(&'static str),
}
