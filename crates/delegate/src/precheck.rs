//! Local checks run before a remote round trip.
//!
//! Each check fails exactly as the service would for the same input, so
//! remote and local callers see the same error kind.

use common::EntityId;
use domain::{CheckError, ServiceError};

use crate::error::Result;

/// A blank id can never resolve.
pub(crate) fn require_id(entity: &str, id: &str) -> Result<()> {
    if EntityId::new(id).is_blank() {
        return Err(ServiceError::not_found(entity, "").into());
    }
    Ok(())
}

/// An update needs the id of an existing entity in its path.
pub(crate) fn require_update_id(entity: &str, id: &str) -> Result<()> {
    if EntityId::new(id).is_blank() {
        let check = CheckError::new("id", format!("{entity} id is missing"));
        return Err(ServiceError::from(check).into());
    }
    Ok(())
}
