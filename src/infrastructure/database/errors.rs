//! Mapping of `sea_orm::DbErr` into domain error kinds.

use sea_orm::{sqlx, DbErr, RuntimeErr, SqlErr};
use tracing::error;

use crate::domain::DomainError;

/// Driver failures that mean the store could not be reached, as opposed to
/// a statement the store rejected.
fn is_transport_failure(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// Classify a store failure and attach the operation name.
///
/// Connection, pool and mid-query transport failures become
/// `StoreUnavailable`, unique violations reported by the driver become
/// `Conflict`, everything else is `Internal`.
pub fn store_err(operation: &'static str, err: DbErr) -> DomainError {
    error!(operation, error = %err, "store round trip failed");

    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return DomainError::Conflict(format!("{operation}: {detail}"));
    }

    match err {
        DbErr::Conn(e) => DomainError::StoreUnavailable(format!("{operation}: {e}")),
        DbErr::ConnectionAcquire(e) => DomainError::StoreUnavailable(format!("{operation}: {e}")),
        DbErr::Query(RuntimeErr::SqlxError(e)) | DbErr::Exec(RuntimeErr::SqlxError(e))
            if is_transport_failure(&e) =>
        {
            DomainError::StoreUnavailable(format!("{operation}: {e}"))
        }
        DbErr::RecordNotFound(what) => DomainError::NotFound {
            entity: "record",
            field: operation,
            value: what,
        },
        other => DomainError::Internal(format!("{operation}: {other}")),
    }
}
