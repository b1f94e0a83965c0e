//! Shared Diesel error classification for the repositories.
//!
//! Every repository maps failures into its own port error. The raw Diesel
//! message can contain SQL fragments, so only the constraint name or a fixed
//! phrase survives into the port error.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Sanitised category of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The connection dropped or could not be used.
    Connection(String),
    /// A unique constraint rejected the write.
    Duplicate(String),
    /// A CHECK or NOT NULL constraint rejected the write.
    Rejected(String),
    /// A foreign key rejected the write.
    MissingReference(String),
    /// Anything else.
    Query(String),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

fn constraint_label(info: &dyn diesel::result::DatabaseErrorInformation, fallback: &str) -> String {
    info.constraint_name()
        .map_or_else(|| fallback.to_owned(), |name| format!("{fallback} ({name})"))
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: DieselError) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => StoreFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::ClosedConnection => {
                StoreFailure::Connection("database connection error".to_owned())
            }
            DatabaseErrorKind::UniqueViolation => {
                StoreFailure::Duplicate(constraint_label(info.as_ref(), "unique constraint"))
            }
            DatabaseErrorKind::CheckViolation => {
                StoreFailure::Rejected(constraint_label(info.as_ref(), "check constraint"))
            }
            DatabaseErrorKind::NotNullViolation => {
                StoreFailure::Rejected(constraint_label(info.as_ref(), "required value missing"))
            }
            DatabaseErrorKind::ForeignKeyViolation => StoreFailure::MissingReference(
                constraint_label(info.as_ref(), "foreign key constraint"),
            ),
            _ => StoreFailure::Query("database error".to_owned()),
        },
        _ => StoreFailure::Query("database error".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct FakeInfo {
        constraint: Option<&'static str>,
    }

    impl diesel::result::DatabaseErrorInformation for FakeInfo {
        fn message(&self) -> &str {
            "new row violates constraint"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(FakeInfo { constraint }))
    }

    #[rstest]
    #[case(
        DatabaseErrorKind::UniqueViolation,
        StoreFailure::Duplicate("unique constraint (products_sku_key)".to_owned())
    )]
    #[case(
        DatabaseErrorKind::CheckViolation,
        StoreFailure::Rejected("check constraint (products_quantity_check)".to_owned())
    )]
    #[case(
        DatabaseErrorKind::ClosedConnection,
        StoreFailure::Connection("database connection error".to_owned())
    )]
    fn database_errors_are_classified(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: StoreFailure,
    ) {
        let constraint = match kind {
            DatabaseErrorKind::UniqueViolation => Some("products_sku_key"),
            DatabaseErrorKind::CheckViolation => Some("products_quantity_check"),
            _ => None,
        };
        assert_eq!(classify_diesel_error(database_error(kind, constraint)), expected);
    }

    #[rstest]
    fn foreign_keys_without_names_use_fallback() {
        let failure =
            classify_diesel_error(database_error(DatabaseErrorKind::ForeignKeyViolation, None));
        assert_eq!(
            failure,
            StoreFailure::MissingReference("foreign key constraint".to_owned())
        );
    }

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            classify_diesel_error(DieselError::NotFound),
            StoreFailure::Query("record not found".to_owned())
        );
    }

    #[rstest]
    fn pool_messages_pass_through() {
        assert_eq!(
            pool_error_message(PoolError::checkout("timed out")),
            "timed out"
        );
    }
}
