pub mod destination;
pub mod trip;
pub mod user;

/// Treats an absent key and an empty submission the same way: not provided.
/// Clearing a field to the empty string is deliberately unsupported.
pub(crate) fn submitted(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}
