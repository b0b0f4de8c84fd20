//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new instance (e.g. a revised scout message replaces the old one on
/// the aggregate rather than being edited in place).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct Subject(String);
///
/// impl ValueObject for Subject {}
///
/// assert_eq!(Subject("Hello".into()), Subject("Hello".into()));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
