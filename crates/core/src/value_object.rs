//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are domain objects that are **immutable** and **compared by
/// value**. They represent concepts where identity doesn't matter - only the
/// values matter.
///
/// The trait requires:
/// - **Clone**: value objects should be cheap to copy
/// - **PartialEq**: value objects are compared by their attribute values
/// - **Debug**: value objects should be debuggable
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
