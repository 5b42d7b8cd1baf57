/// Array construction and the homogeneity invariant.
///
/// Every array the interpreter produces (literals, ranges, `for` collections,
/// concatenation, stdlib results) goes through [`array::homogeneous`], which
/// rejects arrays whose elements report different runtime types.
pub mod array;

/// The runtime value type and its conversions.
pub mod core;
