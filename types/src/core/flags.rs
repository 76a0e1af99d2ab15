use bitflags::bitflags;

bitflags! {
    /// Static properties of a shape family.
    ///
    /// A family without `ALWAYS_FIXED_FOOTPRINT` may still produce shapes with
    /// a fixed footprint (an array of `U64`, for instance); the flag only says
    /// the answer never depends on the particular shape.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct FamilyFlags: u8 {
        const ALWAYS_FIXED_FOOTPRINT = 1;
        /// Many elements of a single type (array, vector, set, map).
        const MULTI_ELEMENT = 1 << 1;
        /// Several elements of different types (structs).
        const COMPOSITE = 1 << 2;
        /// Key-value storage.
        const ASSOCIATIVE = 1 << 3;
        /// The element count is part of the type.
        const FIXED_COUNT = 1 << 4;
    }
}

bitflags! {
    /// Numeric classification of a basic kind.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    pub struct BasicFlags: u8 {
        const NUMERIC = 1;
        const INTEGER = 1 << 1;
        const SIGNED = 1 << 2;
        const FLOAT = 1 << 3;
    }
}
