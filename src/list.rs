use std::any::TypeId;
use std::marker::PhantomData;

/// The empty type list.
pub struct Nil;

/// A type-list cell: `H` followed by the list `T`.
///
/// Lists are usually spelled with the [`poly_list!`](crate::poly_list) macro
/// rather than written out by hand:
///
/// ```
/// use polyvariant::{poly_list, Cons, Nil, TypeList};
///
/// type Manual = Cons<u8, Cons<String, Nil>>;
/// type Short = poly_list![u8, String];
///
/// assert_eq!(Manual::LEN, Short::LEN);
/// ```
pub struct Cons<H, T>(PhantomData<fn() -> (H, T)>);

/// Builds a type list out of an ordered sequence of types.
#[macro_export]
macro_rules! poly_list {
    [] => { $crate::Nil };
    [$head:ty $(, $rest:ty)* $(,)?] => {
        $crate::Cons<$head, $crate::poly_list![$($rest),*]>
    };
}

/// An ordered, fixed list of types with cheap runtime identity queries.
///
/// The runtime queries all operate on [`TypeId`]s; the compile-time
/// counterparts are the [`IndexOf`] bound (position and membership) and the
/// [`AlternativeList`](crate::AlternativeList) bound (every member is an
/// alternative of the interface).
pub trait TypeList: 'static {
    /// Number of types in the list.
    const LEN: usize;

    /// Appends the `TypeId` of every list member, in list order.
    fn push_type_ids(out: &mut Vec<TypeId>);

    /// Whether `id` identifies one of the list members.
    fn contains(id: TypeId) -> bool;

    /// Zero-based position of the first member identified by `id`.
    fn position_of(id: TypeId) -> Option<i32>;

    /// Whether any type appears in the list more than once.
    ///
    /// A duplicated type already makes every construction over it ambiguous
    /// at compile time; this query covers lists whose duplicates are never
    /// constructed directly.
    fn has_duplicates() -> bool;

    /// The `TypeId` of every list member, in list order.
    fn type_ids() -> Vec<TypeId> {
        let mut ids = Vec::with_capacity(Self::LEN);
        Self::push_type_ids(&mut ids);
        ids
    }
}

impl TypeList for Nil {
    const LEN: usize = 0;

    fn push_type_ids(_out: &mut Vec<TypeId>) {}

    fn contains(_id: TypeId) -> bool {
        false
    }

    fn position_of(_id: TypeId) -> Option<i32> {
        None
    }

    fn has_duplicates() -> bool {
        false
    }
}

impl<H: 'static, T: TypeList> TypeList for Cons<H, T> {
    const LEN: usize = 1 + T::LEN;

    fn push_type_ids(out: &mut Vec<TypeId>) {
        out.push(TypeId::of::<H>());
        T::push_type_ids(out);
    }

    fn contains(id: TypeId) -> bool {
        id == TypeId::of::<H>() || T::contains(id)
    }

    fn position_of(id: TypeId) -> Option<i32> {
        if id == TypeId::of::<H>() {
            Some(0)
        } else {
            T::position_of(id).map(|pos| pos + 1)
        }
    }

    fn has_duplicates() -> bool {
        T::contains(TypeId::of::<H>()) || T::has_duplicates()
    }
}

/// Type-level index of the head position.
pub struct Here;

/// Type-level index one past `I`.
pub struct There<I>(PhantomData<fn() -> I>);

/// A type-level list position, convertible to its numeric value.
pub trait ListIndex: 'static {
    /// The position as a plain integer.
    const VALUE: i32;
}

impl ListIndex for Here {
    const VALUE: i32 = 0;
}

impl<I: ListIndex> ListIndex for There<I> {
    const VALUE: i32 = 1 + I::VALUE;
}

/// Compile-time proof that `T` occurs in the list at position `I`.
///
/// The index parameter is inferred at every use site. A type that is absent
/// from the list satisfies no impl, and a type that occurs twice admits two
/// indices, so either malformation fails the build where the bound is
/// demanded.
pub trait IndexOf<T, I>: TypeList {}

impl<T: 'static, Rest: TypeList> IndexOf<T, Here> for Cons<T, Rest> {}

impl<T: 'static, H: 'static, I: ListIndex, Rest: IndexOf<T, I>> IndexOf<T, There<I>>
    for Cons<H, Rest>
{
}

/// Zero-based position of `T` within the list `L`, resolved at compile time.
///
/// ```
/// use polyvariant::{index_of, poly_list};
///
/// type Primitives = poly_list![u8, u16, u32];
///
/// assert_eq!(index_of::<Primitives, u8, _>(), 0);
/// assert_eq!(index_of::<Primitives, u32, _>(), 2);
/// ```
pub fn index_of<L, T, I>() -> i32
where
    L: IndexOf<T, I>,
    I: ListIndex,
{
    I::VALUE
}

/// Whether `T` is a member of the list `L`.
///
/// Runtime counterpart of the [`IndexOf`] bound, for callers holding a type
/// that may or may not be listed.
pub fn is_member<L: TypeList, T: 'static>() -> bool {
    L::contains(TypeId::of::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Alpha;
    struct Beta;
    struct Gamma;

    type Three = poly_list![Alpha, Beta, Gamma];

    #[test]
    fn test_len_and_ids() {
        assert_eq!(<poly_list![]>::LEN, 0);
        assert_eq!(Three::LEN, 3);

        let ids = Three::type_ids();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], TypeId::of::<Alpha>());
        assert_eq!(ids[2], TypeId::of::<Gamma>());
    }

    #[test]
    fn test_compile_time_index() {
        assert_eq!(index_of::<Three, Alpha, _>(), 0);
        assert_eq!(index_of::<Three, Beta, _>(), 1);
        assert_eq!(index_of::<Three, Gamma, _>(), 2);
    }

    #[test]
    fn test_runtime_position_matches_index() {
        assert_eq!(Three::position_of(TypeId::of::<Beta>()), Some(1));
        assert_eq!(Three::position_of(TypeId::of::<String>()), None);
    }

    #[test]
    fn test_membership() {
        assert!(is_member::<Three, Beta>());
        assert!(!is_member::<Three, String>());
        assert!(!is_member::<poly_list![], Alpha>());
    }

    #[test]
    fn test_duplicate_detection() {
        assert!(!Three::has_duplicates());
        assert!(<poly_list![Alpha, Beta, Alpha]>::has_duplicates());
        assert!(<poly_list![Alpha, Alpha]>::has_duplicates());
        assert!(!<poly_list![]>::has_duplicates());
    }

    #[test]
    fn test_first_position_wins_on_duplicates() {
        // Runtime queries resolve duplicates to the first occurrence; the
        // compile-time `IndexOf` bound refuses them outright.
        type Dup = poly_list![Alpha, Beta, Alpha];
        assert_eq!(Dup::position_of(TypeId::of::<Alpha>()), Some(0));
    }
}
