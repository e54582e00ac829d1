use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::mem::MaybeUninit;

use crate::base::{Alternative, PolyBase};
use crate::dispatch::AlternativeList;
use crate::error::PolyError;
use crate::list::{IndexOf, ListIndex};
use crate::EMPTY_TAG;

/// A value-semantics container holding at most one of a fixed list of
/// alternatives directly in place, with no heap allocation.
///
/// `B` is the common interface (a trait-object type whose trait has
/// [`PolyBase`] as a supertrait) and `L` is the ordered, duplicate-free
/// list of alternatives, spelled with [`poly_list!`](crate::poly_list).
/// Storage is sized to the largest alternative plus one discriminant.
///
/// # Examples
///
/// ```
/// use polyvariant::{alternatives, poly_list, InlinePoly, PolyBase};
///
/// trait Shape: PolyBase {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Circle { radius: f64 }
/// #[derive(Clone, PartialEq, Debug)]
/// struct Square { side: f64 }
///
/// impl Shape for Circle {
///     fn area(&self) -> f64 { std::f64::consts::PI * self.radius * self.radius }
/// }
/// impl Shape for Square {
///     fn area(&self) -> f64 { self.side * self.side }
/// }
///
/// alternatives!(dyn Shape: Circle, Square);
///
/// type AnyShape = InlinePoly<dyn Shape, poly_list![Circle, Square]>;
///
/// let shape = AnyShape::with_value(Square { side: 3.0 });
/// assert!(shape.has_value());
/// assert_eq!(shape.get().map(|s| s.area()), Some(9.0));
/// assert!(shape.is_derived::<Square, _>());
/// assert_eq!(shape.downcast::<Square>().map(|s| s.side), Ok(3.0));
/// assert!(shape.downcast_if::<Circle>().is_none());
/// ```
///
/// A list with a duplicated alternative cannot be constructed over that
/// alternative — its position would be ambiguous:
///
/// ```compile_fail
/// use polyvariant::{alternatives, poly_list, InlinePoly, PolyBase};
///
/// trait Shape: PolyBase {}
/// #[derive(Clone)]
/// struct Circle;
/// impl Shape for Circle {}
/// alternatives!(dyn Shape: Circle);
///
/// let shape: InlinePoly<dyn Shape, poly_list![Circle, Circle]> =
///     InlinePoly::with_value(Circle);
/// ```
///
/// A list member that is not an alternative of the interface is rejected
/// wherever the container type is named:
///
/// ```compile_fail
/// use polyvariant::{poly_list, InlinePoly, PolyBase};
///
/// trait Shape: PolyBase {}
/// #[derive(Clone)]
/// struct NotAShape;
///
/// fn takes(_: InlinePoly<dyn Shape, poly_list![NotAShape]>) {}
/// ```
pub struct InlinePoly<B: ?Sized + PolyBase, L: AlternativeList<B>> {
    tag: i32,
    storage: MaybeUninit<L::Repr>,
    _base: PhantomData<fn() -> Box<B>>,
}

impl<B: ?Sized + PolyBase, L: AlternativeList<B>> InlinePoly<B, L> {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self {
            tag: EMPTY_TAG,
            storage: MaybeUninit::uninit(),
            _base: PhantomData,
        }
    }

    /// Creates a container holding `value` in place.
    ///
    /// `T` must be one of the listed alternatives; its list position
    /// becomes the container's discriminant.
    pub fn with_value<T, I>(value: T) -> Self
    where
        T: Alternative<B>,
        L: IndexOf<T, I>,
        I: ListIndex,
    {
        // The trait solver only refuses duplicate lists when `T` itself is
        // the duplicated entry; this covers construction over the others.
        debug_assert!(
            !L::has_duplicates(),
            "type list contains duplicate alternatives"
        );
        let mut storage = MaybeUninit::<L::Repr>::uninit();
        unsafe { storage.as_mut_ptr().cast::<T>().write(value) };
        Self {
            tag: I::VALUE,
            storage,
            _base: PhantomData,
        }
    }

    fn storage_ptr(&self) -> *const u8 {
        self.storage.as_ptr().cast()
    }

    fn storage_ptr_mut(&mut self) -> *mut u8 {
        self.storage.as_mut_ptr().cast()
    }

    /// Whether a value is held.
    pub fn has_value(&self) -> bool {
        self.tag != EMPTY_TAG
    }

    /// Whether the held value is exactly of the listed alternative `T`.
    ///
    /// Answered by comparing discriminants; no runtime type inspection.
    /// Always `false` on an empty container.
    pub fn is_derived<T, I>(&self) -> bool
    where
        T: Alternative<B>,
        L: IndexOf<T, I>,
        I: ListIndex,
    {
        self.tag == I::VALUE
    }

    /// Borrows the held value through the interface, or `None` if empty.
    pub fn get(&self) -> Option<&B> {
        if self.has_value() {
            Some(unsafe { L::base_at(self.storage_ptr(), self.tag) })
        } else {
            None
        }
    }

    /// Mutably borrows the held value through the interface.
    pub fn get_mut(&mut self) -> Option<&mut B> {
        if self.has_value() {
            Some(unsafe { L::base_at_mut(self.storage_ptr_mut(), self.tag) })
        } else {
            None
        }
    }

    /// Borrows the held value as `T`.
    ///
    /// `T` must be an alternative of `B` but need not appear in the list.
    ///
    /// # Errors
    ///
    /// - [`PolyError::Empty`] if no value is held
    /// - [`PolyError::TypeMismatch`] if the held value is not a `T`
    pub fn downcast<T: Alternative<B>>(&self) -> Result<&T, PolyError> {
        let base = self.get().ok_or(PolyError::Empty)?;
        base.as_any().downcast_ref::<T>().ok_or(PolyError::TypeMismatch {
            expected: type_name::<T>(),
            actual: base.type_name(),
        })
    }

    /// Mutably borrows the held value as `T`.
    ///
    /// # Errors
    ///
    /// - [`PolyError::Empty`] if no value is held
    /// - [`PolyError::TypeMismatch`] if the held value is not a `T`
    pub fn downcast_mut<T: Alternative<B>>(&mut self) -> Result<&mut T, PolyError> {
        let actual = match self.get() {
            Some(base) => base.type_name(),
            None => return Err(PolyError::Empty),
        };
        self.get_mut()
            .and_then(|base| base.as_any_mut().downcast_mut::<T>())
            .ok_or(PolyError::TypeMismatch {
                expected: type_name::<T>(),
                actual,
            })
    }

    /// Borrows the held value as `T`, or `None` on emptiness or mismatch.
    pub fn downcast_if<T: Alternative<B>>(&self) -> Option<&T> {
        self.get()?.as_any().downcast_ref::<T>()
    }

    /// Mutably borrows the held value as `T`, or `None` on emptiness or
    /// mismatch.
    pub fn downcast_if_mut<T: Alternative<B>>(&mut self) -> Option<&mut T> {
        self.get_mut()?.as_any_mut().downcast_mut::<T>()
    }

    /// Borrows the held value as `T` without any runtime check.
    ///
    /// # Safety
    ///
    /// The container must hold a value whose concrete type is exactly `T`,
    /// e.g. established with [`is_derived`](Self::is_derived). Anything
    /// else is undefined behavior.
    pub unsafe fn downcast_unchecked<T: Alternative<B>>(&self) -> &T {
        &*self.storage_ptr().cast::<T>()
    }

    /// Mutably borrows the held value as `T` without any runtime check.
    ///
    /// # Safety
    ///
    /// Same contract as [`downcast_unchecked`](Self::downcast_unchecked).
    pub unsafe fn downcast_unchecked_mut<T: Alternative<B>>(&mut self) -> &mut T {
        &mut *self.storage_ptr_mut().cast::<T>()
    }

    /// Returns an independent copy of the held value as `T`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`downcast`](Self::downcast).
    pub fn downcast_copy<T: Alternative<B>>(&self) -> Result<T, PolyError> {
        self.downcast::<T>().cloned()
    }

    /// Returns an independent copy of the held value as `T`, or `None` on
    /// emptiness or mismatch.
    pub fn downcast_if_copy<T: Alternative<B>>(&self) -> Option<T> {
        self.downcast_if::<T>().cloned()
    }

    /// Returns an independent copy of the held value as `T` without any
    /// runtime check.
    ///
    /// # Safety
    ///
    /// Same contract as [`downcast_unchecked`](Self::downcast_unchecked).
    pub unsafe fn downcast_copy_unchecked<T: Alternative<B>>(&self) -> T {
        self.downcast_unchecked::<T>().clone()
    }
}

impl<B: ?Sized + PolyBase, L: AlternativeList<B>> Default for InlinePoly<B, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ?Sized + PolyBase, L: AlternativeList<B>> Clone for InlinePoly<B, L> {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        if self.has_value() {
            unsafe { L::clone_at(self.storage_ptr(), copy.storage.as_mut_ptr().cast(), self.tag) };
            // Written after the storage so a panicking clone leaves `copy`
            // a consistent empty container.
            copy.tag = self.tag;
        }
        copy
    }
}

impl<B: ?Sized + PolyBase, L: AlternativeList<B>> Drop for InlinePoly<B, L> {
    fn drop(&mut self) {
        if self.has_value() {
            unsafe { L::drop_at(self.storage_ptr_mut(), self.tag) };
        }
    }
}

impl<B: ?Sized + PolyBase, L: AlternativeList<B>> fmt::Debug for InlinePoly<B, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("InlinePoly");
        match self.get() {
            Some(base) => dbg.field("value", &base.type_name()),
            None => dbg.field("value", &"<empty>"),
        };
        dbg.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::{alternatives, poly_list};

    trait Shape: PolyBase {
        fn area(&self) -> f64;
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Circle {
        radius: f64,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Square {
        side: f64,
    }

    // An alternative of `dyn Shape` that no container in these tests lists.
    #[derive(Clone, Debug, PartialEq)]
    struct Triangle {
        base: f64,
        height: f64,
    }

    impl Shape for Circle {
        fn area(&self) -> f64 {
            std::f64::consts::PI * self.radius * self.radius
        }
    }

    impl Shape for Square {
        fn area(&self) -> f64 {
            self.side * self.side
        }
    }

    impl Shape for Triangle {
        fn area(&self) -> f64 {
            self.base * self.height / 2.0
        }
    }

    alternatives!(dyn Shape: Circle, Square, Triangle);

    type AnyShape = InlinePoly<dyn Shape, poly_list![Circle, Square]>;

    #[test]
    fn test_empty_container() {
        let shape = AnyShape::new();

        assert!(!shape.has_value());
        assert!(shape.get().is_none());
        assert!(!shape.is_derived::<Circle, _>());
        assert_eq!(shape.downcast::<Circle>(), Err(PolyError::Empty));
        assert!(shape.downcast_if::<Circle>().is_none());
        assert_eq!(shape.downcast_copy::<Circle>(), Err(PolyError::Empty));
    }

    #[test]
    fn test_construction_and_access() {
        let shape = AnyShape::with_value(Circle { radius: 2.0 });

        assert!(shape.has_value());
        assert!(shape.is_derived::<Circle, _>());
        assert!(!shape.is_derived::<Square, _>());

        let base = shape.get().unwrap();
        assert!((base.area() - std::f64::consts::PI * 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_checked_downcast_signals_mismatch() {
        let shape = AnyShape::with_value(Circle { radius: 2.0 });

        assert_eq!(shape.downcast::<Circle>().unwrap().radius, 2.0);
        match shape.downcast::<Square>() {
            Err(PolyError::TypeMismatch { expected, actual }) => {
                assert!(expected.ends_with("Square"));
                assert!(actual.ends_with("Circle"));
            }
            other => panic!("expected a type mismatch, got {:?}", other),
        }

        // `Triangle` is an alternative of the interface without being
        // listed; the checked downcast still answers coherently.
        assert!(matches!(
            shape.downcast::<Triangle>(),
            Err(PolyError::TypeMismatch { .. })
        ));
        assert!(shape.downcast_if::<Square>().is_none());
    }

    #[test]
    fn test_downcast_variants_agree_on_match() {
        let shape = AnyShape::with_value(Square { side: 3.0 });
        assert!(shape.is_derived::<Square, _>());

        let checked = shape.downcast::<Square>().unwrap() as *const Square;
        let optional = shape.downcast_if::<Square>().unwrap() as *const Square;
        let unchecked = unsafe { shape.downcast_unchecked::<Square>() } as *const Square;

        assert_eq!(checked, optional);
        assert_eq!(checked, unchecked);
    }

    #[test]
    fn test_mutation_through_downcast_mut() {
        let mut shape = AnyShape::with_value(Square { side: 3.0 });

        shape.downcast_mut::<Square>().unwrap().side = 5.0;
        assert_eq!(shape.downcast::<Square>().unwrap().side, 5.0);

        assert!(matches!(
            shape.downcast_mut::<Circle>(),
            Err(PolyError::TypeMismatch { .. })
        ));
        assert!(shape.downcast_if_mut::<Circle>().is_none());
        // The failed attempts changed nothing.
        assert_eq!(shape.downcast::<Square>().unwrap().side, 5.0);
    }

    #[test]
    fn test_copy_returning_variants() {
        let shape = AnyShape::with_value(Circle { radius: 2.0 });

        let copy = shape.downcast_copy::<Circle>().unwrap();
        assert_eq!(copy, Circle { radius: 2.0 });

        assert_eq!(
            shape.downcast_if_copy::<Circle>(),
            Some(Circle { radius: 2.0 })
        );
        assert_eq!(shape.downcast_if_copy::<Square>(), None);

        let unchecked = unsafe { shape.downcast_copy_unchecked::<Circle>() };
        assert_eq!(unchecked, copy);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original = AnyShape::with_value(Circle { radius: 2.0 });
        let copy = original.clone();

        original.downcast_mut::<Circle>().unwrap().radius = 10.0;

        assert_eq!(copy.downcast::<Circle>().unwrap().radius, 2.0);
        assert_eq!(original.downcast::<Circle>().unwrap().radius, 10.0);
    }

    #[test]
    fn test_clone_of_empty_is_empty() {
        let empty = AnyShape::new();
        assert!(!empty.clone().has_value());
    }

    trait Token: PolyBase {}

    #[derive(Clone)]
    struct DropTally {
        drops: Rc<Cell<usize>>,
    }

    impl Token for DropTally {}

    impl Drop for DropTally {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    alternatives!(dyn Token: DropTally);

    #[test]
    fn test_held_value_dropped_in_place() {
        let drops = Rc::new(Cell::new(0));
        {
            let _held: InlinePoly<dyn Token, poly_list![DropTally]> =
                InlinePoly::with_value(DropTally {
                    drops: Rc::clone(&drops),
                });
            assert_eq!(drops.get(), 0);
        }
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_empty_container_drops_nothing() {
        {
            let _empty: InlinePoly<dyn Token, poly_list![DropTally]> = InlinePoly::new();
        }
        // Nothing to observe; reaching here without UB is the assertion.
    }

    #[test]
    fn test_debug_reports_held_type() {
        let shape = AnyShape::with_value(Circle { radius: 1.0 });
        let rendered = format!("{:?}", shape);
        assert!(rendered.contains("Circle"));

        let empty = format!("{:?}", AnyShape::new());
        assert!(empty.contains("<empty>"));
    }
}
