use std::any::{type_name, Any};
use std::fmt;
use std::marker::PhantomData;
use std::mem;

use crate::base::{Alternative, PolyBase};
use crate::dispatch::{AlternativeList, ConvertList};
use crate::error::PolyError;
use crate::list::{IndexOf, ListIndex};
use crate::EMPTY_TAG;

/// An ownership-semantics container holding one heap-allocated alternative
/// plus a numeric tag recording its position in the type list.
///
/// Copying a `BoxedPoly` reconstructs a fresh heap value by dispatching on
/// the tag over the compile-time-known list — no alternative implements a
/// polymorphic clone. The tag is always consistent with the stored value:
/// `-1` iff empty, otherwise the list position of the value's concrete type.
///
/// # Examples
///
/// ```
/// use polyvariant::{alternatives, poly_list, BoxedPoly, PolyBase};
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
/// type ShapeBox = BoxedPoly<dyn Shape, poly_list![Circle, Square]>;
///
/// let shape = ShapeBox::with_value(Circle { radius: 2.0 });
/// assert_eq!(shape.index(), 0);
/// assert!(shape.is_derived::<Circle, _>());
///
/// let copy = shape.clone();
/// assert_eq!(copy.downcast::<Circle>().map(|c| c.radius), Ok(2.0));
/// ```
pub struct BoxedPoly<B: ?Sized + PolyBase, L: AlternativeList<B>> {
    storage: Option<Box<B>>,
    tag: i32,
    _list: PhantomData<fn() -> L>,
}

impl<B: ?Sized + PolyBase, L: AlternativeList<B>> BoxedPoly<B, L> {
    /// Creates an empty container (tag `-1`, no storage).
    pub fn new() -> Self {
        Self {
            storage: None,
            tag: EMPTY_TAG,
            _list: PhantomData,
        }
    }

    /// Creates a container owning a heap copy of `value`.
    ///
    /// `T` must be one of the listed alternatives; its list position
    /// becomes the container's tag.
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
        Self {
            storage: Some(value.into_base()),
            tag: I::VALUE,
            _list: PhantomData,
        }
    }

    /// The raw tag: the held alternative's list position, or `-1` if empty.
    ///
    /// Escape hatch for callers that need the discriminant itself.
    pub fn index(&self) -> i32 {
        self.tag
    }

    /// Whether a value is held.
    pub fn has_value(&self) -> bool {
        self.storage.is_some()
    }

    /// Whether the held value is exactly of the listed alternative `T`.
    ///
    /// Answered by comparing the tag against `T`'s compile-time list
    /// position. Always `false` on an empty container.
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
        self.storage.as_deref()
    }

    /// Mutably borrows the held value through the interface.
    pub fn get_mut(&mut self) -> Option<&mut B> {
        self.storage.as_deref_mut()
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
        let base = self.storage.as_deref().unwrap_unchecked();
        &*(base.as_any() as *const dyn Any as *const T)
    }

    /// Mutably borrows the held value as `T` without any runtime check.
    ///
    /// # Safety
    ///
    /// Same contract as [`downcast_unchecked`](Self::downcast_unchecked).
    pub unsafe fn downcast_unchecked_mut<T: Alternative<B>>(&mut self) -> &mut T {
        let base = self.storage.as_deref_mut().unwrap_unchecked();
        &mut *(base.as_any_mut() as *mut dyn Any as *mut T)
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

    /// Exchanges the contents of two containers.
    ///
    /// Storage and tag move together, so neither container is ever
    /// observable with a tag inconsistent with its storage.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Copies the held alternative into a container over a different
    /// interface and list.
    ///
    /// The source tag selects the concrete type to copy; the destination
    /// tag is computed from the destination list independently. An empty
    /// container converts to an empty container.
    ///
    /// Every listed alternative must implement `Alternative` for both
    /// interfaces. Whether each one is also *listed* in `L2` is the
    /// caller's contract: the destination list must cover every concrete
    /// type the source may carry.
    ///
    /// # Panics
    ///
    /// Panics if the held value's concrete type is absent from `L2`.
    pub fn convert<B2, L2>(&self) -> BoxedPoly<B2, L2>
    where
        B2: ?Sized + PolyBase,
        L2: AlternativeList<B2>,
        L: ConvertList<B, B2>,
    {
        let base = match self.get() {
            Some(base) => base,
            None => return BoxedPoly::new(),
        };
        let (copy, type_id) = L::convert_at(base, self.tag);
        let tag = match L2::position_of(type_id) {
            Some(tag) => tag,
            None => panic!(
                "alternative `{}` is not present in the destination type list",
                copy.type_name()
            ),
        };
        BoxedPoly {
            storage: Some(copy),
            tag,
            _list: PhantomData,
        }
    }
}

impl<B: ?Sized + PolyBase, L: AlternativeList<B>> Default for BoxedPoly<B, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ?Sized + PolyBase, L: AlternativeList<B>> Clone for BoxedPoly<B, L> {
    fn clone(&self) -> Self {
        match self.get() {
            None => Self::new(),
            Some(base) => Self {
                storage: Some(L::clone_boxed(base, self.tag)),
                tag: self.tag,
                _list: PhantomData,
            },
        }
    }
}

impl<B: ?Sized + PolyBase, L: AlternativeList<B>> fmt::Debug for BoxedPoly<B, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("BoxedPoly");
        dbg.field("tag", &self.tag);
        match self.get() {
            Some(base) => dbg.field("value", &base.type_name()),
            None => dbg.field("value", &"<empty>"),
        };
        dbg.finish()
    }
}
