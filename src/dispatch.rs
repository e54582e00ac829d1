use std::any::TypeId;
use std::mem::ManuallyDrop;

use crate::base::{Alternative, PolyBase};
use crate::list::{Cons, Nil, TypeList};

/// Overlapping storage for every alternative in a list.
///
/// `#[repr(C)]` guarantees both fields live at offset zero, so a value of
/// any listed type can be written to and read from the start of the chain.
#[repr(C)]
pub union ListRepr<H, T> {
    _head: ManuallyDrop<H>,
    _tail: ManuallyDrop<T>,
}

fn invalid_tag(tag: i32) -> ! {
    panic!("alternative tag {tag} does not refer to a listed type")
}

fn tag_type_disagreement(actual: &'static str) -> ! {
    panic!("stored `{actual}` does not match the container's alternative tag")
}

/// A type list whose every member is an [`Alternative`] of the interface `B`.
///
/// This is the all-derive-from check of the container contract: naming a
/// container over a list with a non-alternative member fails the build
/// because no impl of this trait exists for it.
///
/// The methods dispatch on a runtime tag by scanning the list — position 0
/// is the head, anything else recurses into the tail with `tag - 1`. A scan
/// that exhausts the list panics; tags are produced by the containers
/// themselves, so an out-of-range tag is always a caller contract breach
/// (see [`BoxedPoly::convert`](crate::BoxedPoly::convert)).
///
/// # Safety
///
/// The raw-pointer methods require `ptr` to address a live value of the
/// list member at position `tag`, laid out at offset zero as [`ListRepr`]
/// guarantees.
pub trait AlternativeList<B: ?Sized + PolyBase>: TypeList {
    /// Inline storage sized and aligned for the largest alternative.
    type Repr;

    /// Borrows the value at `ptr` through the interface.
    unsafe fn base_at<'a>(ptr: *const u8, tag: i32) -> &'a B;

    /// Mutably borrows the value at `ptr` through the interface.
    unsafe fn base_at_mut<'a>(ptr: *mut u8, tag: i32) -> &'a mut B;

    /// Clones the value at `src` into the uninitialized storage at `dst`.
    unsafe fn clone_at(src: *const u8, dst: *mut u8, tag: i32);

    /// Drops the value at `ptr` in place.
    unsafe fn drop_at(ptr: *mut u8, tag: i32);

    /// Copy-constructs the alternative selected by `tag` onto the heap.
    ///
    /// This is how the owning container clones itself without any virtual
    /// clone method: the list, known in full at the container's definition,
    /// recovers the concrete type from the tag and copies it.
    fn clone_boxed(base: &B, tag: i32) -> Box<B>;
}

impl<B: ?Sized + PolyBase> AlternativeList<B> for Nil {
    type Repr = ();

    unsafe fn base_at<'a>(_ptr: *const u8, tag: i32) -> &'a B {
        invalid_tag(tag)
    }

    unsafe fn base_at_mut<'a>(_ptr: *mut u8, tag: i32) -> &'a mut B {
        invalid_tag(tag)
    }

    unsafe fn clone_at(_src: *const u8, _dst: *mut u8, tag: i32) {
        invalid_tag(tag)
    }

    unsafe fn drop_at(_ptr: *mut u8, tag: i32) {
        invalid_tag(tag)
    }

    fn clone_boxed(_base: &B, tag: i32) -> Box<B> {
        invalid_tag(tag)
    }
}

impl<B, H, T> AlternativeList<B> for Cons<H, T>
where
    B: ?Sized + PolyBase,
    H: Alternative<B>,
    T: AlternativeList<B>,
{
    type Repr = ListRepr<H, T::Repr>;

    unsafe fn base_at<'a>(ptr: *const u8, tag: i32) -> &'a B {
        if tag == 0 {
            let value: &'a H = &*ptr.cast::<H>();
            value.as_base()
        } else {
            T::base_at(ptr, tag - 1)
        }
    }

    unsafe fn base_at_mut<'a>(ptr: *mut u8, tag: i32) -> &'a mut B {
        if tag == 0 {
            let value: &'a mut H = &mut *ptr.cast::<H>();
            value.as_base_mut()
        } else {
            T::base_at_mut(ptr, tag - 1)
        }
    }

    unsafe fn clone_at(src: *const u8, dst: *mut u8, tag: i32) {
        if tag == 0 {
            dst.cast::<H>().write((*src.cast::<H>()).clone());
        } else {
            T::clone_at(src, dst, tag - 1);
        }
    }

    unsafe fn drop_at(ptr: *mut u8, tag: i32) {
        if tag == 0 {
            ptr.cast::<H>().drop_in_place();
        } else {
            T::drop_at(ptr, tag - 1);
        }
    }

    fn clone_boxed(base: &B, tag: i32) -> Box<B> {
        if tag == 0 {
            match base.as_any().downcast_ref::<H>() {
                Some(value) => value.clone().into_base(),
                None => tag_type_disagreement(base.type_name()),
            }
        } else {
            T::clone_boxed(base, tag - 1)
        }
    }
}

/// A type list convertible from interface `B` to interface `B2`.
///
/// Every member must be an alternative of both interfaces; that pairing is
/// the Rust spelling of "the two bases are related by is-a". Membership of
/// each type in the *destination* container's list is deliberately not
/// required here — choosing a destination list that covers every type the
/// source may carry is the caller's contract, and a gap panics during
/// conversion rather than being papered over as an empty result.
pub trait ConvertList<B: ?Sized + PolyBase, B2: ?Sized + PolyBase>: TypeList {
    /// Copies the alternative selected by `tag` out of `base`, re-homed
    /// under `B2`, and reports its concrete `TypeId` so the destination
    /// container can compute its own tag.
    fn convert_at(base: &B, tag: i32) -> (Box<B2>, TypeId);
}

impl<B: ?Sized + PolyBase, B2: ?Sized + PolyBase> ConvertList<B, B2> for Nil {
    fn convert_at(_base: &B, tag: i32) -> (Box<B2>, TypeId) {
        invalid_tag(tag)
    }
}

impl<B, B2, H, T> ConvertList<B, B2> for Cons<H, T>
where
    B: ?Sized + PolyBase,
    B2: ?Sized + PolyBase,
    H: Alternative<B> + Alternative<B2>,
    T: ConvertList<B, B2>,
{
    fn convert_at(base: &B, tag: i32) -> (Box<B2>, TypeId) {
        if tag == 0 {
            let value = match base.as_any().downcast_ref::<H>() {
                Some(value) => value,
                None => tag_type_disagreement(base.type_name()),
            };
            let copy = <H as Alternative<B2>>::into_base(value.clone());
            (copy, TypeId::of::<H>())
        } else {
            T::convert_at(base, tag - 1)
        }
    }
}

/// Compile-time assertion that a container parameterization is well formed.
///
/// The call compiles only if every member of `L` is an alternative of `B`;
/// in debug builds it additionally asserts that `L` is duplicate-free,
/// covering lists whose duplicated member is never constructed directly.
pub fn assert_well_formed<B, L>()
where
    B: ?Sized + PolyBase,
    L: AlternativeList<B>,
{
    debug_assert!(
        !L::has_duplicates(),
        "type list contains duplicate alternatives"
    );
}
