use std::any::{type_name, Any};

/// Capability floor for every common interface trait used with the
/// containers in this crate.
///
/// Declare your interface trait with `PolyBase` as a supertrait and the
/// containers can reach the held value both through the interface and
/// through [`Any`] for checked downcasting:
///
/// ```
/// use polyvariant::PolyBase;
///
/// trait Shape: PolyBase {
///     fn area(&self) -> f64;
/// }
/// ```
///
/// `PolyBase` is blanket-implemented for every `'static` type, so concrete
/// alternatives need no extra code.
pub trait PolyBase: Any {
    /// The held value as [`&dyn Any`](Any), for checked downcasting.
    fn as_any(&self) -> &dyn Any;

    /// The held value as [`&mut dyn Any`](Any).
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Name of the concrete type, for diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<T: Any> PolyBase for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

/// The "is-a" relation between a concrete type and a common interface `B`.
///
/// A type may be stored in a container over `B` only if it implements
/// `Alternative<B>`. The supertraits carry the two obligations the
/// containers rely on: [`Any`] for identity checks and [`Clone`] because
/// the owning container reconstructs values by copy rather than through a
/// virtual clone method on the alternatives.
///
/// Implementations are mechanical; the [`alternatives!`](crate::alternatives)
/// macro writes them for you. A type may be an alternative of several
/// interfaces at once, which is what cross-container conversion builds on.
pub trait Alternative<B: ?Sized + PolyBase>: Any + Clone {
    /// Borrows `self` through the interface.
    fn as_base(&self) -> &B;

    /// Mutably borrows `self` through the interface.
    fn as_base_mut(&mut self) -> &mut B;

    /// Moves `self` onto the heap behind the interface.
    fn into_base(self) -> Box<B>;
}

/// Declares concrete types as alternatives of a common interface trait.
///
/// ```
/// use polyvariant::{alternatives, PolyBase};
///
/// trait Shape: PolyBase {
///     fn area(&self) -> f64;
/// }
///
/// #[derive(Clone)]
/// struct Circle { radius: f64 }
/// #[derive(Clone)]
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
/// ```
#[macro_export]
macro_rules! alternatives {
    (dyn $base:path : $($alt:ty),+ $(,)?) => {
        $(
            impl $crate::Alternative<dyn $base> for $alt {
                fn as_base(&self) -> &dyn $base {
                    self
                }

                fn as_base_mut(&mut self) -> &mut dyn $base {
                    self
                }

                fn into_base(self) -> ::std::boxed::Box<dyn $base> {
                    ::std::boxed::Box::new(self)
                }
            }
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Animal: PolyBase {
        fn sound(&self) -> &'static str;
    }

    #[derive(Clone)]
    struct Dog;

    impl Animal for Dog {
        fn sound(&self) -> &'static str {
            "Woof!"
        }
    }

    alternatives!(dyn Animal: Dog);

    #[test]
    fn test_base_coercions() {
        let mut dog = Dog;

        assert_eq!(dog.as_base().sound(), "Woof!");
        assert_eq!(dog.as_base_mut().sound(), "Woof!");

        let boxed: Box<dyn Animal> = dog.clone().into_base();
        assert_eq!(boxed.sound(), "Woof!");
    }

    #[test]
    fn test_any_identity_through_base() {
        let dog = Dog;
        let base: &dyn Animal = dog.as_base();

        assert!(base.as_any().downcast_ref::<Dog>().is_some());
        assert!(base.as_any().downcast_ref::<String>().is_none());
        assert!(base.type_name().ends_with("Dog"));
    }
}
