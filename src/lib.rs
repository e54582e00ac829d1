//! # polyvariant
//!
//! Closed-set polymorphic containers: hold "one of a known, fixed list of
//! concrete types, all implementing a common interface" without virtual
//! dispatch tables and without any of those types implementing a manual
//! polymorphic clone.
//!
//! Two storage strategies share one abstraction:
//!
//! - [`InlinePoly`] stores the active alternative directly in place — no
//!   heap allocation, value semantics, an explicit empty state.
//! - [`BoxedPoly`] owns a single heap-allocated alternative plus a compact
//!   numeric tag recording which alternative it is. The tag drives copy
//!   construction, O(1) type tests, and conversion into a *differently*
//!   parameterized container.
//!
//! ## Key Features
//!
//! - **Closed sets**: the alternative list is fixed where the container
//!   type is defined; malformed lists (duplicates, non-alternatives) fail
//!   the build, not the run.
//! - **Tag-driven copying**: the container, knowing its full list, copies
//!   any member by dispatching its tag over the compile-time-known types.
//! - **Checked and unchecked downcasts**: safety is opt-out — `downcast`
//!   signals mismatches, `downcast_if` reports them as `None`, and the
//!   `unsafe` `downcast_unchecked` family skips the check entirely.
//! - **Cross-hierarchy conversion**: a container's value can be re-homed
//!   under a second interface when its alternatives implement both.
//!
//! ## Usage
//!
//! ```rust
//! use polyvariant::{alternatives, poly_list, BoxedPoly, PolyBase, PolyError};
//!
//! // The common interface: any object-safe trait with `PolyBase` on top.
//! trait Shape: PolyBase {
//!     fn area(&self) -> f64;
//! }
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Circle { radius: f64 }
//! #[derive(Clone, Debug, PartialEq)]
//! struct Square { side: f64 }
//!
//! impl Shape for Circle {
//!     fn area(&self) -> f64 { std::f64::consts::PI * self.radius * self.radius }
//! }
//! impl Shape for Square {
//!     fn area(&self) -> f64 { self.side * self.side }
//! }
//!
//! // Register the "is-a" relation once.
//! alternatives!(dyn Shape: Circle, Square);
//!
//! type ShapeBox = BoxedPoly<dyn Shape, poly_list![Circle, Square]>;
//!
//! fn main() -> Result<(), PolyError> {
//!     let shape = ShapeBox::with_value(Circle { radius: 2.0 });
//!
//!     // The tag is the alternative's position in the list.
//!     assert_eq!(shape.index(), 0);
//!     assert!(shape.is_derived::<Circle, _>());
//!
//!     // Copying reconstructs the heap value through the tag; neither
//!     // `Circle` nor `Square` implements any clone-through-interface.
//!     let copy = shape.clone();
//!     assert_eq!(copy.downcast::<Circle>()?.radius, 2.0);
//!
//!     // Checked downcasts signal mismatches...
//!     match shape.downcast::<Square>() {
//!         Err(PolyError::TypeMismatch { .. }) => {}
//!         other => panic!("unexpected: {:?}", other),
//!     }
//!     // ...while the `_if` family reports them as absence.
//!     assert!(shape.downcast_if::<Square>().is_none());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Inline storage
//!
//! ```rust
//! use polyvariant::{alternatives, poly_list, InlinePoly, PolyBase};
//!
//! trait Command: PolyBase {
//!     fn run(&self) -> String;
//! }
//!
//! #[derive(Clone)]
//! struct Greet { name: String }
//! #[derive(Clone)]
//! struct Quit;
//!
//! impl Command for Greet {
//!     fn run(&self) -> String { format!("hello, {}", self.name) }
//! }
//! impl Command for Quit {
//!     fn run(&self) -> String { "bye".to_string() }
//! }
//!
//! alternatives!(dyn Command: Greet, Quit);
//!
//! // Stored on the stack, sized to the largest alternative.
//! type AnyCommand = InlinePoly<dyn Command, poly_list![Greet, Quit]>;
//!
//! let mut slot = AnyCommand::new();
//! assert!(!slot.has_value());
//!
//! slot = AnyCommand::with_value(Greet { name: "world".to_string() });
//! assert_eq!(slot.get().map(|c| c.run()), Some("hello, world".to_string()));
//! ```
//!
//! ## Build-time rejection
//!
//! A list member that is not an alternative of the interface fails to
//! compile wherever the container type is named:
//!
//! ```compile_fail
//! use polyvariant::{poly_list, BoxedPoly, PolyBase};
//!
//! trait Shape: PolyBase {}
//!
//! #[derive(Clone)]
//! struct NotAShape;
//!
//! // `NotAShape` implements no `Alternative<dyn Shape>`.
//! fn takes(_: BoxedPoly<dyn Shape, poly_list![NotAShape]>) {}
//! ```
//!
//! Duplicated alternatives make every construction over them ambiguous:
//!
//! ```compile_fail
//! use polyvariant::{alternatives, poly_list, BoxedPoly, PolyBase};
//!
//! trait Shape: PolyBase {}
//!
//! #[derive(Clone)]
//! struct Circle;
//! impl Shape for Circle {}
//! alternatives!(dyn Shape: Circle);
//!
//! let shape: BoxedPoly<dyn Shape, poly_list![Circle, Circle]> =
//!     BoxedPoly::with_value(Circle);
//! ```
//!
//! ## Concurrency
//!
//! Plain value/ownership semantics: no internal locking, no sharing.
//! Copies are always independent values. Concurrent access to one
//! container instance needs external synchronization.

mod base;
mod boxed;
mod dispatch;
mod error;
mod inline;
mod list;

pub use base::{Alternative, PolyBase};
pub use boxed::BoxedPoly;
pub use dispatch::{assert_well_formed, AlternativeList, ConvertList, ListRepr};
pub use error::PolyError;
pub use inline::InlinePoly;
pub use list::{index_of, is_member, Cons, Here, IndexOf, ListIndex, Nil, There, TypeList};

// Re-export std::any for convenience
pub use std::any::{Any, TypeId};

/// Tag value of a container holding no value.
pub const EMPTY_TAG: i32 = -1;
