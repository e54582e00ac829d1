use polyvariant::{alternatives, poly_list, BoxedPoly, InlinePoly, PolyBase, PolyError};

// The common interface every alternative implements.
trait Shape: PolyBase {
    fn name(&self) -> &'static str;
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

impl Shape for Circle {
    fn name(&self) -> &'static str {
        "circle"
    }

    fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

impl Shape for Square {
    fn name(&self) -> &'static str {
        "square"
    }

    fn area(&self) -> f64 {
        self.side * self.side
    }
}

alternatives!(dyn Shape: Circle, Square);

type ShapeBox = BoxedPoly<dyn Shape, poly_list![Circle, Square]>;
type ShapeSlot = InlinePoly<dyn Shape, poly_list![Circle, Square]>;

fn main() -> Result<(), PolyError> {
    // Owning storage: one heap value plus a tag.
    let shape = ShapeBox::with_value(Circle { radius: 2.0 });
    println!(
        "boxed: tag={} name={} area={:.2}",
        shape.index(),
        shape.get().map(|s| s.name()).unwrap_or("<empty>"),
        shape.get().map(|s| s.area()).unwrap_or(0.0)
    );

    // Copying dispatches on the tag; `Circle` has no clone-through-interface.
    let copy = shape.clone();
    println!("copied circle radius: {}", copy.downcast::<Circle>()?.radius);

    // Checked downcasts report mismatches as errors.
    match shape.downcast::<Square>() {
        Ok(square) => println!("unexpectedly a square of side {}", square.side),
        Err(e) => println!("downcast to Square failed as expected: {}", e),
    }

    // The `_if` family reports them as absence instead.
    if shape.downcast_if::<Square>().is_none() {
        println!("downcast_if to Square returned nothing");
    }

    // Inline storage: same surface, no heap allocation.
    let mut slot = ShapeSlot::new();
    println!("fresh slot holds a value: {}", slot.has_value());

    slot = ShapeSlot::with_value(Square { side: 3.0 });
    if let Some(held) = slot.get() {
        println!("slot now holds a {} with area {}", held.name(), held.area());
    }

    // The unchecked path is an explicit, opt-out escape hatch.
    if slot.is_derived::<Square, _>() {
        let square = unsafe { slot.downcast_unchecked::<Square>() };
        println!("unchecked access to side: {}", square.side);
    }

    Ok(())
}
