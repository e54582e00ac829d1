use polyvariant::{alternatives, poly_list, BoxedPoly, PolyBase, PolyError};

// Two interfaces over the same concrete types. A value stored under one
// can be re-homed under the other because every alternative implements
// both.
trait Event: PolyBase {
    fn kind(&self) -> &'static str;
}

trait Loggable: PolyBase {
    fn log_line(&self) -> String;
}

#[derive(Clone, Debug)]
struct Connected {
    peer: String,
}

#[derive(Clone, Debug)]
struct Disconnected {
    peer: String,
    reason: String,
}

impl Event for Connected {
    fn kind(&self) -> &'static str {
        "connected"
    }
}

impl Event for Disconnected {
    fn kind(&self) -> &'static str {
        "disconnected"
    }
}

impl Loggable for Connected {
    fn log_line(&self) -> String {
        format!("+ {}", self.peer)
    }
}

impl Loggable for Disconnected {
    fn log_line(&self) -> String {
        format!("- {} ({})", self.peer, self.reason)
    }
}

alternatives!(dyn Event: Connected, Disconnected);
alternatives!(dyn Loggable: Connected, Disconnected);

type EventBox = BoxedPoly<dyn Event, poly_list![Connected, Disconnected]>;
// The destination orders its list differently; conversion recomputes the tag.
type LogBox = BoxedPoly<dyn Loggable, poly_list![Disconnected, Connected]>;

fn main() -> Result<(), PolyError> {
    let events = vec![
        EventBox::with_value(Connected {
            peer: "10.0.0.7".to_string(),
        }),
        EventBox::with_value(Disconnected {
            peer: "10.0.0.9".to_string(),
            reason: "timeout".to_string(),
        }),
        EventBox::new(),
    ];

    for event in &events {
        let kind = event.get().map(|e| e.kind()).unwrap_or("<none>");

        // Same concrete value, different interface, destination-computed tag.
        let log: LogBox = event.convert();
        match log.get() {
            Some(entry) => println!(
                "event tag={} kind={} -> log tag={} line={}",
                event.index(),
                kind,
                log.index(),
                entry.log_line()
            ),
            None => println!("empty event converted to empty log entry"),
        }
    }

    // The copy made during conversion is independent of the source.
    let source = EventBox::with_value(Connected {
        peer: "10.0.0.1".to_string(),
    });
    let mut log: LogBox = source.convert();
    log.downcast_mut::<Connected>()?.peer.push_str(":8080");

    println!("source still: {}", source.downcast::<Connected>()?.peer);
    println!("log entry now: {}", log.downcast::<Connected>()?.log_line());

    Ok(())
}
