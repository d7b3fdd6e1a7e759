//! The `event_set!` macro: one table per subsystem, everything else derived.

/// Declare a subsystem's events and generate its bridge surface.
///
/// ```
/// use std::sync::Arc;
/// use mechbridge_core::{EventBridge, EventSet, HostContext, SimDispatcher};
///
/// mechbridge_core::event_set! {
///     pub struct Beeper as "beeper" {
///         event: BeeperEvent,
///         kind: BeeperKind,
///         listener: BeeperEventListener,
///         callbacks: BeeperCallbacks,
///     }
///     Beep { id: u16, volume: f32 } => on_beep / on_beep;
///     Silence {} => on_silence / on_silence;
/// }
///
/// let dispatcher = Arc::new(SimDispatcher::<Beeper>::new());
/// let bridge: EventBridge<Beeper, _> = EventBridge::new(Arc::clone(&dispatcher), HostContext::exclusive());
/// bridge.on_beep(|id, volume| println!("beep {id} at {volume}")).unwrap();
///
/// assert_eq!(Beeper::kinds(), &[BeeperKind::Beep, BeeperKind::Silence]);
/// dispatcher.fire(&BeeperEvent::Beep { id: 1, volume: 0.5 });
/// assert_eq!(bridge.stats().delivered, 1);
/// ```
///
/// For each `Variant { fields } => method / setter;` row this generates:
///
/// * an envelope variant `Event::Variant { fields }` and a kind `Kind::Variant`,
/// * a listener trait method `method(&self, fields)` with an empty default body,
/// * `setter(callback)` on the callbacks trait, implemented for every
///   `EventBridge` of this set, replacing the kind's callback.
#[macro_export]
macro_rules! event_set {
    (
        $(#[$set_meta:meta])*
        $vis:vis struct $set:ident as $name:literal {
            event: $event:ident,
            kind: $kind:ident,
            listener: $listener:ident,
            callbacks: $callbacks:ident $(,)?
        }
        $(
            $(#[$variant_meta:meta])*
            $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $method:ident / $setter:ident;
        )+
    ) => {
        $(#[$set_meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $set;

        #[derive(Debug, Clone, PartialEq)]
        $vis enum $event {
            $(
                $(#[$variant_meta])*
                $variant { $($field: $ty),* },
            )+
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $kind {
            $($variant,)+
        }

        impl $event {
            pub fn kind(&self) -> $kind {
                match self {
                    $($event::$variant { .. } => $kind::$variant,)+
                }
            }
        }

        $vis trait $listener: Send + Sync {
            $(
                #[allow(unused_variables)]
                fn $method(&self, $($field: $ty),*) {}
            )+
        }

        impl $crate::EventSet for $set {
            type Event = $event;
            type Kind = $kind;
            type Listener = dyn $listener;

            const NAME: &'static str = $name;

            fn kinds() -> &'static [$kind] {
                &[$($kind::$variant),+]
            }

            fn kind_of(event: &$event) -> $kind {
                event.kind()
            }

            fn deliver(listener: &dyn $listener, event: &$event) {
                match event {
                    $($event::$variant { $($field),* } => listener.$method($($field.clone()),*),)+
                }
            }
        }

        $vis trait $callbacks {
            $(
                fn $setter<F>(&self, callback: F) -> ::core::result::Result<(), $crate::BridgeError>
                where
                    F: Fn($($ty),*) + Send + Sync + 'static;
            )+
        }

        impl<D: $crate::Dispatcher<$set>> $callbacks for $crate::EventBridge<$set, D> {
            $(
                fn $setter<F>(&self, callback: F) -> ::core::result::Result<(), $crate::BridgeError>
                where
                    F: Fn($($ty),*) + Send + Sync + 'static,
                {
                    let callback: $crate::Callback<$event> =
                        ::std::sync::Arc::new(move |event: &$event| {
                            match event {
                                $event::$variant { $($field),* } => callback($($field.clone()),*),
                                #[allow(unreachable_patterns)]
                                _ => {}
                            }
                        });
                    self.set_callback($kind::$variant, Some(callback))
                }
            )+
        }
    };
}
