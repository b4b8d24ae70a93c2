//! # rxsignal: cold, composable signals
//!
//! A push-based stream engine. A [`Signal`] is a lazily started, possibly
//! asynchronous sequence of values terminated by completion or by a single
//! error. Operators compose signals; the ones coordinating several concurrent
//! subscriptions (`bind`, `flatten_map`, `zip`) deliver exactly one terminal
//! event, keep value order deterministic and release every subscription they
//! started.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxsignal::prelude::*;
//!
//! from_iter::<_, ()>(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe_next(|v| println!("Value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Signal`] | The core trait: subscription plus every operator |
//! | [`Subscriber`] | Thread-safe sink enforcing the delivery contract |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Disposable`] | Handle to cancel an active subscription |
//! | [`RunLoop`] | Thread-owned event queue used to wait synchronously |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): [`ThreadPoolScheduler`] on a `futures`
//!   thread pool
//! - **`tokio-scheduler`**: `TokioScheduler` on a tokio runtime
//!
//! [`Signal`]: signal::Signal
//! [`Subscriber`]: subscriber::Subscriber
//! [`Observer`]: observer::Observer
//! [`Disposable`]: disposable::Disposable
//! [`RunLoop`]: scheduler::RunLoop
//! [`ThreadPoolScheduler`]: scheduler::ThreadPoolScheduler

pub mod blocking;
pub mod disposable;
pub mod error;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod signal;
pub mod subscriber;

pub use prelude::*;
