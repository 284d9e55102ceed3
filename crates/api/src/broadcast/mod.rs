//! The live metrics pipeline.
//!
//! [`BroadcastLoop`] samples the host on a fixed cadence, classifies the
//! reading and hands the resulting [`HealthRecord`], wrapped in a
//! [`LiveUpdate`], to the [`SubscriberRegistry`], which fans it out to every
//! connected [`Subscriber`]. [`SnapshotRecorder`] is one such subscriber and writes
//! history for users with an active session.
//!
//! [`HealthRecord`]: khm_core::metrics::HealthRecord

pub mod monitor;
pub mod recorder;
pub mod registry;
pub mod subscriber;
pub mod update;

pub use monitor::{BroadcastLoop, CycleError};
pub use recorder::SnapshotRecorder;
pub use registry::SubscriberRegistry;
pub use subscriber::{ChannelSubscriber, DeliveryError, Subscriber};
pub use update::{LiveUpdate, MetricsEnvelope};
