//! Hierarchical state machines: choice pseudo-states, guarded transitions,
//! entry/do/exit actions, embedded (nested) SMs, and derivation by
//! structural sharing.
//!
//! ```
//! use flight_models::sm::{Destination, SmBuilder, Source};
//!
//! struct Data { counter_1: i32, flag_1: bool }
//!
//! fn incr1(d: &mut Data) { d.counter_1 += 1; }
//! fn incr1_by_2(d: &mut Data) { d.counter_1 += 2; }
//! fn incr1_by_4(d: &mut Data) { d.counter_1 += 4; }
//! fn flag_1(d: &Data) -> bool { d.flag_1 }
//!
//! let mut b = SmBuilder::new(1, 0, 1, 4, 2).unwrap();
//! b.set_initial_transition(Destination::State(1), None).unwrap();
//! b.add_proper_state(1, Some(incr1), Some(incr1_by_2), Some(incr1_by_4), 1, None)
//!     .unwrap();
//! b.add_transition(Source::State(1), Destination::Final, 0, Some(incr1), Some(flag_1))
//!     .unwrap();
//! let mut sm = b.build(Data { counter_1: 0, flag_1: false }).unwrap();
//! sm.check().unwrap();
//!
//! sm.start();
//! assert_eq!(sm.user_data().counter_1, 3); // entry (+1) then do (+2)
//! sm.execute(0); // flag_1 false: do-action runs again
//! assert_eq!(sm.user_data().counter_1, 5);
//! sm.user_data_mut().flag_1 = true;
//! sm.execute(0); // flag_1 true: transition (+1), then exit action (+4)
//! assert_eq!(sm.user_data().counter_1, 10);
//! assert_eq!(sm.exec_count(), 2);
//! assert_eq!(sm.current_state(), 0);
//! ```

mod builder;
mod descriptor;
mod embedded;
mod topology;

pub use builder::SmBuilder;
pub use descriptor::{Action, Guard, SmDescriptor, SmExt};
pub use embedded::SmLike;
pub use topology::{ChoiceState, Destination, ProperState, SmBase, SmTopology, Source, Transition};
