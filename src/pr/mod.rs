//! Guarded control-flow graphs: action nodes, decision nodes, single-sweep
//! execution, and derivation by structural sharing — the non-hierarchical,
//! non-reactive sibling of [`crate::sm`].
//!
//! ```
//! use flight_models::pr::{PrBuilder, PrDestination, PrSource};
//!
//! struct Data { counter_1: i32 }
//!
//! fn incr(d: &mut Data) { d.counter_1 += 1; }
//! fn counter_lt_5(d: &Data) -> bool { d.counter_1 < 5 }
//!
//! let mut b = PrBuilder::new(2, 1, 4, 2, 2).unwrap();
//! b.set_initial_flow(PrDestination::ActionNode(1), None).unwrap();
//! b.add_action_node(1, Some(incr)).unwrap();
//! b.add_action_node(2, Some(incr)).unwrap();
//! b.add_decision_node(1, 2).unwrap();
//! b.add_flow(PrSource::ActionNode(1), PrDestination::ActionNode(2), None).unwrap();
//! b.add_flow(PrSource::ActionNode(2), PrDestination::DecisionNode(1), None).unwrap();
//! b.add_flow(PrSource::DecisionNode(1), PrDestination::ActionNode(1), Some(counter_lt_5))
//!     .unwrap();
//! b.add_flow(PrSource::DecisionNode(1), PrDestination::Final, None).unwrap();
//! let mut pr = b.build(Data { counter_1: 0 }).unwrap();
//! pr.check().unwrap();
//!
//! pr.start();
//! pr.execute(); // one sweep: N1, N2, D1->N1, N1, N2, D1->Final
//! assert_eq!(pr.user_data().counter_1, 6);
//! assert_eq!(pr.exec_count(), 1);
//! assert_eq!(pr.current_node(), 0);
//! ```

mod builder;
mod descriptor;
mod topology;

pub use builder::PrBuilder;
pub use descriptor::{Action, Guard, PrDescriptor, PrExt};
pub use topology::{ActionNode, DecisionNode, Flow, PrDestination, PrSource, PrTopology, ProcBase};
