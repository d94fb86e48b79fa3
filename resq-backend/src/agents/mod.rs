pub mod graph;
pub mod router;
pub mod specialist;

pub use graph::{DispatchGraph, GraphNode, TurnOutcome, TurnReport, MAX_GRAPH_STEPS};
pub use router::{RouteDecision, Router};
pub use specialist::{Specialist, SpecialistKind};
