pub mod confidence;
pub mod decision;
pub mod protocol;
pub mod reference;

pub use confidence::Confidence;
pub use decision::{Decision, DecisionLabel, DecisionSource, Stage};
pub use protocol::{Protocol, TemporalRange};
pub use reference::Reference;
