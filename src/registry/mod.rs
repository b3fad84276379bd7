mod core;

pub use self::core::{StyleDecl, StyleRegistry, StyleState, StyleTarget};
