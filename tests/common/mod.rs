mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from counterscan for tests
pub use counterscan::{
    EditorEvent, EditorState, Error, ErrorKind, Point, PointRef, PointSetName, SelectionMode,
};
