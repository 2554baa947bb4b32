//! Editing core of the flowdesk workflow editor.
//!
//! - **Store**: [`GraphStore`] holds the active workflow, selection, workflow
//!   list and execution bookkeeping, shared through [`SharedStore`]
//! - **Canvas**: [`CanvasController`] turns pointer events into bounded node
//!   moves and selection changes
//! - **Rendering**: [`connection_path`] and [`CanvasScene`] compute what the
//!   canvas draws
//! - **Inspector**: [`InspectorForm`] edits node fields by node type
//! - **Backend bridge**: [`WorkflowActions`] and [`ExecutionOrchestrator`]
//!   call the automation backend and fold results into the store

pub mod actions;
pub mod canvas;
pub mod error;
pub mod filters;
pub mod inspector;
pub mod orchestrator;
pub mod render;
pub mod scene;
pub mod shared;
pub mod store;

#[cfg(test)]
mod test_support;

pub use actions::WorkflowActions;
pub use canvas::{CanvasBounds, CanvasController, DragState, NodeFootprint, clamp_position};
pub use error::{InspectorError, RunBlocked, StoreError};
pub use filters::{FilterUpdate, StatusFilter, WorkflowFilters};
pub use inspector::{FormField, InspectorForm};
pub use orchestrator::{ExecutionOrchestrator, check_run};
pub use render::{ConnectionPath, FlowMarker, StrokeStyle, connection_path};
pub use scene::{CanvasScene, NodeBox, SceneConnection};
pub use shared::SharedStore;
pub use store::GraphStore;
