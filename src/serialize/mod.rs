//! Pure projections of a finished [`Graph`](crate::graph::Graph) onto its two on-disk forms.
//!
//! Both projections only read the graph, so the same graph can be rendered any number
//! of times, in either form, with byte-identical results.

use crate::error::RenderError;
use crate::graph::Graph;

mod execution;
mod layout;
mod ui;

pub use execution::{ExecutionForm, ExecutionInput, ExecutionNode, to_execution_form};
pub use ui::{
    SEED_CONTROL_VALUE, UI_FORMAT_VERSION, UiForm, UiInput, UiLink, UiNode, UiOutput, UiWidgetRef,
    to_ui_form,
};

/// Which of the two forms to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowFormat {
    /// Flat form keyed by node id, loaded by the execution engine.
    Execution,
    /// Layout and link table, loaded by the visual editor.
    Ui,
}

impl WorkflowFormat {
    /// Renders `graph` in this form as a JSON value.
    ///
    /// Object keys keep the order the forms write them in, so execution-form node ids
    /// come out in numeric order.
    pub fn render(self, graph: &Graph) -> Result<serde_json::Value, RenderError> {
        let value = match self {
            WorkflowFormat::Execution => serde_json::to_value(to_execution_form(graph)?)?,
            WorkflowFormat::Ui => serde_json::to_value(to_ui_form(graph)?)?,
        };
        Ok(value)
    }

    /// Renders `graph` in this form as pretty-printed JSON.
    pub fn render_pretty(self, graph: &Graph) -> Result<String, RenderError> {
        let text = match self {
            WorkflowFormat::Execution => to_execution_form(graph)?.to_json_pretty()?,
            WorkflowFormat::Ui => to_ui_form(graph)?.to_json_pretty()?,
        };
        Ok(text)
    }
}
