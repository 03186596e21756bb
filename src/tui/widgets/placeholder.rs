//! Empty labeled panel reserved for a future widget.

use crate::layout::PanelSpec;

use super::{PanelView, Widget};

pub struct Placeholder {
    panel: PanelSpec,
}

impl Placeholder {
    pub fn new(panel: PanelSpec) -> Self {
        Self { panel }
    }
}

impl Widget for Placeholder {
    fn panel(&self) -> &PanelSpec {
        &self.panel
    }

    fn view(&self) -> PanelView {
        PanelView {
            spec: self.panel.clone(),
            nodes: Vec::new(),
        }
    }
}
