use crate::bases::*;
use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click;

#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    on_click: Emitter<Click>,
}

impl Button {
    pub fn label(&self) -> &str { &self.label }

    pub fn new<F>(label: impl Into<String>, on_click: F) -> Self
    where F: 'static + Fn() + Send + Sync {
        Self {
            label: label.into(),
            on_click: Emitter::new_callback(move |_| on_click()),
        }
    }

    pub fn click(&self) -> Result<()> {
        self.on_click.emit(Click)
    }
}

impl View for Button {
    fn view(&self) -> String { format!("[{}]", self.label) }
}
