/// Text rendering of a component, one line per element.
pub trait View {
    fn view(&self) -> String;
}
