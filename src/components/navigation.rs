use super::*;

/// Source of the current pathname.
pub trait Location {
    fn pathname(&self) -> Option<String>;
}

impl Location for Option<String> {
    fn pathname(&self) -> Option<String> { self.clone() }
}

impl Location for &str {
    fn pathname(&self) -> Option<String> { Some(self.to_string()) }
}

#[derive(Debug, Clone)]
pub struct Navigation<L: Location> {
    location: L,
}

impl<L: Location> Navigation<L> {
    pub fn location(&self) -> &L { &self.location }

    pub fn new(location: L) -> Self {
        Self { location }
    }
}

impl<L: Location> View for Navigation<L> {
    fn view(&self) -> String {
        match self.location.pathname().filter(|path| !path.is_empty()) {
            Some(path) => format!("Current path: {path}"),
            None => "Current path: loading...".to_string(),
        }
    }
}
