mod view;
mod interval_counter;
mod button;
mod login_form;
mod navigation;
mod fetch;
mod user_profile;

pub use self::{
    view::*,
    interval_counter::*,
    button::*,
    login_form::*,
    navigation::*,
    fetch::*,
    user_profile::*,
};
