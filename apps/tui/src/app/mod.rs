pub mod actions;
pub mod editor;
pub mod input;
pub mod state;
pub mod store;
pub mod submission;
pub mod suggest;

pub use input::handle_input;
pub use state::App;
