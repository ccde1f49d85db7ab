pub mod assets;
pub mod camera;
pub mod color;
pub mod config;
pub mod constants;
pub mod interaction;
pub mod layout;
pub mod lifecycle;
pub mod scene;
pub mod stage;
pub mod theme;

pub use assets::*;
pub use camera::*;
pub use color::*;
pub use config::*;
pub use constants::*;
pub use interaction::*;
pub use layout::*;
pub use lifecycle::*;
pub use scene::*;
pub use stage::*;
pub use theme::*;
