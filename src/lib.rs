//! Interactive point mapping over a raster image, compiled to WebAssembly.
//!
//! The user places and drags an ordered sequence of reference points over a
//! displayed image while a magnified view of a selected region stays in sync.
//! Points are stored as fractions of the main drawing surface, so the same
//! point can be shown on independently scaled surfaces and reported in
//! original image pixels.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::MapperCore`]: placement, dragging, zoom selection, view sync |
//! | [`coords`] | Ratio, surface, zoom and original-pixel coordinate conversions |
//! | [`points`] | Placed point records and their ordered store |
//! | [`stage`] | Retained-mode shapes for one drawing surface |
//! | [`hit`] | Hit-testing pointer positions against stage shapes |
//! | [`input`] | Interaction modes, cursors and the gesture state machine |
//! | [`render`] | Draws a stage onto a 2D canvas |
//! | [`dom`] | Container lookup, image loading and element styling |
//! | [`widget`] | JavaScript-facing `PointMapper` and event wiring |
//! | [`config`] | Presentation options |
//! | [`error`] | [`error::MapperError`] |
//! | [`consts`] | Shared numeric and style constants |

pub mod config;
pub mod consts;
pub mod coords;
pub mod dom;
pub mod engine;
pub mod error;
pub mod hit;
pub mod input;
pub mod points;
pub mod render;
pub mod stage;
pub mod widget;

pub use engine::{Action, MapperCore, SurfaceLayout};
pub use error::MapperError;
pub use points::MappedPoint;
pub use widget::PointMapper;
