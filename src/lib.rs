// Library surface for the binary, headless tests and reuse.
pub mod app;
pub mod app_dirs;
pub mod category;
pub mod clock;
pub mod config;
pub mod error;
pub mod form;
pub mod history;
pub mod logging;
pub mod reconcile;
pub mod run;
pub mod runtime;
pub mod storage;
pub mod time_format;
pub mod timer;
pub mod ui;
pub mod view;

pub use category::{Category, Segment};
pub use error::{FormatError, SplitError, ValidationError};
pub use reconcile::{BestTimeReconciler, ConfirmPrompt, Decisions};
pub use timer::{TimerController, TimerPhase};
