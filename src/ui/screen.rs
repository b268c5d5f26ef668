use ratatui::{layout::Rect, Frame};

use crate::app::{App, AppState};
use crate::ui::{categories, category_form, splits};

/// A UI Screen boundary: responsible for rendering one application state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect);
}

/// Category table with selection
pub struct CategoriesScreen;

impl Screen for CategoriesScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        categories::render(app, f, area);
    }
}

/// Create/edit form
pub struct FormScreen;

impl Screen for FormScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        category_form::render(app, f, area);
    }
}

/// Running timer with the segment list
pub struct TimerScreen;

impl Screen for TimerScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        splits::render(app, f, area);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Categories => Box::new(CategoriesScreen),
        AppState::Form => Box::new(FormScreen),
        AppState::Timer => Box::new(TimerScreen),
    }
}
