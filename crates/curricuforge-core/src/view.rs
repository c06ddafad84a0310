use serde::Serialize;

use crate::markdown::format_curriculum;

/// Which sections of the page are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Visibility {
    pub form_section: bool,
    pub results_section: bool,
    pub loading_spinner: bool,
    pub error_message: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Form,
    Loading,
    Results {
        /// Curriculum text as received, before formatting.
        text: String,
        html: String,
    },
    Error {
        message: String,
        /// Validation errors leave the form up; request errors happen after it was hidden.
        form_visible: bool,
    },
}

impl ViewState {
    pub fn visibility(&self) -> Visibility {
        match self {
            ViewState::Form => Visibility {
                form_section: true,
                results_section: false,
                loading_spinner: false,
                error_message: false,
            },
            ViewState::Loading => Visibility {
                form_section: false,
                results_section: true,
                loading_spinner: true,
                error_message: false,
            },
            ViewState::Results { .. } => Visibility {
                form_section: false,
                results_section: true,
                loading_spinner: false,
                error_message: false,
            },
            ViewState::Error { form_visible, .. } => Visibility {
                form_section: *form_visible,
                results_section: true,
                loading_spinner: false,
                error_message: true,
            },
        }
    }

    /// Rendered curriculum, empty unless showing results.
    pub fn output_html(&self) -> &str {
        match self {
            ViewState::Results { html, .. } => html,
            _ => "",
        }
    }

    pub fn output_text(&self) -> &str {
        match self {
            ViewState::Results { text, .. } => text,
            _ => "",
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn show_loading(&mut self) {
        *self = ViewState::Loading;
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        let form_visible = self.visibility().form_section;
        *self = ViewState::Error {
            message: message.into(),
            form_visible,
        };
    }

    /// Formats the curriculum text and switches to the results view.
    pub fn display_curriculum(&mut self, curriculum: &str) {
        *self = ViewState::Results {
            text: curriculum.to_string(),
            html: format_curriculum(curriculum),
        };
    }

    pub fn reset(&mut self) {
        *self = ViewState::Form;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_form() {
        let view = ViewState::default();
        assert_eq!(
            view.visibility(),
            Visibility {
                form_section: true,
                results_section: false,
                loading_spinner: false,
                error_message: false,
            }
        );
        assert_eq!(view.output_html(), "");
    }

    #[test]
    fn loading_hides_form_and_clears_output() {
        let mut view = ViewState::Results {
            text: "old".to_string(),
            html: "<p>old</p>".to_string(),
        };
        view.show_loading();
        let visibility = view.visibility();
        assert!(!visibility.form_section);
        assert!(visibility.results_section);
        assert!(visibility.loading_spinner);
        assert!(!visibility.error_message);
        assert_eq!(view.output_html(), "");
    }

    #[test]
    fn display_formats_text() {
        let mut view = ViewState::Loading;
        view.display_curriculum("# Plan\n\nStart *here*.");
        assert_eq!(view.output_html(), "<h3>Plan</h3><p>Start <em>here</em>.</p>");
        assert_eq!(view.output_text(), "# Plan\n\nStart *here*.");
        assert!(!view.visibility().loading_spinner);
        assert!(view.error_message().is_none());
    }

    #[test]
    fn error_after_request_keeps_form_hidden() {
        let mut view = ViewState::Loading;
        view.show_error("Error: API error: 500");
        let visibility = view.visibility();
        assert!(!visibility.form_section);
        assert!(visibility.error_message);
        assert!(!visibility.loading_spinner);
        assert_eq!(view.error_message(), Some("Error: API error: 500"));
        assert_eq!(view.output_html(), "");
        assert_eq!(view.output_text(), "");
    }

    #[test]
    fn validation_error_keeps_form_visible() {
        let mut view = ViewState::Form;
        view.show_error("Please fill in all fields");
        assert!(view.visibility().form_section);
        assert!(view.visibility().results_section);
    }

    #[test]
    fn reset_returns_to_form() {
        let mut view = ViewState::Error {
            message: "boom".to_string(),
            form_visible: false,
        };
        view.reset();
        assert_eq!(view, ViewState::Form);
    }
}
