//! Actions offered once a session is authenticated.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
  Home,
  Read,
  Create,
  Update,
  Delete,
  ShowVisualizations,
}

impl Action {
  pub const ALL: [Action; 6] = [
    Action::Home,
    Action::Read,
    Action::Create,
    Action::Update,
    Action::Delete,
    Action::ShowVisualizations,
  ];

  pub fn label(self) -> &'static str {
    match self {
      Action::Home => "Home",
      Action::Read => "Read",
      Action::Create => "Create",
      Action::Update => "Update",
      Action::Delete => "Delete",
      Action::ShowVisualizations => "Show Visualizations",
    }
  }

  /// Whether the action works on the selected table's rows.
  pub fn is_table_action(self) -> bool {
    matches!(self, Action::Read | Action::Create | Action::Update | Action::Delete)
  }
}
