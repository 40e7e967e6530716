//! Canonical compose list and how each change rewrites it

use crate::models::{EditorItem, FooterState, Item, Tweet};

/// A requested mutation of the compose list
#[derive(Debug, Clone)]
pub enum ListChange {
    /// Replace the previous statuses, keep the editor
    SetPreviousStatus(Vec<Tweet>),
    /// Insert or replace the editor
    UpdateEditor(EditorItem),
    /// Replace the previous statuses and reset the editor after a send
    UpdatePreviousAndClearEditor {
        /// Statuses to show above the editor
        tweets: Vec<Tweet>,
        /// Footer to pre-fill the editor with
        footer: FooterState,
    },
    /// Reset the editor only
    ClearEditor,
    /// Update the counter fields of the editor
    UpdateStatusCounter {
        /// Whether the draft can be sent
        valid: bool,
        /// Weighted draft length
        length: usize,
        /// Maximum weighted length
        max_length: usize,
    },
}

impl ListChange {
    /// Short name for logging
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SetPreviousStatus(_) => "set previous status",
            Self::UpdateEditor(_) => "update editor",
            Self::UpdatePreviousAndClearEditor { .. } => "update previous status & clear editor",
            Self::ClearEditor => "clear editor",
            Self::UpdateStatusCounter { .. } => "update status counter",
        }
    }
}

/// The canonical list, owned by the adapter worker
#[derive(Debug, Default)]
pub struct ListState {
    items: Vec<Item>,
    editor_initialized: bool,
}

impl ListState {
    /// Current rows
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The trailing editor, if one exists
    pub fn editor(&self) -> Option<&EditorItem> {
        self.items.last().and_then(Item::as_editor)
    }

    /// Compute the list that results from applying `change`.
    ///
    /// Returns `None` when the change needs an editor and there is none yet.
    pub fn plan(&self, change: &ListChange) -> Option<Vec<Item>> {
        match change {
            ListChange::SetPreviousStatus(tweets) => {
                let editor = self.editor()?.clone();
                Some(with_editor(previous_items(tweets), editor))
            }
            ListChange::UpdateEditor(item) => {
                let editor = EditorItem {
                    initial_value: !self.editor_initialized,
                    ..item.clone()
                };
                let mut items = self.items.clone();
                if items.last().is_some_and(Item::is_editor) {
                    items.pop();
                }
                Some(with_editor(items, editor))
            }
            ListChange::UpdatePreviousAndClearEditor { tweets, footer } => {
                let editor = self.editor()?.cleared(footer.draft_prefix());
                Some(with_editor(previous_items(tweets), editor))
            }
            ListChange::ClearEditor => {
                let editor = self.editor()?.cleared("");
                Some(self.replace_editor(editor))
            }
            ListChange::UpdateStatusCounter {
                valid,
                length,
                max_length,
            } => {
                let editor = self.editor()?.with_counter(*valid, *length, *max_length);
                Some(self.replace_editor(editor))
            }
        }
    }

    /// Swap in a list produced by [`ListState::plan`]
    pub fn commit(&mut self, items: Vec<Item>) {
        if items.last().is_some_and(Item::is_editor) {
            self.editor_initialized = true;
        }
        self.items = items;
    }

    fn replace_editor(&self, editor: EditorItem) -> Vec<Item> {
        let mut items = self.items.clone();
        items.pop();
        with_editor(items, editor)
    }
}

fn previous_items(tweets: &[Tweet]) -> Vec<Item> {
    tweets.iter().map(Item::from).collect()
}

fn with_editor(mut items: Vec<Item>, editor: EditorItem) -> Vec<Item> {
    items.push(Item::Editor(editor));
    items
}
