use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::{Error, Res, utils, warning};

/// Picks one playlist name out of a listing.
#[cfg_attr(test, mockall::automock)]
pub trait PlaylistSelector: Send + Sync {
    /// Returns the chosen name, or [`Error::SelectionCancelled`].
    fn select(&self, names: &[String]) -> Res<String>;
}

/// Terminal prompt: type a search term first, then pick from the names that
/// contain it (ignoring case).
#[derive(Default)]
pub struct PromptSelector {
    theme: ColorfulTheme,
}

impl PlaylistSelector for PromptSelector {
    fn select(&self, names: &[String]) -> Res<String> {
        loop {
            let query: String = Input::with_theme(&self.theme)
                .with_prompt("Search playlist")
                .allow_empty(true)
                .interact_text()?;

            let matches = utils::filter_names(names, &query);
            if matches.is_empty() {
                warning!("No playlist contains {:?}", query);
                continue;
            }

            let selection = Select::with_theme(&self.theme)
                .with_prompt("Select Playlist")
                .items(&matches)
                .default(0)
                .interact_opt()?;

            return match selection {
                Some(index) => Ok(matches[index].clone()),
                None => Err(Error::SelectionCancelled),
            };
        }
    }
}
