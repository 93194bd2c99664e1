//! Output port implemented by whatever shows the game to the player.

/// Receives everything the game loop wants shown.
pub trait Presenter {
    /// Replace the text in the main text box.
    fn display_text(&mut self, text: &str);

    /// Enable or disable the button for an action.
    fn set_interactable(&mut self, action: &str, interactable: bool);

    /// Empty the main text box.
    fn clear_text(&mut self) {
        self.display_text("");
    }
}
