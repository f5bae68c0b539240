/// User intents produced by [`crate::input::map_event`] and consumed by
/// [`crate::app::App::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Tick,
    Resize(u16, u16),

    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    /// Open the detail screen for the selected card.
    DrillIn,
    /// Close detail/help, or clear the search when on the gallery.
    NavigateBack,
    Refresh,
    NextTab,
    ToggleHelp,

    StartSearch,
    SearchInput(char),
    SearchBackspace,
    /// Commit the search box now instead of waiting for the debounce.
    SearchConfirm,
    /// Leave the search box, keeping its text.
    SearchCancel,
}
