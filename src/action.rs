use crate::error::PopularError;
use crate::state::ViewAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,

    // Language nav
    NextLanguage,
    PrevLanguage,
    SelectLanguage(usize),

    // Card cursor
    CardLeft,
    CardRight,
    CardUp,
    CardDown,
    FirstCard,
    LastCard,

    // Selected card
    OpenInBrowser,
    OpenOwner,
    YankUrl,

    /// Fetch results, routed to the reducer
    View(ViewAction),

    None,
}

impl From<PopularError> for Action {
    fn from(err: PopularError) -> Self {
        Action::View(ViewAction::Error(err.to_string()))
    }
}
