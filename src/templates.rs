pub const VIEWER_HTML: &str = include_str!("../templates/viewer.html");
pub const DECK_HTML: &str = include_str!("../templates/deck.html");
pub const DECK_JS: &str = include_str!("../templates/deck.js");
pub const INDEX_HTML: &str = include_str!("../templates/index.html");
