// ui/constants.rs

pub const TITLE: &str = "2 Player AI Story Weaver";
pub const KEY_HINTS: [&str; 2] = [
    " Enter: submit | Alt+Enter: new line | Ctrl+G: toggle images | PgUp/PgDn: scroll | Esc: quit ",
    " Ctrl+P/Ctrl+N: select image | Ctrl+R: retry selected image | Ctrl+X: dismiss error ",
];
pub const EMPTY_STORY: &str = "The AI's story will appear here...";
