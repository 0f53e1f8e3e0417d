//! Startup banner and session summary display.

use std::path::Path;

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub backends: &'a [String],
    pub backend: &'a str,
    pub store: &'a str,
    pub memory: &'a Path,
    pub conversation: &'a str,
}

pub fn render_banner(info: &BannerInfo) -> String {
    let backends = if info.backends.is_empty() {
        "(none)".to_string()
    } else {
        info.backends.join(", ")
    };
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║           C L A W M I N I             ║
   ║   record, route, deliver. that's it.  ║
   ╚═══════════════════════════════════════╝

   version        {}
   backends       {}
   using          {}
   memory         {} ({})
   conversation   {}

   type /help for commands, quit to exit
"#,
        env!("CARGO_PKG_VERSION"),
        backends,
        info.backend,
        info.memory.display(),
        info.store,
        info.conversation,
    )
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!("{}", render_banner(info));
}

/// Print the session summary (messages sent + farewell).
pub fn print_session_summary(messages: usize) {
    if messages > 0 {
        println!("session: {messages} message(s) sent");
    }
    println!("goodbye.");
}
